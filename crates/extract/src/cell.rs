//! Cell reconciliation.
//!
//! Combines one cell of the styled view with the same address in the
//! cached-values view into at most one [`CellRecord`] plus, independently, a
//! [`HyperlinkRecord`].
//!
//! Inclusion is sparse: a cell with a value is always kept; an empty cell is
//! kept only when its fill yields a background color. A font color alone
//! never keeps an empty cell.

use sheetprint_model::{Cell, CellContent, CellValue};

use crate::color::ColorResolver;
use crate::record::{CellRecord, HyperlinkRecord};
use crate::style::{
    fill_background, project_alignment, project_border, project_fill, project_font,
    project_rich_text,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellOutcome {
    pub record: Option<CellRecord>,
    pub hyperlink: Option<HyperlinkRecord>,
}

/// Formula text, when the raw content is a plain text value starting with
/// `=`. Rich text is always literal: a formula cell never carries runs.
pub fn formula_text(cell: &Cell) -> Option<&str> {
    match &cell.content {
        CellContent::Value(CellValue::Text(s)) if s.starts_with('=') => Some(s),
        _ => None,
    }
}

pub fn reconcile(cell: &Cell, cached: Option<&Cell>, colors: &ColorResolver) -> CellOutcome {
    let hyperlink = cell.hyperlink.as_ref().map(|link| HyperlinkRecord {
        target: link.target.clone(),
        location: link.location.clone(),
        display: cell.raw_text(),
        tooltip: link.tooltip.clone(),
    });

    let raw = cell.value();
    let background = fill_background(cell.fill.as_ref(), colors);
    if raw.is_empty() && background.is_none() {
        return CellOutcome {
            record: None,
            hyperlink,
        };
    }

    let (formula, value) = match formula_text(cell) {
        Some(f) => (
            Some(f.to_string()),
            cached.map(Cell::value).unwrap_or_default(),
        ),
        None => (None, raw),
    };

    let record = CellRecord {
        formula,
        value,
        num_fmt: cell.number_format.clone().filter(|f| !f.is_empty()),
        alignment: cell.alignment.as_ref().and_then(project_alignment),
        font: cell.font.as_ref().map(|f| project_font(f, colors)),
        fill: cell.fill.as_ref().and_then(|f| project_fill(f, colors)),
        border: cell.border.as_ref().and_then(|b| project_border(b, colors)),
        rich_text: project_rich_text(cell, colors),
        color: cell
            .font
            .as_ref()
            .and_then(|f| colors.resolve(f.color.as_ref())),
        background_color: background,
    };

    CellOutcome {
        record: Some(record),
        hyperlink,
    }
}
