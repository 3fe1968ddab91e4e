// Style projectors: model style descriptors → flat output records.
//
// Pure functions. Colors go through the caller's resolver; an unresolvable
// color becomes null, never an error.

use sheetprint_model::{Alignment, Border, Cell, CellContent, Edge, Fill, Font, TextRun};

use crate::color::ColorResolver;
use crate::record::{
    AlignmentRecord, BorderRecord, EdgeRecord, FillRecord, FontRecord, RichTextRun,
};

pub fn project_font(font: &Font, colors: &ColorResolver) -> FontRecord {
    FontRecord {
        name: font.name.clone(),
        size: font.size,
        bold: font.bold,
        italic: font.italic,
        underline: font.underline.as_deref().is_some_and(|u| u != "none"),
        strike: font.strike,
        color: colors.resolve(font.color.as_ref()),
    }
}

/// Pattern fills without a declared pattern type project to nothing.
/// Gradients keep their gradient type and carry no colors.
pub fn project_fill(fill: &Fill, colors: &ColorResolver) -> Option<FillRecord> {
    let pattern = match fill {
        Fill::Pattern(pattern) => pattern,
        Fill::Gradient(gradient) => {
            return Some(FillRecord {
                fill_type: gradient
                    .gradient_type
                    .clone()
                    .unwrap_or_else(|| "linear".to_string()),
                fg_color: None,
                bg_color: None,
            });
        }
    };
    let fill_type = pattern
        .pattern_type
        .as_deref()
        .filter(|t| !t.is_empty() && *t != "none")?;
    Some(FillRecord {
        fill_type: fill_type.to_string(),
        fg_color: colors.resolve(pattern.fg_color.as_ref()),
        bg_color: colors.resolve(pattern.bg_color.as_ref()),
    })
}

/// Background color of a typed fill: foreground if it resolves, else background.
pub fn fill_background(fill: Option<&Fill>, colors: &ColorResolver) -> Option<String> {
    let record = project_fill(fill?, colors)?;
    record.fg_color.or(record.bg_color)
}

pub fn project_edge(edge: &Edge, colors: &ColorResolver) -> Option<EdgeRecord> {
    let style = edge.style.as_deref().filter(|s| !s.is_empty() && *s != "none")?;
    Some(EdgeRecord {
        style: style.to_string(),
        color: colors.resolve(edge.color.as_ref()),
    })
}

/// Each edge is projected on its own. A border with no styled edge at all
/// projects to nothing.
pub fn project_border(border: &Border, colors: &ColorResolver) -> Option<BorderRecord> {
    let record = BorderRecord {
        left: project_edge(&border.left, colors),
        right: project_edge(&border.right, colors),
        top: project_edge(&border.top, colors),
        bottom: project_edge(&border.bottom, colors),
        diagonal: project_edge(&border.diagonal, colors),
    };
    (!record.is_empty()).then_some(record)
}

/// Only horizontal and vertical placement are kept.
pub fn project_alignment(alignment: &Alignment) -> Option<AlignmentRecord> {
    let record = AlignmentRecord {
        horizontal: alignment.horizontal.clone(),
        vertical: alignment.vertical.clone(),
    };
    (!record.is_empty()).then_some(record)
}

// =============================================================================
// Rich text
// =============================================================================

type RunShape = fn(&Cell) -> Option<&[TextRun]>;

/// Run shapes, in probe order.
const RUN_SHAPES: [RunShape; 2] = [inline_runs, attached_runs];

fn inline_runs(cell: &Cell) -> Option<&[TextRun]> {
    match &cell.content {
        CellContent::Rich(runs) => Some(runs),
        CellContent::Value(_) => None,
    }
}

fn attached_runs(cell: &Cell) -> Option<&[TextRun]> {
    cell.runs.as_deref()
}

/// Runs of the first shape that carries any, each with its own font.
pub fn project_rich_text(cell: &Cell, colors: &ColorResolver) -> Option<Vec<RichTextRun>> {
    let runs = RUN_SHAPES
        .iter()
        .find_map(|shape| shape(cell).filter(|runs| !runs.is_empty()))?;
    Some(
        runs.iter()
            .map(|run| RichTextRun {
                text: run.text.clone(),
                font: run.font.as_ref().map(|f| project_font(f, colors)),
            })
            .collect(),
    )
}
