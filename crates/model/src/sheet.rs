// Worksheet: cells plus sheet-level metadata

use std::collections::BTreeMap;

use crate::address::{CellAddress, CellRange};
use crate::cell::Cell;

/// Sheet visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetState {
    pub fn parse(s: &str) -> Self {
        match s {
            "hidden" => SheetState::Hidden,
            "veryHidden" => SheetState::VeryHidden,
            _ => SheetState::Visible,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SheetState::Visible => "visible",
            SheetState::Hidden => "hidden",
            SheetState::VeryHidden => "veryHidden",
        }
    }
}

/// Split or frozen pane of a sheet view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pane {
    pub x_split: Option<f64>,
    pub y_split: Option<f64>,
    pub top_left_cell: Option<String>,
    pub active_pane: Option<String>,
    /// `frozen`, `split`, or `frozenSplit`
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub active_cell: Option<String>,
    pub sqref: Option<String>,
    pub pane: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetView {
    pub pane: Option<Pane>,
    pub selections: Vec<Selection>,
}

/// Table (ListObject) declared on a sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub reference: Option<String>,
}

/// Column dimension covering columns `min..=max`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnDimension {
    pub min: u32,
    pub max: u32,
    pub width: Option<f64>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowDimension {
    pub height: Option<f64>,
    pub hidden: bool,
    pub outline_level: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValidation {
    pub validation_type: Option<String>,
    pub operator: Option<String>,
    pub allow_blank: bool,
    pub show_error_message: bool,
    pub error_title: Option<String>,
    pub error: Option<String>,
    pub formula1: Option<String>,
    pub formula2: Option<String>,
    pub sqref: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionalRule {
    pub rule_type: Option<String>,
    pub operator: Option<String>,
    pub formulas: Vec<String>,
    /// Index into the differential formats table, when a custom format is attached.
    pub dxf_id: Option<u32>,
}

/// Conditional formatting block: one range reference, one or more rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionalFormat {
    pub range: String,
    pub rules: Vec<ConditionalRule>,
}

#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    pub title: String,
    pub state: SheetState,
    pub view: Option<SheetView>,
    /// Declared used range (`<dimension ref="A1:F42"/>`), unvalidated.
    pub dimension: Option<String>,
    pub merged: Vec<String>,
    pub tables: Vec<Table>,
    pub columns: Vec<ColumnDimension>,
    pub rows: BTreeMap<u32, RowDimension>,
    pub validations: Vec<DataValidation>,
    pub conditional_formats: Vec<ConditionalFormat>,
    cells: BTreeMap<CellAddress, Cell>,
}

impl Worksheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn cell(&self, addr: CellAddress) -> Option<&Cell> {
        self.cells.get(&addr)
    }

    pub fn cell_mut(&mut self, addr: CellAddress) -> &mut Cell {
        self.cells.entry(addr).or_default()
    }

    pub fn set_cell(&mut self, addr: CellAddress, cell: Cell) {
        self.cells.insert(addr, cell);
    }

    /// Stored cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (&CellAddress, &Cell)> {
        self.cells.iter()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Smallest rectangle holding every stored cell.
    pub fn bounds(&self) -> Option<CellRange> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        let (mut min_row, mut max_row) = (first.row, first.row);
        let (mut min_col, mut max_col) = (first.col, first.col);
        for addr in keys {
            min_row = min_row.min(addr.row);
            max_row = max_row.max(addr.row);
            min_col = min_col.min(addr.col);
            max_col = max_col.max(addr.col);
        }
        Some(CellRange::new(
            CellAddress::new(min_row, min_col),
            CellAddress::new(max_row, max_col),
        ))
    }
}
