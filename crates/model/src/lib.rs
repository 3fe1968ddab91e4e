//! `sheetprint-model`: read-only spreadsheet document model.
//!
//! Plain data: sheets, cells, styles, theme source and defined names, as a
//! workbook reader hands them over. No parsing, no resolution.

pub mod address;
pub mod cell;
pub mod names;
pub mod sheet;
pub mod style;
pub mod theme;
pub mod value;
pub mod workbook;

pub use address::{column_index, column_letter, CellAddress, CellRange, MAX_COL, MAX_ROW};
pub use cell::{Cell, CellContent, Hyperlink, TextRun};
pub use names::{DefinedName, DefinedNames};
pub use sheet::{
    ColumnDimension, ConditionalFormat, ConditionalRule, DataValidation, Pane, RowDimension,
    Selection, SheetState, SheetView, Table, Worksheet,
};
pub use style::{Alignment, Border, ColorRef, Edge, Fill, Font, GradientFill, PatternFill};
pub use theme::{ColorScheme, SchemeColor, ThemeSlot, ThemeSource};
pub use value::CellValue;
pub use workbook::Workbook;
