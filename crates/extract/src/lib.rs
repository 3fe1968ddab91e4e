//! `sheetprint-extract`: turns a workbook's styled and cached-values views
//! into flat, serializable snapshot records.
//!
//! Pipeline: [`ThemeColorTable::build`] → [`ColorResolver`] → style
//! projectors → [`reconcile`] per cell → [`assemble_sheet`] per sheet →
//! [`extract_workbook`].

pub mod cell;
pub mod color;
pub mod error;
pub mod names;
pub mod record;
pub mod sheet;
pub mod style;
pub mod theme;
pub mod workbook;

pub use cell::{reconcile, CellOutcome};
pub use color::{apply_tint, normalize_hex, resolve, ColorResolver, ThemeColorTable};
pub use error::ExtractError;
pub use names::extract_defined_names;
pub use record::{CellRecord, HyperlinkRecord, OrderedMap, SheetRecord, WorkbookRecord};
pub use sheet::{assemble_sheet, used_range};
pub use theme::parse_theme_xml;
pub use workbook::{ensure_sheets_found, extract_workbook, ExtractOptions};
