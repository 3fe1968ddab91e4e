// Workbook reading (styled and cached-value views) and JSON snapshot output

pub mod cached;
pub mod error;
pub mod formula;
pub mod json;
pub mod numfmt;
pub mod package;
pub mod shared_strings;
pub mod worksheet;
pub mod xlsx;
pub mod xlsx_styles;
pub mod xml;

use std::path::Path;

use sheetprint_model::Workbook;

pub use cached::read_cached_values;
pub use error::IoError;
pub use json::{safe_filename, write_split, write_workbook};
pub use xlsx::read_workbook;

/// Open both views of the workbook at `path`.
///
/// The styled view is required. The cached-value view is best effort: if it
/// cannot be read, a warning is logged and formula values come out absent.
pub fn open_views(path: &Path) -> Result<(Workbook, Option<Workbook>), IoError> {
    let styled = read_workbook(path)?;
    let cached = match read_cached_values(path, styled.date1904) {
        Ok(cached) => Some(cached),
        Err(e) => {
            log::warn!("cached values unavailable, formula results omitted: {e}");
            None
        }
    };
    Ok((styled, cached))
}
