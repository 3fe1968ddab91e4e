// Cached-value view: the last computed result of every cell, via calamine

use std::path::Path;

use calamine::{open_workbook_auto, CellErrorType, Data, Reader};
use sheetprint_model::{Cell, CellAddress, CellValue, Workbook, Worksheet};

use crate::error::IoError;
use crate::numfmt::{parse_iso_value, serial_to_value, NumberKind};

/// Read every sheet's cached values. `date1904` comes from the styled view;
/// calamine's serials do not expose the epoch flag.
///
/// A sheet calamine cannot read is left out; callers treat a missing sheet
/// as "no cached values".
pub fn read_cached_values(path: &Path, date1904: bool) -> Result<Workbook, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut cached = Workbook::new();
    cached.date1904 = date1904;
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                log::warn!("cached values for sheet {name:?} unavailable: {e}");
                continue;
            }
        };

        let mut ws = Worksheet::new(name.as_str());
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        for (row_idx, col_idx, data) in range.used_cells() {
            let value = convert(data, date1904);
            if value == CellValue::Empty {
                continue;
            }
            // calamine positions are 0-based and relative to the range start
            let addr = CellAddress::new(
                start_row + row_idx as u32 + 1,
                start_col + col_idx as u32 + 1,
            );
            ws.set_cell(addr, Cell::with_value(value));
        }
        cached.add_sheet(ws);
    }
    Ok(cached)
}

fn convert(data: &Data, date1904: bool) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(error_literal(e).to_string()),
        Data::DateTime(dt) => {
            let kind = if dt.is_duration() {
                NumberKind::Duration
            } else {
                NumberKind::DateTime
            };
            serial_to_value(dt.as_f64(), kind, date1904)
        }
        Data::DateTimeIso(s) => parse_iso_value(s),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn error_literal(err: &CellErrorType) -> &'static str {
    match err {
        CellErrorType::Div0 => "#DIV/0!",
        CellErrorType::NA => "#N/A",
        CellErrorType::Name => "#NAME?",
        CellErrorType::Null => "#NULL!",
        CellErrorType::Num => "#NUM!",
        CellErrorType::Ref => "#REF!",
        CellErrorType::Value => "#VALUE!",
        CellErrorType::GettingData => "#GETTING_DATA",
    }
}
