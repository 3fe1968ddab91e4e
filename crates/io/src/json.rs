// JSON snapshot output

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use sheetprint_extract::WorkbookRecord;

use crate::error::IoError;

fn write_error(path: &Path, e: impl std::fmt::Display) -> IoError {
    IoError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| write_error(path, e))?;
    let mut writer = BufWriter::new(file);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    result.map_err(|e| {
        if e.is_io() {
            write_error(path, e)
        } else {
            IoError::Json(e.to_string())
        }
    })?;

    writer.flush().map_err(|e| write_error(path, e))
}

/// Write the whole snapshot to one file.
pub fn write_workbook(record: &WorkbookRecord, path: &Path, pretty: bool) -> Result<(), IoError> {
    write_json(record, path, pretty)
}

/// Write one file per sheet into `dir` (created if needed). Each file holds
/// the workbook-level fields and a single-entry `sheets`. Returns the paths
/// written, in sheet order.
pub fn write_split(
    record: WorkbookRecord,
    dir: &Path,
    pretty: bool,
) -> Result<Vec<PathBuf>, IoError> {
    fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;

    let mut written = Vec::new();
    let mut used = HashSet::new();
    for (title, one) in record.split() {
        let filename = safe_filename(&format!("{title}.json"));
        if !used.insert(filename.clone()) {
            log::warn!("sheet {title:?} maps to {filename}, overwriting an earlier sheet");
        }
        let path = dir.join(filename);
        write_json(&one, &path, pretty)?;
        written.push(path);
    }
    Ok(written)
}

/// Replace every run of characters outside `[A-Za-z0-9._-]` with `_`.
pub fn safe_filename(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("filename pattern compiles"));
    let cleaned = re.replace_all(name.trim(), "_");
    if cleaned.is_empty() {
        "sheet".to_string()
    } else {
        cleaned.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetprint_extract::{extract_workbook, ExtractOptions};
    use sheetprint_model::{Cell, CellAddress, Workbook, Worksheet};
    use tempfile::tempdir;

    fn record() -> WorkbookRecord {
        let mut wb = Workbook::new();
        for title in ["Summary", "Q1 / Q2", "Données"] {
            let mut ws = Worksheet::new(title);
            ws.set_cell(CellAddress::new(1, 1), Cell::with_value(title));
            wb.add_sheet(ws);
        }
        extract_workbook("book.xlsx", &wb, None, &ExtractOptions::default())
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Summary.json"), "Summary.json");
        assert_eq!(safe_filename("Q1 / Q2.json"), "Q1_Q2.json");
        assert_eq!(safe_filename("  padded.json "), "padded.json");
        assert_eq!(safe_filename("Données.json"), "Donn_es.json");
        assert_eq!(safe_filename(""), "sheet");
        assert_eq!(safe_filename("   "), "sheet");
    }

    #[test]
    fn test_write_workbook_pretty_keeps_unicode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_workbook(&record(), &path, true).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"file\": \"book.xlsx\""));
        assert!(text.contains("Données"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["sheets"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_write_workbook_compact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_workbook(&record(), &path, false).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_write_split() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let paths = write_split(record(), &out, true).unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Summary.json", "Q1_Q2.json", "Donn_es.json"]);

        let one: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths[1]).unwrap()).unwrap();
        assert_eq!(one["file"], "book.xlsx");
        let sheets = one["sheets"].as_object().unwrap();
        assert_eq!(sheets.len(), 1);
        assert!(sheets.contains_key("Q1 / Q2"));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing/out.json");
        let err = write_workbook(&record(), &path, true).unwrap_err();
        assert!(matches!(err, IoError::Write { .. }));
    }
}
