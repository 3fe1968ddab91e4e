//! Error types for workbook reading and snapshot writing.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum IoError {
    /// The input file could not be opened at all.
    Open { path: PathBuf, message: String },
    /// Not a readable zip container.
    Zip(String),
    /// A required package part is absent (e.g. `xl/workbook.xml`).
    MissingPart(String),
    /// A package part is not well-formed XML.
    Xml { part: String, message: String },
    Json(String),
    Write { path: PathBuf, message: String },
}

impl IoError {
    /// Read-side failures: the workbook itself is unusable.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IoError::Open { .. } | IoError::Zip(_) | IoError::MissingPart(_) | IoError::Xml { .. }
        )
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Open { path, message } => {
                write!(f, "cannot open {}: {}", path.display(), message)
            }
            IoError::Zip(msg) => write!(f, "not a valid xlsx package: {msg}"),
            IoError::MissingPart(part) => write!(f, "workbook is missing required part {part}"),
            IoError::Xml { part, message } => write!(f, "malformed XML in {part}: {message}"),
            IoError::Json(msg) => write!(f, "failed to serialize snapshot: {msg}"),
            IoError::Write { path, message } => {
                write!(f, "cannot write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for IoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = IoError::MissingPart("xl/workbook.xml".into());
        assert_eq!(err.to_string(), "workbook is missing required part xl/workbook.xml");
        assert!(err.is_input_error());

        let err = IoError::Write {
            path: PathBuf::from("out/a.json"),
            message: "denied".into(),
        };
        assert_eq!(err.to_string(), "cannot write out/a.json: denied");
        assert!(!err.is_input_error());
    }
}
