//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error, or a requested sheet is not in the workbook  |
//! | 3    | I/O error (input unreadable, output not writable)         |
//! | 4    | Parse error (input is not a well-formed xlsx package)     |

use sheetprint_extract::ExtractError;
use sheetprint_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, or no sheet matched the filter.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be opened, or output could not be written.
pub const EXIT_IO: u8 = 3;

/// Input opened but is not a readable workbook package.
pub const EXIT_PARSE: u8 = 4;

/// Map a reader/writer error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Open { .. } | IoError::Write { .. } => EXIT_IO,
        IoError::Zip(_) | IoError::MissingPart(_) | IoError::Xml { .. } => EXIT_PARSE,
        IoError::Json(_) => EXIT_ERROR,
    }
}

/// Map an extraction error to its exit code.
pub fn extract_exit_code(err: &ExtractError) -> u8 {
    match err {
        ExtractError::SheetNotFound(_) => EXIT_USAGE,
    }
}
