//! `sheetprint <input> <output>`: snapshot a workbook to JSON.
//!
//! Flags override the settings file; the settings file overrides built-in
//! defaults. With `--split-sheets` the output path is a directory and each
//! sheet lands in its own file.

use std::path::PathBuf;

use sheetprint_config::Settings;
use sheetprint_extract::{ensure_sheets_found, extract_workbook, ExtractOptions};
use sheetprint_io::{open_views, write_split, write_workbook};

use crate::exit_codes::EXIT_USAGE;
use crate::CliError;

/// Everything one export run needs, after flags and settings are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sheets: Vec<String>,
    pub split: bool,
    pub pretty: bool,
}

impl ExportPlan {
    pub fn resolve(
        input: PathBuf,
        output: PathBuf,
        sheets: Vec<String>,
        split_sheets: bool,
        compact: bool,
        settings: &Settings,
    ) -> Self {
        let sheets = if sheets.is_empty() {
            settings.sheets.clone()
        } else {
            sheets
        };
        Self {
            input,
            output,
            sheets,
            split: split_sheets || settings.split_sheets,
            pretty: settings.pretty && !compact,
        }
    }

    fn options(&self) -> ExtractOptions {
        if self.sheets.is_empty() {
            ExtractOptions::default()
        } else {
            ExtractOptions::only(self.sheets.iter().cloned())
        }
    }
}

/// Run the export and return the files written.
pub fn run_export(plan: &ExportPlan, quiet: bool) -> Result<Vec<PathBuf>, CliError> {
    let (styled, cached) = open_views(&plan.input).map_err(CliError::from_io)?;
    let options = plan.options();
    let file = plan.input.display().to_string();
    let record = extract_workbook(&file, &styled, cached.as_ref(), &options);

    // An explicit filter that matched nothing fails in both modes
    let record = if plan.sheets.is_empty() {
        record
    } else {
        ensure_sheets_found(record, &options).map_err(|e| {
            CliError::from_extract(e).with_hint(available_sheets(&styled.sheet_names()))
        })?
    };

    let written = if plan.split {
        if record.sheets.is_empty() {
            return Err(CliError {
                code: EXIT_USAGE,
                message: "no sheets found to export".to_string(),
                hint: None,
            });
        }
        write_split(record, &plan.output, plan.pretty).map_err(CliError::from_io)?
    } else {
        write_workbook(&record, &plan.output, plan.pretty).map_err(CliError::from_io)?;
        vec![plan.output.clone()]
    };

    if !quiet {
        for path in &written {
            println!("Wrote {}", path.display());
        }
    }
    Ok(written)
}

fn available_sheets(names: &[&str]) -> String {
    if names.is_empty() {
        return "the workbook has no worksheets".to_string();
    }
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!("available sheets: {}", quoted.join(", "))
}
