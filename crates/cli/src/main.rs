// sheetprint CLI - snapshot an XLSX workbook's cells, styles and layout as JSON

mod exit_codes;
mod export;
mod logger;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sheetprint_config::Settings;
use sheetprint_extract::ExtractError;
use sheetprint_io::IoError;

use exit_codes::{extract_exit_code, io_exit_code, EXIT_SUCCESS};
use export::{run_export, ExportPlan};

#[derive(Parser)]
#[command(name = "sheetprint")]
#[command(about = "Extract cell values, formulas, styles and sheet layout from an .xlsx file as JSON")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Examples:
  sheetprint report.xlsx report.json
  sheetprint report.xlsx summary.json --sheet Summary
  sheetprint report.xlsx out/ --split-sheets
  sheetprint report.xlsx report.json --compact -q")]
struct Cli {
    /// Path to the input .xlsx file
    input: PathBuf,

    /// Output .json file, or directory when using --split-sheets
    output: PathBuf,

    /// Export only this sheet (repeatable)
    #[arg(long = "sheet", value_name = "NAME")]
    sheets: Vec<String>,

    /// Write one JSON file per sheet into the output directory
    #[arg(long)]
    split_sheets: bool,

    /// Write JSON without indentation
    #[arg(long)]
    compact: bool,

    /// Settings file (default: <config dir>/sheetprint/settings.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Quiet mode: no "Wrote" lines, errors only
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug output from the readers
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.quiet, cli.verbose));

    let settings = Settings::load(cli.config.as_deref());
    let plan = ExportPlan::resolve(
        cli.input,
        cli.output,
        cli.sheets,
        cli.split_sheets,
        cli.compact,
        &settings,
    );

    match run_export(&plan, cli.quiet) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn from_io(err: IoError) -> Self {
        let hint = match &err {
            IoError::Zip(_) => Some("is the input an .xlsx file? legacy .xls is not supported".to_string()),
            IoError::Write { .. } => Some("check that the output directory exists".to_string()),
            _ => None,
        };
        Self {
            code: io_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }

    pub fn from_extract(err: ExtractError) -> Self {
        Self {
            code: extract_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
