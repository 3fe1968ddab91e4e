// Workbook: ordered sheets plus workbook-level theme and names

use crate::names::DefinedNames;
use crate::sheet::Worksheet;
use crate::theme::ThemeSource;

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Sheets in declared order.
    pub sheets: Vec<Worksheet>,
    pub theme: ThemeSource,
    pub defined_names: Option<DefinedNames>,
    /// Serial dates count from 1904-01-01 instead of 1899-12-30.
    pub date1904: bool,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Worksheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, title: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.title == title)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.title.as_str()).collect()
    }
}
