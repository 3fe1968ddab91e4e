//! Workbook extraction: theme table, defined names, then each sheet in the
//! styled view's order.

use sheetprint_model::Workbook;

use crate::color::{ColorResolver, ThemeColorTable};
use crate::error::ExtractError;
use crate::names::extract_defined_names;
use crate::record::{OrderedMap, WorkbookRecord};
use crate::sheet::assemble_sheet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
    /// Sheet titles to keep. `None` or an empty list keeps every sheet.
    pub sheets: Option<Vec<String>>,
}

impl ExtractOptions {
    pub fn only<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheets: Some(sheets.into_iter().map(Into::into).collect()),
        }
    }

    fn filter(&self) -> Option<&[String]> {
        self.sheets.as_deref().filter(|s| !s.is_empty())
    }

    pub fn includes(&self, title: &str) -> bool {
        self.filter()
            .map_or(true, |names| names.iter().any(|n| n == title))
    }
}

/// Extract every selected sheet. Sheets missing from the cached view are
/// extracted with formula values absent. A filter that matches nothing
/// yields a record with no sheets; see [`ensure_sheets_found`].
pub fn extract_workbook(
    file: &str,
    styled: &Workbook,
    cached: Option<&Workbook>,
    options: &ExtractOptions,
) -> WorkbookRecord {
    let theme = ThemeColorTable::build(&styled.theme);
    let colors = ColorResolver::new(&theme);

    let mut sheets = OrderedMap::new();
    for ws in styled.sheets.iter().filter(|ws| options.includes(&ws.title)) {
        let cached_ws = cached.and_then(|wb| wb.sheet(&ws.title));
        if cached.is_some() && cached_ws.is_none() {
            log::debug!("sheet {:?} missing from cached view", ws.title);
        }
        sheets.insert(ws.title.clone(), assemble_sheet(ws, cached_ws, &colors));
    }

    WorkbookRecord {
        file: file.to_string(),
        defined_names: extract_defined_names(styled.defined_names.as_ref()),
        sheets,
    }
}

/// Turn "zero sheets extracted" into an error for callers that treat it as
/// a failure.
pub fn ensure_sheets_found(
    record: WorkbookRecord,
    options: &ExtractOptions,
) -> Result<WorkbookRecord, ExtractError> {
    if record.sheets.is_empty() {
        let requested = options.filter().map(<[String]>::to_vec).unwrap_or_default();
        return Err(ExtractError::SheetNotFound(requested));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetprint_model::{Cell, CellAddress, DefinedName, DefinedNames, Worksheet};

    fn workbook(titles: &[&str]) -> Workbook {
        let mut wb = Workbook::new();
        for title in titles {
            let mut ws = Worksheet::new(*title);
            ws.set_cell(CellAddress::new(1, 1), Cell::with_value(*title));
            wb.add_sheet(ws);
        }
        wb
    }

    #[test]
    fn test_sheet_order_follows_source() {
        let wb = workbook(&["Alpha", "Beta", "Gamma"]);
        let options = ExtractOptions::only(["Gamma", "Alpha"]);
        let record = extract_workbook("book.xlsx", &wb, None, &options);
        assert_eq!(record.sheets.keys().collect::<Vec<_>>(), vec!["Alpha", "Gamma"]);
        assert_eq!(record.file, "book.xlsx");
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let wb = workbook(&["A", "B"]);
        let record = extract_workbook("x", &wb, None, &ExtractOptions::only(Vec::<String>::new()));
        assert_eq!(record.sheets.len(), 2);
        let record = extract_workbook("x", &wb, None, &ExtractOptions::default());
        assert_eq!(record.sheets.len(), 2);
    }

    #[test]
    fn test_sheet_not_found() {
        let wb = workbook(&["A"]);
        let options = ExtractOptions::only(["Missing"]);
        let record = extract_workbook("x", &wb, None, &options);
        assert!(record.sheets.is_empty());

        let err = ensure_sheets_found(record, &options).unwrap_err();
        assert_eq!(err, ExtractError::SheetNotFound(vec!["Missing".into()]));
        assert_eq!(err.to_string(), "sheet 'Missing' not found in workbook");
    }

    #[test]
    fn test_cached_view_missing_sheet_tolerated() {
        let mut styled = workbook(&["Calc"]);
        styled.sheets[0].set_cell(CellAddress::new(2, 1), Cell::with_value("=1+1"));
        let cached = workbook(&["Other"]);

        let record = extract_workbook("x", &styled, Some(&cached), &ExtractOptions::default());
        let sheet = record.sheets.get("Calc").unwrap();
        assert!(sheet.cells.get("A2").unwrap().value.is_empty());
    }

    #[test]
    fn test_defined_names_carried() {
        let mut wb = workbook(&["A"]);
        wb.defined_names = Some(DefinedNames::List(vec![DefinedName::new("N", "A!$A$1")]));
        let record = extract_workbook("x", &wb, None, &ExtractOptions::default());
        assert_eq!(record.defined_names.len(), 1);
    }
}
