// Cell contents and per-cell style facets

use crate::style::{Alignment, Border, Fill, Font};
use crate::value::CellValue;

/// One formatted run of rich text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub text: String,
    pub font: Option<Font>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }
}

/// Raw cell content as stored by the source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Value(CellValue),
    /// Rich text stored inline as an ordered run list.
    Rich(Vec<TextRun>),
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Value(CellValue::Empty)
    }
}

/// Hyperlink attached to a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hyperlink {
    /// External target (URL, file path), resolved through relationships.
    pub target: Option<String>,
    /// In-workbook location such as `Sheet2!A1`.
    pub location: Option<String>,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub content: CellContent,
    /// Run list some producers attach next to a plain text value instead of
    /// storing [`CellContent::Rich`].
    pub runs: Option<Vec<TextRun>>,
    pub number_format: Option<String>,
    pub font: Option<Font>,
    pub fill: Option<Fill>,
    pub border: Option<Border>,
    pub alignment: Option<Alignment>,
    pub hyperlink: Option<Hyperlink>,
}

impl Cell {
    pub fn with_value(value: impl Into<CellValue>) -> Self {
        Self {
            content: CellContent::Value(value.into()),
            ..Default::default()
        }
    }

    /// Scalar value of the cell. Rich text flattens to its concatenated runs.
    pub fn value(&self) -> CellValue {
        match &self.content {
            CellContent::Value(v) => v.clone(),
            CellContent::Rich(runs) => {
                CellValue::Text(runs.iter().map(|r| r.text.as_str()).collect())
            }
        }
    }

    /// Raw text when the content is textual (plain or rich).
    pub fn raw_text(&self) -> Option<String> {
        match &self.content {
            CellContent::Value(CellValue::Text(s)) => Some(s.clone()),
            CellContent::Value(_) => None,
            CellContent::Rich(runs) => Some(runs.iter().map(|r| r.text.as_str()).collect()),
        }
    }
}
