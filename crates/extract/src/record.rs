//! Output records.
//!
//! Every record here is built once and never mutated afterwards. Field order
//! is the serialized key order. Only JSON-safe scalars appear; date/time
//! values stay typed in [`CellValue`] until serialization.

use indexmap::IndexMap;
use serde::Serialize;

use sheetprint_model::CellValue;

// =============================================================================
// Ordered map
// =============================================================================

/// String-keyed map that serializes in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderedMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// =============================================================================
// Style records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct FontRecord {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: bool,
    pub strike: Option<bool>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRecord {
    #[serde(rename = "type")]
    pub fill_type: String,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EdgeRecord {
    pub style: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct BorderRecord {
    pub left: Option<EdgeRecord>,
    pub right: Option<EdgeRecord>,
    pub top: Option<EdgeRecord>,
    pub bottom: Option<EdgeRecord>,
    pub diagonal: Option<EdgeRecord>,
}

impl BorderRecord {
    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.diagonal.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct AlignmentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
}

impl AlignmentRecord {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RichTextRun {
    pub text: String,
    pub font: Option<FontRecord>,
}

// =============================================================================
// Cell records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_fmt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<Vec<RichTextRun>>,
    /// Font color.
    pub color: Option<String>,
    /// Fill color, foreground preferred.
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct HyperlinkRecord {
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Cell text when the cell holds text.
    pub display: Option<String>,
    pub tooltip: Option<String>,
}

// =============================================================================
// Sheet records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneRecord {
    pub x_split: Option<f64>,
    pub y_split: Option<f64>,
    pub top_left_cell: Option<String>,
    pub active_pane: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrozenPaneRecord {
    /// Active cell of the first selection.
    pub top_left_cell: Option<String>,
    pub pane: Option<PaneRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsRecord {
    pub frozen_pane: FrozenPaneRecord,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct SheetMeta {
    pub state: String,
    pub views: ViewsRecord,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableRecord {
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnRecord {
    pub letter: String,
    pub width: Option<f64>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    pub height: Option<f64>,
    pub hidden: bool,
    pub outline_level: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    #[serde(rename = "type")]
    pub validation_type: Option<String>,
    pub operator: Option<String>,
    pub allow_blank: bool,
    pub show_error_message: bool,
    pub error_title: Option<String>,
    pub error: Option<String>,
    pub formula1: Option<String>,
    pub formula2: Option<String>,
    pub sqref: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConditionalFormatRecord {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "type")]
    pub rule_type: Option<String>,
    pub operator: Option<String>,
    pub formula: Vec<String>,
    /// Whether the rule carries a differential format.
    pub dxf: bool,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRecord {
    pub meta: SheetMeta,
    pub dimension: String,
    pub merged: Vec<String>,
    pub tables: Vec<TableRecord>,
    pub columns: OrderedMap<ColumnRecord>,
    pub rows: OrderedMap<RowRecord>,
    pub validations: Vec<ValidationRecord>,
    pub conditional_formats: Vec<ConditionalFormatRecord>,
    pub cells: OrderedMap<CellRecord>,
    pub hyperlinks: OrderedMap<HyperlinkRecord>,
}

// =============================================================================
// Workbook record
// =============================================================================

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DefinedNameRecord {
    pub name: Option<String>,
    pub attr_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookRecord {
    pub file: String,
    pub defined_names: Vec<DefinedNameRecord>,
    pub sheets: OrderedMap<SheetRecord>,
}

impl WorkbookRecord {
    /// Split into one record per sheet, each carrying the workbook-level
    /// file identifier and defined names.
    pub fn split(self) -> Vec<(String, WorkbookRecord)> {
        let WorkbookRecord {
            file,
            defined_names,
            sheets,
        } = self;
        sheets
            .into_iter()
            .map(|(title, sheet)| {
                let mut one = OrderedMap::new();
                one.insert(title.clone(), sheet);
                let record = WorkbookRecord {
                    file: file.clone(),
                    defined_names: defined_names.clone(),
                    sheets: one,
                };
                (title, record)
            })
            .collect()
    }
}
