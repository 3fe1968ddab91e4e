//! Worksheet part parser.
//!
//! One streaming pass produces the cells (styled, typed, formulas as
//! `=text`) plus the sheet-level metadata stored in the same XML: view,
//! column and row dimensions, merges, validations, conditional formats.
//! Hyperlinks and table parts point through the sheet's relationships and
//! are returned unresolved.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sheetprint_model::{
    Cell, CellAddress, CellContent, CellValue, ColumnDimension, ConditionalFormat,
    ConditionalRule, DataValidation, Pane, RowDimension, Selection, SheetView, Worksheet,
};

use crate::formula::expand_shared;
use crate::numfmt::{classify, parse_iso_value, serial_to_value, NumberKind};
use crate::shared_strings::{SharedString, StringItem};
use crate::xlsx_styles::StyleTable;
use crate::xml::{attr, attr_bool, attr_parse, event_text, parse_bool};

/// Workbook-wide tables a worksheet's cells refer into.
pub struct SheetContext<'a> {
    pub shared_strings: &'a [SharedString],
    pub styles: &'a StyleTable,
    pub date1904: bool,
}

/// A `<hyperlink>` before its relationship id is looked up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingHyperlink {
    pub reference: String,
    pub rel_id: Option<String>,
    pub location: Option<String>,
    pub tooltip: Option<String>,
}

#[derive(Debug)]
pub struct ParsedSheet {
    pub worksheet: Worksheet,
    pub hyperlinks: Vec<PendingHyperlink>,
    pub table_rel_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    Value,
    Formula,
    Formula1,
    Formula2,
    RuleFormula,
}

#[derive(Debug, Default)]
struct FormulaDraft {
    text: String,
    kind: Option<String>,
    shared_index: Option<u32>,
}

struct CellDraft {
    addr: CellAddress,
    cell_type: Option<String>,
    style: Option<usize>,
    value: Option<String>,
    formula: Option<FormulaDraft>,
    inline: Option<StringItem>,
    in_inline: bool,
}

struct SheetParser<'a> {
    ctx: &'a SheetContext<'a>,
    sheet: ParsedSheet,
    /// Shared formula masters by `si`: (master address, formula text)
    shared: HashMap<u32, (CellAddress, String)>,
    row: u32,
    next_col: u32,
    cell: Option<CellDraft>,
    capture: Option<Capture>,
    text: String,
    in_sheet_view: bool,
    views_seen: bool,
    validation: Option<DataValidation>,
    conditional: Option<ConditionalFormat>,
    rule: Option<ConditionalRule>,
    ext_depth: u32,
}

impl<'a> SheetParser<'a> {
    fn new(title: &str, ctx: &'a SheetContext<'a>) -> Self {
        Self {
            ctx,
            sheet: ParsedSheet {
                worksheet: Worksheet::new(title),
                hyperlinks: Vec::new(),
                table_rel_ids: Vec::new(),
            },
            shared: HashMap::new(),
            row: 0,
            next_col: 1,
            cell: None,
            capture: None,
            text: String::new(),
            in_sheet_view: false,
            views_seen: false,
            validation: None,
            conditional: None,
            rule: None,
            ext_depth: 0,
        }
    }

    fn start_capture(&mut self, capture: Capture) {
        self.capture = Some(capture);
        self.text.clear();
    }

    /// Captured text, if `capture` was the one in progress.
    fn end_capture(&mut self, capture: Capture) -> Option<String> {
        if self.capture != Some(capture) {
            return None;
        }
        self.capture = None;
        Some(std::mem::take(&mut self.text))
    }

    fn open(&mut self, e: &BytesStart, empty: bool) {
        let name = e.local_name();
        let name = name.as_ref();

        // Extension lists carry x14 duplicates of validations and formats
        if name == b"extLst" {
            if !empty {
                self.ext_depth += 1;
            }
            return;
        }
        if self.ext_depth > 0 {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            if cell.in_inline {
                if let Some(item) = cell.inline.as_mut() {
                    item.open(e, empty);
                }
                return;
            }
        }

        let ws = &mut self.sheet.worksheet;
        match name {
            b"dimension" => ws.dimension = attr(e, b"ref"),
            b"sheetView" if !self.views_seen => {
                self.views_seen = true;
                self.in_sheet_view = !empty;
                ws.view = Some(SheetView::default());
            }
            b"pane" if self.in_sheet_view => {
                if let Some(view) = ws.view.as_mut() {
                    view.pane = Some(Pane {
                        x_split: attr_parse(e, b"xSplit"),
                        y_split: attr_parse(e, b"ySplit"),
                        top_left_cell: attr(e, b"topLeftCell"),
                        active_pane: attr(e, b"activePane"),
                        state: attr(e, b"state"),
                    });
                }
            }
            b"selection" if self.in_sheet_view => {
                if let Some(view) = ws.view.as_mut() {
                    view.selections.push(Selection {
                        active_cell: attr(e, b"activeCell"),
                        sqref: attr(e, b"sqref"),
                        pane: attr(e, b"pane"),
                    });
                }
            }
            b"col" => {
                if let (Some(min), Some(max)) = (attr_parse(e, b"min"), attr_parse(e, b"max")) {
                    ws.columns.push(ColumnDimension {
                        min,
                        max,
                        width: attr_parse(e, b"width"),
                        hidden: attr_bool(e, b"hidden").unwrap_or(false),
                    });
                }
            }
            b"row" => self.open_row(e),
            b"c" => {
                self.open_cell(e);
                if empty {
                    self.finish_cell();
                }
            }
            b"f" if self.cell.is_some() => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.formula = Some(FormulaDraft {
                        text: String::new(),
                        kind: attr(e, b"t"),
                        shared_index: attr_parse(e, b"si"),
                    });
                }
                if !empty {
                    self.start_capture(Capture::Formula);
                }
            }
            b"v" if self.cell.is_some() && !empty => self.start_capture(Capture::Value),
            b"is" if !empty => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.inline = Some(StringItem::default());
                    cell.in_inline = true;
                }
            }
            b"mergeCell" => {
                if let Some(range) = attr(e, b"ref") {
                    ws.merged.push(range);
                }
            }
            b"dataValidation" => {
                let validation = DataValidation {
                    validation_type: attr(e, b"type"),
                    operator: attr(e, b"operator"),
                    allow_blank: attr_bool(e, b"allowBlank").unwrap_or(false),
                    show_error_message: attr_bool(e, b"showErrorMessage").unwrap_or(false),
                    error_title: attr(e, b"errorTitle"),
                    error: attr(e, b"error"),
                    formula1: None,
                    formula2: None,
                    sqref: attr(e, b"sqref").unwrap_or_default(),
                };
                if empty {
                    ws.validations.push(validation);
                } else {
                    self.validation = Some(validation);
                }
            }
            b"formula1" if self.validation.is_some() && !empty => {
                self.start_capture(Capture::Formula1)
            }
            b"formula2" if self.validation.is_some() && !empty => {
                self.start_capture(Capture::Formula2)
            }
            b"conditionalFormatting" => {
                let format = ConditionalFormat {
                    range: attr(e, b"sqref").unwrap_or_default(),
                    rules: Vec::new(),
                };
                if empty {
                    ws.conditional_formats.push(format);
                } else {
                    self.conditional = Some(format);
                }
            }
            b"cfRule" if self.conditional.is_some() => {
                let rule = ConditionalRule {
                    rule_type: attr(e, b"type"),
                    operator: attr(e, b"operator"),
                    formulas: Vec::new(),
                    dxf_id: attr_parse(e, b"dxfId"),
                };
                match (empty, self.conditional.as_mut()) {
                    (true, Some(format)) => format.rules.push(rule),
                    _ => self.rule = Some(rule),
                }
            }
            b"formula" if self.rule.is_some() && !empty => {
                self.start_capture(Capture::RuleFormula)
            }
            b"hyperlink" => {
                if let Some(reference) = attr(e, b"ref") {
                    self.sheet.hyperlinks.push(PendingHyperlink {
                        reference,
                        rel_id: attr(e, b"id"),
                        location: attr(e, b"location"),
                        tooltip: attr(e, b"tooltip"),
                    });
                }
            }
            b"tablePart" => {
                if let Some(id) = attr(e, b"id") {
                    self.sheet.table_rel_ids.push(id);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if name == b"extLst" {
            self.ext_depth = self.ext_depth.saturating_sub(1);
            return;
        }
        if self.ext_depth > 0 {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            if cell.in_inline {
                if name == b"is" {
                    cell.in_inline = false;
                } else if let Some(item) = cell.inline.as_mut() {
                    item.close(name);
                }
                return;
            }
        }

        match name {
            b"sheetView" => self.in_sheet_view = false,
            b"c" => self.finish_cell(),
            b"v" => {
                if let Some(text) = self.end_capture(Capture::Value) {
                    if let Some(cell) = self.cell.as_mut() {
                        cell.value = Some(text);
                    }
                }
            }
            b"f" => {
                if let Some(text) = self.end_capture(Capture::Formula) {
                    if let Some(formula) = self.cell.as_mut().and_then(|c| c.formula.as_mut()) {
                        formula.text = text;
                    }
                }
            }
            b"formula1" => {
                if let Some(text) = self.end_capture(Capture::Formula1) {
                    if let Some(v) = self.validation.as_mut() {
                        v.formula1 = Some(text);
                    }
                }
            }
            b"formula2" => {
                if let Some(text) = self.end_capture(Capture::Formula2) {
                    if let Some(v) = self.validation.as_mut() {
                        v.formula2 = Some(text);
                    }
                }
            }
            b"dataValidation" => {
                if let Some(v) = self.validation.take() {
                    self.sheet.worksheet.validations.push(v);
                }
            }
            b"formula" => {
                if let Some(text) = self.end_capture(Capture::RuleFormula) {
                    if let Some(rule) = self.rule.as_mut() {
                        rule.formulas.push(text);
                    }
                }
            }
            b"cfRule" => {
                if let (Some(rule), Some(format)) = (self.rule.take(), self.conditional.as_mut()) {
                    format.rules.push(rule);
                }
            }
            b"conditionalFormatting" => {
                if let Some(format) = self.conditional.take() {
                    self.sheet.worksheet.conditional_formats.push(format);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            if cell.in_inline {
                if let Some(item) = cell.inline.as_mut() {
                    item.text(text);
                }
                return;
            }
        }
        if self.capture.is_some() {
            self.text.push_str(text);
        }
    }

    fn open_row(&mut self, e: &BytesStart) {
        let row = attr_parse(e, b"r").unwrap_or(self.row + 1);
        self.row = row;
        self.next_col = 1;

        // Only rows that say something beyond their position and span
        let has_dimension = e.attributes().flatten().any(|a| {
            let key = a.key.as_ref();
            !key.contains(&b':') && key != b"r" && key != b"spans"
        });
        if has_dimension {
            self.sheet.worksheet.rows.insert(
                row,
                RowDimension {
                    height: attr_parse(e, b"ht"),
                    hidden: attr_bool(e, b"hidden").unwrap_or(false),
                    outline_level: attr_parse(e, b"outlineLevel").unwrap_or(0),
                },
            );
        }
    }

    fn open_cell(&mut self, e: &BytesStart) {
        let addr = attr(e, b"r")
            .and_then(|r| CellAddress::parse(&r))
            .unwrap_or_else(|| CellAddress::new(self.row.max(1), self.next_col));
        self.row = addr.row;
        self.next_col = addr.col + 1;
        self.cell = Some(CellDraft {
            addr,
            cell_type: attr(e, b"t"),
            style: attr_parse(e, b"s"),
            value: None,
            formula: None,
            inline: None,
            in_inline: false,
        });
    }

    fn finish_cell(&mut self) {
        let Some(draft) = self.cell.take() else {
            return;
        };
        self.capture = None;
        let CellDraft {
            addr,
            cell_type,
            style,
            value,
            formula,
            inline,
            ..
        } = draft;

        let mut cell = Cell::default();
        if let Some(style) = self.ctx.styles.get(style.unwrap_or(0)) {
            style.apply_to(&mut cell);
        }

        cell.content = match formula.and_then(|f| self.formula_text(addr, f)) {
            Some(text) => CellContent::Value(CellValue::Text(format!("={text}"))),
            None => self.content_of(
                cell_type.as_deref(),
                value,
                inline,
                cell.number_format.as_deref(),
            ),
        };
        self.sheet.worksheet.set_cell(addr, cell);
    }

    /// Formula text for a cell, registering or expanding shared formulas.
    fn formula_text(&mut self, addr: CellAddress, formula: FormulaDraft) -> Option<String> {
        let shared = formula.kind.as_deref() == Some("shared");
        if !formula.text.is_empty() {
            if let (true, Some(si)) = (shared, formula.shared_index) {
                self.shared.insert(si, (addr, formula.text.clone()));
            }
            return Some(formula.text);
        }
        if !shared {
            return None;
        }
        let (master, text) = self.shared.get(&formula.shared_index?)?;
        Some(expand_shared(text, *master, addr))
    }

    fn content_of(
        &self,
        cell_type: Option<&str>,
        value: Option<String>,
        inline: Option<StringItem>,
        number_format: Option<&str>,
    ) -> CellContent {
        match cell_type {
            Some("s") => value
                .and_then(|v| v.trim().parse::<usize>().ok())
                .and_then(|i| self.ctx.shared_strings.get(i))
                .map(SharedString::to_content)
                .unwrap_or_default(),
            Some("inlineStr") => match inline {
                Some(item) => item.finish().to_content(),
                None => CellContent::Value(value.map(CellValue::Text).unwrap_or_default()),
            },
            t => CellContent::Value(scalar_value(t, value, number_format, self.ctx.date1904)),
        }
    }
}

fn scalar_value(
    cell_type: Option<&str>,
    raw: Option<String>,
    number_format: Option<&str>,
    date1904: bool,
) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Empty;
    };
    match cell_type {
        Some("b") => CellValue::Bool(parse_bool(raw.trim())),
        Some("e") => CellValue::Error(raw),
        Some("str") | Some("s") | Some("inlineStr") => CellValue::Text(raw),
        Some("d") => parse_iso_value(&raw),
        _ => match raw.trim().parse::<f64>() {
            Ok(n) => {
                let kind = number_format.map_or(NumberKind::Number, classify);
                serial_to_value(n, kind, date1904)
            }
            Err(_) => CellValue::Text(raw),
        },
    }
}

/// Parse one worksheet part.
pub fn parse_worksheet(
    title: &str,
    xml: &str,
    ctx: &SheetContext,
) -> Result<ParsedSheet, String> {
    let mut parser = SheetParser::new(title, ctx);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?
        {
            Event::Start(ref e) => parser.open(e, false),
            Event::Empty(ref e) => parser.open(e, true),
            Event::End(ref e) => parser.close(e.local_name().as_ref()),
            Event::Eof => break,
            ref other => {
                if let Some(text) = event_text(other) {
                    parser.text(&text);
                }
            }
        }
        buf.clear();
    }

    log::trace!(
        "worksheet {title:?}: {} cells, {} merges, {} hyperlinks",
        parser.sheet.worksheet.cell_count(),
        parser.sheet.worksheet.merged.len(),
        parser.sheet.hyperlinks.len()
    );
    Ok(parser.sheet)
}
