// Sheet assembly: one worksheet (+ its cached-values twin) → SheetRecord

use sheetprint_model::{column_letter, CellRange, Worksheet};

use crate::cell::reconcile;
use crate::color::ColorResolver;
use crate::record::{
    ColumnRecord, ConditionalFormatRecord, FrozenPaneRecord, OrderedMap, PaneRecord, RowRecord,
    SheetMeta, SheetRecord, TableRecord, ValidationRecord, ViewsRecord,
};

/// Dimension reported for a sheet with no declared range and no cells.
const EMPTY_DIMENSION: &str = "A1:A1";

/// Declared dimension if it parses, else the bounds of the stored cells.
pub fn used_range(ws: &Worksheet) -> Option<CellRange> {
    ws.dimension
        .as_deref()
        .and_then(CellRange::parse)
        .or_else(|| ws.bounds())
}

pub fn assemble_sheet(
    ws: &Worksheet,
    cached: Option<&Worksheet>,
    colors: &ColorResolver,
) -> SheetRecord {
    let range = used_range(ws);

    let mut cells = OrderedMap::new();
    let mut hyperlinks = OrderedMap::new();
    if let Some(range) = range {
        // The reader materialises every address carrying a value, a style or
        // a hyperlink, and the store iterates row-major, so walking it
        // visits every address of the rectangle that can yield a record.
        for (addr, cell) in ws.cells().filter(|(addr, _)| range.contains(**addr)) {
            let cached_cell = cached.and_then(|c| c.cell(*addr));
            let outcome = reconcile(cell, cached_cell, colors);
            let key = addr.to_string();
            if let Some(link) = outcome.hyperlink {
                hyperlinks.insert(key.clone(), link);
            }
            if let Some(record) = outcome.record {
                cells.insert(key, record);
            }
        }
    }

    log::debug!(
        "sheet {:?}: {} of {} stored cells kept, {} hyperlinks",
        ws.title,
        cells.len(),
        ws.cell_count(),
        hyperlinks.len()
    );

    SheetRecord {
        meta: sheet_meta(ws),
        dimension: range.map_or_else(|| EMPTY_DIMENSION.to_string(), |r| r.to_string()),
        merged: ws.merged.clone(),
        tables: ws
            .tables
            .iter()
            .map(|t| TableRecord {
                name: t.display_name.clone().or_else(|| t.name.clone()),
                reference: t.reference.clone(),
            })
            .collect(),
        columns: ws
            .columns
            .iter()
            .filter(|c| c.min > 0)
            .map(|c| {
                let record = ColumnRecord {
                    letter: column_letter(c.min),
                    width: c.width,
                    hidden: c.hidden,
                };
                (c.min.to_string(), record)
            })
            .collect(),
        rows: ws
            .rows
            .iter()
            .map(|(idx, r)| {
                let record = RowRecord {
                    height: r.height,
                    hidden: r.hidden,
                    outline_level: r.outline_level,
                };
                (idx.to_string(), record)
            })
            .collect(),
        validations: ws
            .validations
            .iter()
            .map(|dv| ValidationRecord {
                validation_type: dv.validation_type.clone(),
                operator: dv.operator.clone(),
                allow_blank: dv.allow_blank,
                show_error_message: dv.show_error_message,
                error_title: dv.error_title.clone(),
                error: dv.error.clone(),
                formula1: dv.formula1.clone(),
                formula2: dv.formula2.clone(),
                sqref: dv.sqref.clone(),
            })
            .collect(),
        conditional_formats: ws
            .conditional_formats
            .iter()
            .flat_map(|cf| {
                cf.rules.iter().map(|rule| ConditionalFormatRecord {
                    reference: cf.range.clone(),
                    rule_type: rule.rule_type.clone(),
                    operator: rule.operator.clone(),
                    formula: rule.formulas.clone(),
                    dxf: rule.dxf_id.is_some(),
                })
            })
            .collect(),
        cells,
        hyperlinks,
    }
}

fn sheet_meta(ws: &Worksheet) -> SheetMeta {
    let view = ws.view.as_ref();
    let top_left_cell = view
        .and_then(|v| v.selections.first())
        .and_then(|s| s.active_cell.clone());
    let pane = view.and_then(|v| v.pane.as_ref()).map(|p| PaneRecord {
        x_split: p.x_split,
        y_split: p.y_split,
        top_left_cell: p.top_left_cell.clone(),
        active_pane: p.active_pane.clone(),
        state: p.state.clone(),
    });

    SheetMeta {
        state: ws.state.as_str().to_string(),
        views: ViewsRecord {
            frozen_pane: FrozenPaneRecord {
                top_left_cell,
                pane,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ThemeColorTable;
    use sheetprint_model::{
        Cell, CellAddress, CellValue, ColorRef, ColumnDimension, ConditionalFormat,
        ConditionalRule, Fill, Hyperlink, Pane, PatternFill, RowDimension, Selection, SheetState,
        SheetView, Table,
    };

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_used_range_prefers_declared_dimension() {
        let mut ws = Worksheet::new("S");
        ws.set_cell(addr("B2"), Cell::with_value(1.0));
        ws.set_cell(addr("D9"), Cell::with_value(2.0));
        assert_eq!(used_range(&ws).unwrap().to_string(), "B2:D9");

        ws.dimension = Some("A1:C3".into());
        assert_eq!(used_range(&ws).unwrap().to_string(), "A1:C3");

        ws.dimension = Some("garbage".into());
        assert_eq!(used_range(&ws).unwrap().to_string(), "B2:D9");

        assert!(used_range(&Worksheet::new("Empty")).is_none());
    }

    #[test]
    fn test_assemble_scans_declared_range_row_major() {
        let theme = ThemeColorTable::default();
        let colors = ColorResolver::new(&theme);
        let mut ws = Worksheet::new("S");
        ws.dimension = Some("A1:B2".into());
        ws.set_cell(addr("B2"), Cell::with_value("d"));
        ws.set_cell(addr("A1"), Cell::with_value("a"));
        ws.set_cell(addr("B1"), Cell::with_value(""));
        // Outside the declared range
        ws.set_cell(addr("C5"), Cell::with_value("x"));

        let record = assemble_sheet(&ws, None, &colors);
        assert_eq!(record.dimension, "A1:B2");
        assert_eq!(record.cells.keys().collect::<Vec<_>>(), vec!["A1", "B2"]);
    }

    #[test]
    fn test_assemble_large_sheet() {
        let theme = ThemeColorTable::default();
        let colors = ColorResolver::new(&theme);
        let mut ws = Worksheet::new("Big");
        for row in 1..=1000 {
            for col in 1..=100 {
                ws.set_cell(CellAddress::new(row, col), Cell::with_value(f64::from(row * col)));
            }
        }

        let record = assemble_sheet(&ws, None, &colors);
        assert_eq!(record.dimension, "A1:CV1000");
        assert_eq!(record.cells.len(), 100_000);
        assert_eq!(record.cells.keys().next(), Some("A1"));
        assert_eq!(record.cells.keys().last(), Some("CV1000"));
        assert_eq!(
            record.cells.get("CV1000").unwrap().value,
            CellValue::Number(100_000.0)
        );
    }

    #[test]
    fn test_assemble_reconciles_against_cached_sheet() {
        let theme = ThemeColorTable::default();
        let colors = ColorResolver::new(&theme);
        let mut ws = Worksheet::new("S");
        ws.set_cell(addr("A1"), Cell::with_value(2.0));
        ws.set_cell(addr("A2"), Cell::with_value("=A1*3"));
        ws.set_cell(addr("A3"), Cell::with_value("=A1*4"));

        let mut cached = Worksheet::new("S");
        cached.set_cell(addr("A2"), Cell::with_value(6.0));

        let record = assemble_sheet(&ws, Some(&cached), &colors);
        assert_eq!(record.cells.get("A2").unwrap().value, CellValue::Number(6.0));
        // Address missing from the cached sheet
        assert_eq!(record.cells.get("A3").unwrap().value, CellValue::Empty);
    }

    #[test]
    fn test_hyperlinks_and_background_cells() {
        let theme = ThemeColorTable::from_entries([(4, "#4472C4")]);
        let colors = ColorResolver::new(&theme);
        let mut ws = Worksheet::new("S");
        ws.set_cell(
            addr("A1"),
            Cell {
                hyperlink: Some(Hyperlink {
                    location: Some("Other!A1".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        ws.set_cell(
            addr("B1"),
            Cell {
                fill: Some(Fill::Pattern(PatternFill::solid(ColorRef::theme(4)))),
                ..Default::default()
            },
        );

        let record = assemble_sheet(&ws, None, &colors);
        assert!(record.hyperlinks.contains_key("A1"));
        assert!(!record.cells.contains_key("A1"));
        assert_eq!(
            record.cells.get("B1").unwrap().background_color.as_deref(),
            Some("#4472C4")
        );
    }

    #[test]
    fn test_empty_sheet() {
        let theme = ThemeColorTable::default();
        let colors = ColorResolver::new(&theme);
        let record = assemble_sheet(&Worksheet::new("Empty"), None, &colors);
        assert_eq!(record.dimension, "A1:A1");
        assert!(record.cells.is_empty());
        assert_eq!(record.meta.state, "visible");
    }

    #[test]
    fn test_sheet_metadata() {
        let theme = ThemeColorTable::default();
        let colors = ColorResolver::new(&theme);
        let mut ws = Worksheet::new("Meta");
        ws.state = SheetState::Hidden;
        ws.view = Some(SheetView {
            pane: Some(Pane {
                y_split: Some(1.0),
                top_left_cell: Some("A2".into()),
                active_pane: Some("bottomLeft".into()),
                state: Some("frozen".into()),
                ..Default::default()
            }),
            selections: vec![Selection {
                active_cell: Some("B3".into()),
                sqref: Some("B3".into()),
                pane: Some("bottomLeft".into()),
            }],
        });
        ws.merged.push("A1:C1".into());
        ws.tables.push(Table {
            name: Some("Table1".into()),
            display_name: Some("Sales".into()),
            reference: Some("A1:C10".into()),
        });
        ws.columns.push(ColumnDimension {
            min: 2,
            max: 4,
            width: Some(18.5),
            hidden: false,
        });
        ws.rows.insert(
            3,
            RowDimension {
                height: Some(30.0),
                hidden: true,
                outline_level: 1,
            },
        );
        ws.conditional_formats.push(ConditionalFormat {
            range: "A1:A10".into(),
            rules: vec![
                ConditionalRule {
                    rule_type: Some("cellIs".into()),
                    operator: Some("greaterThan".into()),
                    formulas: vec!["5".into()],
                    dxf_id: Some(0),
                },
                ConditionalRule {
                    rule_type: Some("expression".into()),
                    formulas: vec!["ISBLANK(A1)".into()],
                    ..Default::default()
                },
            ],
        });

        let record = assemble_sheet(&ws, None, &colors);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["meta"]["state"], "hidden");
        assert_eq!(json["meta"]["views"]["frozenPane"]["topLeftCell"], "B3");
        assert_eq!(json["meta"]["views"]["frozenPane"]["pane"]["topLeftCell"], "A2");
        assert_eq!(json["meta"]["views"]["frozenPane"]["pane"]["state"], "frozen");
        assert_eq!(json["merged"], serde_json::json!(["A1:C1"]));
        assert_eq!(json["tables"][0]["name"], "Sales");
        assert_eq!(json["tables"][0]["ref"], "A1:C10");
        assert_eq!(
            json["columns"]["2"],
            serde_json::json!({"letter": "B", "width": 18.5, "hidden": false})
        );
        assert_eq!(
            json["rows"]["3"],
            serde_json::json!({"height": 30.0, "hidden": true, "outlineLevel": 1})
        );
        assert_eq!(json["conditionalFormats"].as_array().unwrap().len(), 2);
        assert_eq!(json["conditionalFormats"][0]["dxf"], true);
        assert_eq!(json["conditionalFormats"][1]["dxf"], false);
        assert_eq!(json["conditionalFormats"][1]["ref"], "A1:A10");
    }
}
