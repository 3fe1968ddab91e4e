// End-to-end extraction over in-memory workbooks, checked through the JSON
// shape a consumer sees.

use serde_json::{json, Value};
use sheetprint_extract::{extract_workbook, ExtractOptions};
use sheetprint_model::{
    Border, Cell, CellAddress, CellValue, ColorRef, DefinedName, DefinedNames, Edge, Fill, Font,
    Hyperlink, PatternFill, ThemeSource, Workbook, Worksheet,
};

const THEME_XML: &str = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
<a:themeElements><a:clrScheme name="Office">
<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
<a:dk2><a:srgbClr val="44546A"/></a:dk2>
<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
<a:accent1><a:srgbClr val="4472C4"/></a:accent1>
<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
</a:clrScheme></a:themeElements></a:theme>"#;

fn at(s: &str) -> CellAddress {
    CellAddress::parse(s).unwrap()
}

fn snapshot(styled: &Workbook, cached: Option<&Workbook>) -> Value {
    let record = extract_workbook("fixture.xlsx", styled, cached, &ExtractOptions::default());
    serde_json::to_value(&record).unwrap()
}

fn single_sheet(ws: Worksheet) -> Workbook {
    let mut wb = Workbook::new();
    wb.theme = ThemeSource::from_raw(THEME_XML);
    wb.add_sheet(ws);
    wb
}

#[test]
fn test_background_keeps_empty_cell() {
    let mut ws = Worksheet::new("S");
    ws.set_cell(at("A1"), Cell::default());
    ws.set_cell(
        at("B1"),
        Cell {
            fill: Some(Fill::Pattern(PatternFill::solid(ColorRef::tinted(4, -0.25)))),
            ..Default::default()
        },
    );
    let json = snapshot(&single_sheet(ws), None);
    let cells = &json["sheets"]["S"]["cells"];

    assert!(cells.get("A1").is_none());
    assert_eq!(cells["B1"]["value"], Value::Null);
    assert_eq!(cells["B1"]["backgroundColor"], "#335693");
    assert_eq!(cells["B1"]["fill"]["type"], "solid");
}

#[test]
fn test_formula_uses_cached_value() {
    let mut ws = Worksheet::new("S");
    ws.set_cell(at("A1"), Cell::with_value(3.0));
    ws.set_cell(at("A2"), Cell::with_value(4.0));
    ws.set_cell(at("A3"), Cell::with_value("=SUM(A1:A2)"));
    let styled = single_sheet(ws);

    let mut cached_ws = Worksheet::new("S");
    cached_ws.set_cell(at("A1"), Cell::with_value(3.0));
    cached_ws.set_cell(at("A2"), Cell::with_value(4.0));
    cached_ws.set_cell(at("A3"), Cell::with_value(7.0));
    let mut cached = Workbook::new();
    cached.add_sheet(cached_ws);

    let json = snapshot(&styled, Some(&cached));
    let a3 = &json["sheets"]["S"]["cells"]["A3"];
    assert_eq!(a3["formula"], "=SUM(A1:A2)");
    assert_eq!(a3["value"], 7);
}

#[test]
fn test_hyperlink_on_excluded_cell() {
    let mut ws = Worksheet::new("S");
    ws.set_cell(
        at("C3"),
        Cell {
            hyperlink: Some(Hyperlink {
                target: Some("https://example.org/".into()),
                location: None,
                tooltip: None,
            }),
            ..Default::default()
        },
    );
    let json = snapshot(&single_sheet(ws), None);
    let sheet = &json["sheets"]["S"];
    assert!(sheet["cells"].get("C3").is_none());
    assert_eq!(
        sheet["hyperlinks"]["C3"],
        json!({"target": "https://example.org/", "display": null, "tooltip": null})
    );
}

#[test]
fn test_unresolvable_theme_index_is_null() {
    let mut ws = Worksheet::new("S");
    ws.set_cell(
        at("A1"),
        Cell {
            font: Some(Font {
                color: Some(ColorRef::theme(9)),
                ..Default::default()
            }),
            fill: Some(Fill::Pattern(PatternFill::solid(ColorRef::theme(10)))),
            ..Cell::with_value("x")
        },
    );
    let json = snapshot(&single_sheet(ws), None);
    let a1 = &json["sheets"]["S"]["cells"]["A1"];
    assert_eq!(a1["color"], Value::Null);
    assert_eq!(a1["backgroundColor"], Value::Null);
    assert_eq!(a1["fill"]["fgColor"], Value::Null);
}

#[test]
fn test_full_cell_record_shape() {
    let mut ws = Worksheet::new("S");
    ws.set_cell(
        at("A1"),
        Cell {
            number_format: Some("0.00".into()),
            font: Some(Font {
                name: Some("Calibri".into()),
                size: Some(11.0),
                bold: Some(true),
                italic: Some(false),
                underline: None,
                strike: Some(false),
                color: Some(ColorRef::theme(1)),
            }),
            border: Some(Border {
                bottom: Edge::new("thin", Some(ColorRef::Indexed(10))),
                ..Default::default()
            }),
            ..Cell::with_value(1.25)
        },
    );
    let json = snapshot(&single_sheet(ws), None);
    assert_eq!(
        json["sheets"]["S"]["cells"]["A1"],
        json!({
            "value": 1.25,
            "numFmt": "0.00",
            "font": {
                "name": "Calibri", "size": 11.0, "bold": true, "italic": false,
                "underline": false, "strike": false, "color": "#000000"
            },
            "border": {
                "left": null, "right": null, "top": null,
                "bottom": {"style": "thin", "color": "#FF0000"},
                "diagonal": null
            },
            "color": "#000000",
            "backgroundColor": null
        })
    );
}

#[test]
fn test_workbook_shape_and_names() {
    let mut wb = single_sheet(Worksheet::new("First"));
    wb.add_sheet(Worksheet::new("Second"));
    wb.defined_names = Some(DefinedNames::Mapping(vec![(
        "Rate".into(),
        vec![DefinedName::new("Rate", "First!$B$1")],
    )]));

    let json = snapshot(&wb, None);
    assert_eq!(json["file"], "fixture.xlsx");
    assert_eq!(
        json["definedNames"],
        json!([{"name": "Rate", "attr_text": "First!$B$1"}])
    );
    let order: Vec<&str> = json["sheets"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(order, vec!["First", "Second"]);
}

#[test]
fn test_dates_serialize_iso() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let mut ws = Worksheet::new("S");
    ws.set_cell(at("A1"), Cell::with_value(CellValue::Date(date)));
    ws.set_cell(
        at("A2"),
        Cell::with_value(CellValue::DateTime(date.and_hms_opt(13, 5, 0).unwrap())),
    );
    let json = snapshot(&single_sheet(ws), None);
    let cells = &json["sheets"]["S"]["cells"];
    assert_eq!(cells["A1"]["value"], "2024-02-29");
    assert_eq!(cells["A2"]["value"], "2024-02-29T13:05:00");
}
