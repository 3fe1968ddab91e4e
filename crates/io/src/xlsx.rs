//! XLSX reader for the styled view: every cell with its style facets,
//! formulas as text, and the sheet metadata the snapshot reports.
//!
//! The package is walked the way the relationships describe it:
//! `_rels/.rels` → workbook part → its rels (sheets, styles, shared
//! strings, theme) → each worksheet's rels (hyperlinks, tables).

use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use sheetprint_model::{
    CellRange, DefinedName, DefinedNames, Hyperlink, SheetState, Table, ThemeSource, Workbook,
    Worksheet,
};

use crate::error::IoError;
use crate::package::{
    resolve_target, Package, Relationships, REL_HYPERLINK, REL_SHARED_STRINGS, REL_STYLES,
    REL_TABLE, REL_THEME, REL_WORKSHEET,
};
use crate::shared_strings::parse_shared_strings;
use crate::worksheet::{parse_worksheet, PendingHyperlink, SheetContext};
use crate::xlsx_styles::{parse_styles_xml, StyleTable};
use crate::xml::{attr, attr_bool, event_text};

const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";
const REL_OFFICE_DOCUMENT: &str = "/officeDocument";

// =============================================================================
// workbook.xml
// =============================================================================

/// A `<sheet>` entry of workbook.xml.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetEntry {
    pub name: String,
    pub state: SheetState,
    pub rel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkbookInfo {
    pub sheets: Vec<SheetEntry>,
    pub defined_names: Vec<DefinedName>,
    pub date1904: bool,
}

pub fn parse_workbook_xml(xml: &str) -> Result<WorkbookInfo, String> {
    let mut info = WorkbookInfo::default();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut current_name: Option<DefinedName> = None;
    let mut name_text = String::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| e.to_string())? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"workbookPr" => {
                info.date1904 = attr_bool(e, b"date1904").unwrap_or(false);
            }
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sheet" => {
                if let Some(name) = attr(e, b"name") {
                    info.sheets.push(SheetEntry {
                        name,
                        state: attr(e, b"state")
                            .map(|s| SheetState::parse(&s))
                            .unwrap_or_default(),
                        rel_id: attr(e, b"id"),
                    });
                }
            }
            Event::Start(ref e) if e.local_name().as_ref() == b"definedName" => {
                name_text.clear();
                current_name = Some(DefinedName {
                    name: attr(e, b"name"),
                    attr_text: None,
                });
            }
            Event::End(ref e) if e.local_name().as_ref() == b"definedName" => {
                if let Some(mut dn) = current_name.take() {
                    dn.attr_text = Some(name_text.trim().to_string());
                    info.defined_names.push(dn);
                }
            }
            Event::Eof => break,
            ref other => {
                if current_name.is_some() {
                    if let Some(text) = event_text(other) {
                        name_text.push_str(&text);
                    }
                }
            }
        }
        buf.clear();
    }

    Ok(info)
}

/// Group names by their `name` attribute, first appearance first. Sheet-scoped
/// definitions of the same name land in the same group.
fn group_defined_names(names: Vec<DefinedName>) -> Option<DefinedNames> {
    if names.is_empty() {
        return None;
    }
    let mut groups: Vec<(String, Vec<DefinedName>)> = Vec::new();
    for dn in names {
        let key = dn.name.clone().unwrap_or_default();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, entries)) => entries.push(dn),
            None => groups.push((key, vec![dn])),
        }
    }
    Some(DefinedNames::Mapping(groups))
}

// =============================================================================
// Table parts
// =============================================================================

/// The root `<table>` element of a table part.
pub fn parse_table_xml(xml: &str) -> Option<Table> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"table" =>
            {
                return Some(Table {
                    name: attr(e, b"name"),
                    display_name: attr(e, b"displayName"),
                    reference: attr(e, b"ref"),
                });
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

// =============================================================================
// Package walk
// =============================================================================

/// Read the styled view of the workbook at `path`.
pub fn read_workbook(path: &Path) -> Result<Workbook, IoError> {
    let mut package = Package::open(path)?;
    read_package(&mut package)
}

fn locate_workbook_part<R: Read + Seek>(package: &mut Package<R>) -> Result<String, IoError> {
    let root = package.relationships("")?;
    Ok(root
        .first_of_type(REL_OFFICE_DOCUMENT)
        .map(|rel| resolve_target("", &rel.target))
        .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_string()))
}

/// Part named by the first relationship of `rel_type`, else `fallback`.
fn related_part(rels: &Relationships, workbook_part: &str, rel_type: &str, fallback: &str) -> String {
    rels.first_of_type(rel_type)
        .map(|rel| resolve_target(workbook_part, &rel.target))
        .unwrap_or_else(|| fallback.to_string())
}

pub fn read_package<R: Read + Seek>(package: &mut Package<R>) -> Result<Workbook, IoError> {
    let workbook_part = locate_workbook_part(package)?;
    let workbook_xml = package.require_part(&workbook_part)?;
    let info = parse_workbook_xml(&workbook_xml).map_err(|message| IoError::Xml {
        part: workbook_part.clone(),
        message,
    })?;
    let rels = package.relationships(&workbook_part)?;

    let mut workbook = Workbook::new();
    workbook.date1904 = info.date1904;
    workbook.defined_names = group_defined_names(info.defined_names);

    let theme_part = related_part(&rels, &workbook_part, REL_THEME, "xl/theme/theme1.xml");
    if let Some(raw) = package.read_part_bytes(&theme_part)? {
        workbook.theme = ThemeSource::from_raw(raw);
    } else {
        log::debug!("no theme part; theme colors will not resolve");
    }

    let styles_part = related_part(&rels, &workbook_part, REL_STYLES, "xl/styles.xml");
    let styles = match package.read_part(&styles_part)? {
        Some(xml) => parse_styles_xml(&xml),
        None => StyleTable::default(),
    };

    let strings_part =
        related_part(&rels, &workbook_part, REL_SHARED_STRINGS, "xl/sharedStrings.xml");
    let shared_strings = match package.read_part(&strings_part)? {
        Some(xml) => parse_shared_strings(&xml).map_err(|message| IoError::Xml {
            part: strings_part.clone(),
            message,
        })?,
        None => Vec::new(),
    };

    let ctx = SheetContext {
        shared_strings: &shared_strings,
        styles: &styles,
        date1904: info.date1904,
    };

    for entry in &info.sheets {
        let Some(rel) = entry.rel_id.as_deref().and_then(|id| rels.get(id)) else {
            log::warn!("sheet {:?} has no relationship; skipped", entry.name);
            continue;
        };
        if !rel.has_type(REL_WORKSHEET) {
            // Chartsheets and dialog sheets hold no cells
            log::debug!("sheet {:?} is not a worksheet; skipped", entry.name);
            continue;
        }
        let part = resolve_target(&workbook_part, &rel.target);
        let xml = package.require_part(&part)?;
        let parsed = parse_worksheet(&entry.name, &xml, &ctx).map_err(|message| IoError::Xml {
            part: part.clone(),
            message,
        })?;

        let mut worksheet = parsed.worksheet;
        worksheet.state = entry.state;
        let sheet_rels = package.relationships(&part)?;
        attach_hyperlinks(&mut worksheet, &parsed.hyperlinks, &sheet_rels);
        for rel_id in &parsed.table_rel_ids {
            let Some(rel) = sheet_rels.get(rel_id).filter(|r| r.has_type(REL_TABLE)) else {
                continue;
            };
            let table_part = resolve_target(&part, &rel.target);
            if let Some(table) = package
                .read_part(&table_part)?
                .as_deref()
                .and_then(parse_table_xml)
            {
                worksheet.tables.push(table);
            }
        }

        log::debug!(
            "read sheet {:?}: {} cells from {part}",
            worksheet.title,
            worksheet.cell_count()
        );
        workbook.add_sheet(worksheet);
    }

    Ok(workbook)
}

/// Largest hyperlink range expanded cell by cell.
const MAX_HYPERLINK_CELLS: u64 = 100_000;

/// Attach each hyperlink to every cell of its reference range. External
/// targets come from the sheet relationships; in-workbook ones from
/// `location`.
///
/// Oversized ranges are clipped to the sheet's extent (declared dimension,
/// else stored cells); when that is still too large only the top-left cell
/// gets the link.
fn attach_hyperlinks(ws: &mut Worksheet, pending: &[PendingHyperlink], rels: &Relationships) {
    let extent = ws
        .dimension
        .as_deref()
        .and_then(CellRange::parse)
        .or_else(|| ws.bounds());
    for link in pending {
        let Some(mut range) = CellRange::parse(&link.reference) else {
            log::debug!("hyperlink with unusable ref {:?} skipped", link.reference);
            continue;
        };
        if range.cell_count() > MAX_HYPERLINK_CELLS {
            let clipped = extent
                .and_then(|e| range.intersect(&e))
                .filter(|r| r.cell_count() <= MAX_HYPERLINK_CELLS)
                .unwrap_or(CellRange::new(range.start, range.start));
            log::warn!(
                "sheet {:?}: hyperlink over {} clipped to {}",
                ws.title,
                link.reference,
                clipped
            );
            range = clipped;
        }
        let target = link
            .rel_id
            .as_deref()
            .and_then(|id| rels.get(id))
            .filter(|rel| rel.has_type(REL_HYPERLINK))
            .map(|rel| rel.target.clone());
        let hyperlink = Hyperlink {
            target,
            location: link.location.clone(),
            tooltip: link.tooltip.clone(),
        };
        for addr in range.addresses() {
            ws.cell_mut(addr).hyperlink = Some(hyperlink.clone());
        }
    }
}
