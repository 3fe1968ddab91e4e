//! styles.xml parser: number formats, fonts, fills, borders and the cellXfs
//! table that cells reference through their `s` attribute.
//!
//! Colors are kept as references (rgb / indexed / theme + tint); resolving
//! them to hex happens at extraction time against the workbook theme.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sheetprint_model::{
    Alignment, Border, Cell, ColorRef, Edge, Fill, Font, GradientFill, PatternFill,
};

use crate::numfmt::builtin_format_code;
use crate::xml::{attr, attr_bool, attr_parse, toggle};

// =============================================================================
// Public types
// =============================================================================

/// One resolved `<xf>` from cellXfs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    pub number_format: String,
    pub font: Option<Font>,
    pub fill: Option<Fill>,
    pub border: Option<Border>,
    pub alignment: Option<Alignment>,
}

impl CellStyle {
    pub fn apply_to(&self, cell: &mut Cell) {
        cell.number_format = Some(self.number_format.clone());
        cell.font = self.font.clone();
        cell.fill = self.fill.clone();
        cell.border = self.border.clone();
        cell.alignment = self.alignment.clone();
    }
}

/// Parsed style table from styles.xml, indexed by cellXfs position.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: Vec<CellStyle>,
}

impl StyleTable {
    pub fn get(&self, id: usize) -> Option<&CellStyle> {
        self.styles.get(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

// =============================================================================
// Color and font properties (shared with rich-text run properties)
// =============================================================================

/// Color reference from a `<color>`, `<fgColor>` or `<bgColor>` element.
/// Prefers rgb > indexed > theme; `auto` colors carry no reference.
pub fn parse_color(e: &BytesStart) -> Option<ColorRef> {
    if let Some(hex) = attr(e, b"rgb") {
        return Some(ColorRef::Rgb(hex));
    }
    if let Some(idx) = attr_parse::<u32>(e, b"indexed") {
        return Some(ColorRef::Indexed(idx));
    }
    if let Some(slot) = attr_parse::<u32>(e, b"theme") {
        return Some(ColorRef::Theme {
            slot,
            tint: attr_parse(e, b"tint"),
        });
    }
    None
}

/// Apply one child of `<font>` / `<rPr>` to `font`.
pub fn apply_font_property(font: &mut Font, e: &BytesStart) {
    match e.local_name().as_ref() {
        b"b" => font.bold = Some(toggle(e)),
        b"i" => font.italic = Some(toggle(e)),
        b"strike" => font.strike = Some(toggle(e)),
        b"u" => font.underline = Some(attr(e, b"val").unwrap_or_else(|| "single".to_string())),
        b"sz" => font.size = attr_parse(e, b"val"),
        b"name" | b"rFont" => font.name = attr(e, b"val"),
        b"color" => font.color = parse_color(e),
        _ => {}
    }
}

// =============================================================================
// styles.xml parser
// =============================================================================

/// Parse styles.xml content into a StyleTable. Malformed sections end early
/// with whatever was read so far.
pub fn parse_styles_xml(xml: &str) -> StyleTable {
    let custom_num_fmts = parse_num_fmts(xml);
    let fonts = parse_fonts(xml);
    let fills = parse_fills(xml);
    let borders = parse_borders(xml);
    let styles = parse_cell_xfs(xml, &custom_num_fmts, &fonts, &fills, &borders);

    log::debug!(
        "styles: {} number formats, {} fonts, {} fills, {} borders, {} cell formats",
        custom_num_fmts.len(),
        fonts.len(),
        fills.len(),
        borders.len(),
        styles.len()
    );
    StyleTable { styles }
}

fn parse_error(section: &str, err: quick_xml::Error) {
    log::warn!("styles.xml: stopped reading <{section}>: {err}");
}

/// Parse <numFmts> section → HashMap<formatId, formatCode>
fn parse_num_fmts(xml: &str) -> HashMap<u32, String> {
    let mut map = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_num_fmts = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"numFmts" => {
                in_num_fmts = true;
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"numFmts" => break,
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if in_num_fmts && e.local_name().as_ref() == b"numFmt" =>
            {
                if let (Some(id), Some(code)) =
                    (attr_parse::<u32>(e, b"numFmtId"), attr(e, b"formatCode"))
                {
                    map.insert(id, code);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                parse_error("numFmts", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    map
}

/// Parse <fonts> section.
fn parse_fonts(xml: &str) -> Vec<Font> {
    let mut fonts = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_fonts = false;
    let mut in_font = false;
    let mut current = Font::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"fonts" => in_fonts = true,
                b"font" if in_fonts => {
                    in_font = true;
                    current = Font::default();
                }
                _ if in_font => apply_font_property(&mut current, e),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"font" if in_fonts => fonts.push(Font::default()),
                _ if in_font => apply_font_property(&mut current, e),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"font" if in_font => {
                    fonts.push(std::mem::take(&mut current));
                    in_font = false;
                }
                b"fonts" if in_fonts => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                parse_error("fonts", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    fonts
}

/// Fill state across `<fills>` events.
#[derive(Default)]
struct FillCollector {
    in_fills: bool,
    in_fill: bool,
    current: Option<Fill>,
    fills: Vec<Fill>,
}

impl FillCollector {
    fn open(&mut self, e: &BytesStart, empty: bool) {
        let name = e.local_name();
        match name.as_ref() {
            b"fills" => self.in_fills = !empty,
            b"fill" if self.in_fills => {
                if empty {
                    self.fills.push(Fill::Pattern(PatternFill::default()));
                } else {
                    self.in_fill = true;
                    self.current = None;
                }
            }
            b"patternFill" if self.in_fill => {
                self.current = Some(Fill::Pattern(PatternFill {
                    pattern_type: attr(e, b"patternType"),
                    ..Default::default()
                }));
            }
            b"fgColor" if self.in_fill => {
                if let Some(Fill::Pattern(pattern)) = self.current.as_mut() {
                    pattern.fg_color = parse_color(e);
                }
            }
            b"bgColor" if self.in_fill => {
                if let Some(Fill::Pattern(pattern)) = self.current.as_mut() {
                    pattern.bg_color = parse_color(e);
                }
            }
            b"gradientFill" if self.in_fill => {
                self.current = Some(Fill::Gradient(GradientFill {
                    gradient_type: attr(e, b"type"),
                }));
            }
            _ => {}
        }
    }

    /// Returns true once `</fills>` is reached.
    fn close(&mut self, name: &[u8]) -> bool {
        match name {
            b"fill" if self.in_fill => {
                let fill = self
                    .current
                    .take()
                    .unwrap_or_else(|| Fill::Pattern(PatternFill::default()));
                self.fills.push(fill);
                self.in_fill = false;
            }
            b"fills" => return self.in_fills,
            _ => {}
        }
        false
    }
}

/// Parse <fills> section. A `<fill>` with no recognizable child becomes a
/// pattern fill with no type.
fn parse_fills(xml: &str) -> Vec<Fill> {
    let mut collector = FillCollector::default();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => collector.open(e, false),
            Ok(Event::Empty(ref e)) => collector.open(e, true),
            Ok(Event::End(ref e)) => {
                if collector.close(e.local_name().as_ref()) {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                parse_error("fills", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    collector.fills
}

fn edge_mut<'a>(border: &'a mut Border, side: &[u8]) -> Option<&'a mut Edge> {
    match side {
        b"left" | b"start" => Some(&mut border.left),
        b"right" | b"end" => Some(&mut border.right),
        b"top" => Some(&mut border.top),
        b"bottom" => Some(&mut border.bottom),
        b"diagonal" => Some(&mut border.diagonal),
        _ => None,
    }
}

fn edge_style(e: &BytesStart) -> Option<String> {
    attr(e, b"style").filter(|s| s != "none")
}

/// Parse <borders> section.
fn parse_borders(xml: &str) -> Vec<Border> {
    let mut borders = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_borders = false;
    let mut in_border = false;
    let mut current = Border::default();
    let mut current_side: Option<Vec<u8>> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"borders" => in_borders = true,
                    b"border" if in_borders => {
                        in_border = true;
                        current = Border::default();
                    }
                    b"color" if in_border => {
                        if let Some(side) = current_side.as_deref() {
                            if let Some(edge) = edge_mut(&mut current, side) {
                                edge.color = parse_color(e);
                            }
                        }
                    }
                    side if in_border => {
                        if let Some(edge) = edge_mut(&mut current, side) {
                            edge.style = edge_style(e);
                            current_side = Some(side.to_vec());
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"border" if in_borders => borders.push(Border::default()),
                    b"color" if in_border => {
                        if let Some(side) = current_side.as_deref() {
                            if let Some(edge) = edge_mut(&mut current, side) {
                                edge.color = parse_color(e);
                            }
                        }
                    }
                    side if in_border => {
                        if let Some(edge) = edge_mut(&mut current, side) {
                            edge.style = edge_style(e);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"border" if in_border => {
                        borders.push(std::mem::take(&mut current));
                        in_border = false;
                    }
                    b"borders" if in_borders => break,
                    side if current_side.as_deref() == Some(side) => current_side = None,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                parse_error("borders", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    borders
}

fn parse_alignment(e: &BytesStart) -> Alignment {
    Alignment {
        horizontal: attr(e, b"horizontal"),
        vertical: attr(e, b"vertical"),
        wrap_text: attr_bool(e, b"wrapText"),
        indent: attr_parse(e, b"indent"),
        text_rotation: attr_parse(e, b"textRotation"),
        shrink_to_fit: attr_bool(e, b"shrinkToFit"),
    }
}

/// Raw `<xf>` ids before lookup.
#[derive(Debug, Default)]
struct XfEntry {
    num_fmt_id: u32,
    font_id: Option<usize>,
    fill_id: Option<usize>,
    border_id: Option<usize>,
    alignment: Option<Alignment>,
}

impl XfEntry {
    fn from_xf(e: &BytesStart) -> Self {
        Self {
            num_fmt_id: attr_parse(e, b"numFmtId").unwrap_or(0),
            font_id: attr_parse(e, b"fontId"),
            fill_id: attr_parse(e, b"fillId"),
            border_id: attr_parse(e, b"borderId"),
            alignment: None,
        }
    }
}

/// Parse <cellXfs> and resolve each <xf> against the component tables.
fn parse_cell_xfs(
    xml: &str,
    custom_num_fmts: &HashMap<u32, String>,
    fonts: &[Font],
    fills: &[Fill],
    borders: &[Border],
) -> Vec<CellStyle> {
    let resolve = |entry: XfEntry| CellStyle {
        number_format: custom_num_fmts
            .get(&entry.num_fmt_id)
            .cloned()
            .or_else(|| builtin_format_code(entry.num_fmt_id).map(str::to_string))
            .unwrap_or_else(|| "General".to_string()),
        font: entry.font_id.and_then(|i| fonts.get(i)).cloned(),
        fill: entry.fill_id.and_then(|i| fills.get(i)).cloned(),
        border: entry.border_id.and_then(|i| borders.get(i)).cloned(),
        alignment: entry.alignment,
    };

    let mut styles = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_cell_xfs = false;
    let mut current: Option<XfEntry> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => current = Some(XfEntry::from_xf(e)),
                b"alignment" => {
                    if let Some(entry) = current.as_mut() {
                        entry.alignment = Some(parse_alignment(e));
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"xf" if in_cell_xfs => styles.push(resolve(XfEntry::from_xf(e))),
                b"alignment" => {
                    if let Some(entry) = current.as_mut() {
                        entry.alignment = Some(parse_alignment(e));
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"xf" => {
                    if let Some(entry) = current.take() {
                        styles.push(resolve(entry));
                    }
                }
                b"cellXfs" if in_cell_xfs => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                parse_error("cellXfs", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    styles
}
