//! Theme color table construction.
//!
//! A workbook source may expose its theme as a parsed color scheme, as the raw
//! theme part, or both. Extractors are tried in rank order; the first one that
//! yields a non-empty table wins. When all fail the table is empty and
//! theme-indexed colors resolve to nothing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sheetprint_model::{SchemeColor, ThemeSlot, ThemeSource};

use crate::color::ThemeColorTable;

type ThemeExtractor = fn(&ThemeSource) -> Option<ThemeColorTable>;

/// Ranked: structured scheme first, raw XML as fallback.
const THEME_EXTRACTORS: [(&str, ThemeExtractor); 2] =
    [("color scheme", from_scheme), ("theme XML", from_raw_xml)];

impl ThemeColorTable {
    pub fn build(source: &ThemeSource) -> Self {
        for (label, extract) in THEME_EXTRACTORS {
            match extract(source) {
                Some(table) if !table.is_empty() => {
                    log::debug!("theme colors taken from {label} ({} slots)", table.len());
                    return table;
                }
                _ => log::trace!("no theme colors from {label}"),
            }
        }
        log::debug!("no theme colors available; theme-indexed colors will not resolve");
        ThemeColorTable::default()
    }
}

/// Scheme entries are accepted only as 6 hex digits.
fn accept_scheme_hex(val: &str) -> Option<String> {
    if val.len() == 6 && val.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(format!("#{}", val.to_ascii_uppercase()))
    } else {
        None
    }
}

fn scheme_value(color: &SchemeColor) -> Option<&str> {
    match color {
        SchemeColor::Srgb(val) => Some(val),
        SchemeColor::System { last_color, .. } => last_color.as_deref(),
    }
}

fn from_scheme(source: &ThemeSource) -> Option<ThemeColorTable> {
    let scheme = source.scheme.as_ref()?;
    Some(ThemeColorTable::from_entries(ThemeSlot::ALL.iter().filter_map(|slot| {
        let hex = scheme.get(*slot).and_then(scheme_value).and_then(accept_scheme_hex)?;
        Some((slot.index(), hex))
    })))
}

fn from_raw_xml(source: &ThemeSource) -> Option<ThemeColorTable> {
    parse_theme_xml(source.raw_xml.as_deref()?)
}

// =============================================================================
// Raw theme XML
// =============================================================================

/// Collects `srgbClr/@val` and `sysClr/@lastClr` per slot inside the first
/// `clrScheme`. Namespace prefixes are ignored.
#[derive(Default)]
struct SchemeCollector {
    in_scheme: bool,
    seen_scheme: bool,
    current: Option<ThemeSlot>,
    srgb: [Option<String>; 12],
    system: [Option<String>; 12],
}

impl SchemeCollector {
    fn open(&mut self, e: &BytesStart, empty: bool) {
        let local = e.local_name();
        let name = local.as_ref();

        if name == b"clrScheme" && !self.seen_scheme {
            self.seen_scheme = true;
            self.in_scheme = !empty;
            return;
        }
        if !self.in_scheme {
            return;
        }

        match self.current {
            None => {
                if !empty {
                    self.current = ThemeSlot::ALL
                        .iter()
                        .copied()
                        .find(|slot| slot.xml_tag().as_bytes() == name);
                }
            }
            Some(slot) => match name {
                b"srgbClr" => {
                    if let Some(val) = attr_value(e, b"val") {
                        self.srgb[slot.index()].get_or_insert(val);
                    }
                }
                b"sysClr" => {
                    if let Some(val) = attr_value(e, b"lastClr") {
                        self.system[slot.index()].get_or_insert(val);
                    }
                }
                _ => {}
            },
        }
    }

    /// Returns true once the color scheme has closed.
    fn close(&mut self, name: &[u8]) -> bool {
        if !self.in_scheme {
            return false;
        }
        if name == b"clrScheme" {
            self.in_scheme = false;
            return true;
        }
        if let Some(slot) = self.current {
            if slot.xml_tag().as_bytes() == name {
                self.current = None;
            }
        }
        false
    }

    fn into_table(self) -> Option<ThemeColorTable> {
        if !self.seen_scheme {
            return None;
        }
        let SchemeCollector { srgb, system, .. } = self;
        let entries = srgb
            .into_iter()
            .zip(system)
            .enumerate()
            .filter_map(|(idx, (srgb, system))| {
                let hex = srgb.or(system).and_then(|v| accept_scheme_hex(&v))?;
                Some((idx, hex))
            });
        Some(ThemeColorTable::from_entries(entries))
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Parse the color scheme out of a theme part (`xl/theme/theme1.xml`).
/// Returns `None` if the document is malformed or has no color scheme.
pub fn parse_theme_xml(xml: &[u8]) -> Option<ThemeColorTable> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut collector = SchemeCollector::default();

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
                log::debug!("theme XML unreadable: {e}");
                return None;
            }
            _ => {}
        }
        buf.clear();
    }

    collector.into_table()
}
