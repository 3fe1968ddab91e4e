// Small helpers shared by the OOXML part parsers

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// Text for a general entity reference event (`&amp;`, `&#10;`, ...).
/// Unknown entities are kept literally.
pub fn general_ref_text(r: &BytesRef) -> String {
    if let Ok(Some(ch)) = r.resolve_char_ref() {
        return ch.to_string();
    }
    let name = String::from_utf8_lossy(r.as_ref());
    match resolve_predefined_entity(&name) {
        Some(text) => text.to_string(),
        None => format!("&{name};"),
    }
}

/// Character data carried by an event. Entity references arrive as their
/// own events, so callers append every piece in order.
pub fn event_text(event: &Event) -> Option<String> {
    match event {
        Event::Text(e) => Some(
            e.xml_content()
                .map(|t| t.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned()),
        ),
        Event::CData(e) => Some(String::from_utf8_lossy(e.as_ref()).into_owned()),
        Event::GeneralRef(e) => Some(general_ref_text(e)),
        _ => None,
    }
}

/// Attribute value by local name, unescaped. Namespace prefixes are ignored.
/// A value with an unknown entity is returned as written.
pub fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    let a = e
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)?;
    Some(match a.decode_and_unescape_value(e.decoder()) {
        Ok(v) => v.into_owned(),
        Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
    })
}

/// Attribute parsed with `FromStr`; unparsable values count as absent.
pub fn attr_parse<T: std::str::FromStr>(e: &BytesStart, key: &[u8]) -> Option<T> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// OOXML boolean: `1` / `true` / `on`.
pub fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "true" | "on")
}

pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr(e, key).map(|v| parse_bool(&v))
}

/// Toggle elements like `<b/>` are true unless `val` says otherwise.
pub fn toggle(e: &BytesStart) -> bool {
    attr_bool(e, b"val").unwrap_or(true)
}
