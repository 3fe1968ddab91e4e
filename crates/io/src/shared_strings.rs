// sharedStrings.xml: plain and rich (run-formatted) strings

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sheetprint_model::{CellContent, CellValue, Font, TextRun};

use crate::xlsx_styles::apply_font_property;
use crate::xml::event_text;

#[derive(Debug, Clone, PartialEq)]
pub enum SharedString {
    Plain(String),
    Rich(Vec<TextRun>),
}

impl SharedString {
    pub fn to_content(&self) -> CellContent {
        match self {
            SharedString::Plain(s) => CellContent::Value(CellValue::Text(s.clone())),
            SharedString::Rich(runs) => CellContent::Rich(runs.clone()),
        }
    }
}

/// Parser state for one `<si>` (or an inline `<is>`) string item.
#[derive(Default)]
pub(crate) struct StringItem {
    plain: String,
    runs: Vec<TextRun>,
    run: Option<TextRun>,
    in_rpr: bool,
    in_t: bool,
    in_phonetic: bool,
}

impl StringItem {
    pub(crate) fn open(&mut self, e: &BytesStart, empty: bool) {
        if self.in_rpr {
            if let Some(run) = self.run.as_mut() {
                apply_font_property(run.font.get_or_insert_with(Font::default), e);
            }
            return;
        }
        match e.local_name().as_ref() {
            b"r" if !empty => self.run = Some(TextRun::default()),
            b"rPr" => {
                if let Some(run) = self.run.as_mut() {
                    run.font = Some(Font::default());
                    self.in_rpr = !empty;
                }
            }
            b"rPh" if !empty => self.in_phonetic = true,
            b"t" if !empty => self.in_t = true,
            _ => {}
        }
    }

    pub(crate) fn close(&mut self, name: &[u8]) {
        match name {
            b"rPr" => self.in_rpr = false,
            b"t" => self.in_t = false,
            b"rPh" => self.in_phonetic = false,
            b"r" => {
                if let Some(run) = self.run.take() {
                    self.runs.push(run);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn text(&mut self, text: &str) {
        if !self.in_t || self.in_phonetic {
            return;
        }
        match self.run.as_mut() {
            Some(run) => run.text.push_str(text),
            None => self.plain.push_str(text),
        }
    }

    pub(crate) fn finish(self) -> SharedString {
        if self.runs.is_empty() {
            return SharedString::Plain(self.plain);
        }
        let mut runs = self.runs;
        if !self.plain.is_empty() {
            runs.insert(0, TextRun::plain(self.plain));
        }
        SharedString::Rich(runs)
    }
}

/// Parse the shared string table. Whitespace inside `<t>` is significant.
pub fn parse_shared_strings(xml: &str) -> Result<Vec<SharedString>, String> {
    let mut strings = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut item: Option<StringItem> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| e.to_string())? {
            Event::Start(ref e) if e.local_name().as_ref() == b"si" => {
                item = Some(StringItem::default());
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                strings.push(SharedString::Plain(String::new()));
            }
            Event::Start(ref e) => {
                if let Some(item) = item.as_mut() {
                    item.open(e, false);
                }
            }
            Event::Empty(ref e) => {
                if let Some(item) = item.as_mut() {
                    item.open(e, true);
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"si" => {
                if let Some(done) = item.take() {
                    strings.push(done.finish());
                }
            }
            Event::End(ref e) => {
                if let Some(item) = item.as_mut() {
                    item.close(e.local_name().as_ref());
                }
            }
            Event::Eof => break,
            ref other => {
                if let (Some(item), Some(text)) = (item.as_mut(), event_text(other)) {
                    item.text(&text);
                }
            }
        }
        buf.clear();
    }

    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetprint_model::ColorRef;

    const SST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="5" uniqueCount="5">
<si><t>Hello</t></si>
<si><t xml:space="preserve">  padded  </t></si>
<si><r><t>Bold </t></r><r><rPr><b/><sz val="12"/><color theme="5"/><rFont val="Arial"/></rPr><t>part</t></r></si>
<si><t>Tom &amp; Jerry &lt;3</t></si>
<si><t>漢字</t><rPh sb="0" eb="2"><t>カンジ</t></rPh></si>
<si/>
</sst>"#;

    #[test]
    fn test_plain_strings() {
        let strings = parse_shared_strings(SST).unwrap();
        assert_eq!(strings.len(), 6);
        assert_eq!(strings[0], SharedString::Plain("Hello".into()));
        assert_eq!(strings[1], SharedString::Plain("  padded  ".into()));
        assert_eq!(strings[3], SharedString::Plain("Tom & Jerry <3".into()));
        assert_eq!(strings[5], SharedString::Plain(String::new()));
    }

    #[test]
    fn test_phonetic_runs_skipped() {
        let strings = parse_shared_strings(SST).unwrap();
        assert_eq!(strings[4], SharedString::Plain("漢字".into()));
    }

    #[test]
    fn test_rich_runs() {
        let strings = parse_shared_strings(SST).unwrap();
        let SharedString::Rich(runs) = &strings[2] else {
            panic!("expected rich string, got {:?}", strings[2]);
        };
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], TextRun::plain("Bold "));
        assert_eq!(runs[1].text, "part");
        let font = runs[1].font.as_ref().unwrap();
        assert_eq!(font.bold, Some(true));
        assert_eq!(font.size, Some(12.0));
        assert_eq!(font.name.as_deref(), Some("Arial"));
        assert_eq!(font.color, Some(ColorRef::theme(5)));
    }

    #[test]
    fn test_to_content() {
        let rich = SharedString::Rich(vec![TextRun::plain("a"), TextRun::plain("b")]);
        assert!(matches!(rich.to_content(), CellContent::Rich(ref r) if r.len() == 2));
        assert_eq!(
            SharedString::Plain("x".into()).to_content(),
            CellContent::Value(CellValue::Text("x".into()))
        );
    }

    #[test]
    fn test_malformed() {
        assert!(parse_shared_strings("<sst><si><t>a</si></sst>").is_err());
    }
}
