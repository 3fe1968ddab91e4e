// OPC package access: zip parts and relationship files

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::IoError;
use crate::xml::attr;

pub const REL_WORKSHEET: &str = "/worksheet";
pub const REL_STYLES: &str = "/styles";
pub const REL_SHARED_STRINGS: &str = "/sharedStrings";
pub const REL_THEME: &str = "/theme";
pub const REL_HYPERLINK: &str = "/hyperlink";
pub const REL_TABLE: &str = "/table";

/// One `<Relationship>` from a `.rels` part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

impl Relationship {
    /// Relationship types are namespace URIs; match on the trailing segment.
    pub fn has_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    pub fn first_of_type(&self, suffix: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.has_type(suffix))
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

pub fn parse_relationships(xml: &str) -> Result<Relationships, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    rels.push(Relationship {
                        id,
                        rel_type: attr(e, b"Type").unwrap_or_default(),
                        target,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }
    Ok(Relationships { rels })
}

/// The `.rels` part describing `part`: `xl/workbook.xml` → `xl/_rels/workbook.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the part that owns the `.rels`.
/// Absolute targets (`/xl/...`) are package-rooted; relative ones may climb
/// with `..`.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// A readable `.xlsx` package.
pub struct Package<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl Package<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, IoError> {
        let file = File::open(path).map_err(|e| IoError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> Package<R> {
    pub fn from_reader(reader: R) -> Result<Self, IoError> {
        let archive = ZipArchive::new(reader).map_err(|e| IoError::Zip(e.to_string()))?;
        Ok(Self { archive })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a part as UTF-8 text. `Ok(None)` when the part does not exist.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>, IoError> {
        Ok(self
            .read_part_bytes(name)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn read_part_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>, IoError> {
        if !self.has_part(name) {
            return Ok(None);
        }
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|e| IoError::Zip(format!("{name}: {e}")))?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| IoError::Zip(format!("{name}: {e}")))?;
        Ok(Some(content))
    }

    /// A part the package cannot do without.
    pub fn require_part(&mut self, name: &str) -> Result<String, IoError> {
        self.read_part(name)?
            .ok_or_else(|| IoError::MissingPart(name.to_string()))
    }

    /// Relationships of `part`; a missing `.rels` part means none.
    pub fn relationships(&mut self, part: &str) -> Result<Relationships, IoError> {
        let rels_path = rels_path_for(part);
        match self.read_part(&rels_path)? {
            Some(xml) => parse_relationships(&xml).map_err(|message| IoError::Xml {
                part: rels_path,
                message,
            }),
            None => Ok(Relationships::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.org/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = parse_relationships(WORKBOOK_RELS).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId1").unwrap().target, "worksheets/sheet1.xml");
        assert!(rels.get("rId1").unwrap().has_type(REL_WORKSHEET));
        assert_eq!(rels.first_of_type(REL_STYLES).unwrap().id, "rId3");

        let link = rels.get("rId9").unwrap();
        assert!(link.has_type(REL_HYPERLINK));
        assert_eq!(link.target, "https://example.org/?a=1&b=2");
        assert!(rels.get("rId404").is_none());
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(
            rels_path_for("xl/worksheets/sheet2.xml"),
            "xl/worksheets/_rels/sheet2.xml.rels"
        );
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("xl/workbook.xml", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("xl/worksheets/sheet1.xml", "../tables/table1.xml"), "xl/tables/table1.xml");
        assert_eq!(resolve_target("xl/workbook.xml", "/xl/styles.xml"), "xl/styles.xml");
        assert_eq!(resolve_target("xl/workbook.xml", "./theme/theme1.xml"), "xl/theme/theme1.xml");
    }
}
