// Workbook-level defined names → [{name, attr_text}]

use sheetprint_model::{DefinedName, DefinedNames};

use crate::record::DefinedNameRecord;

type NamesExtractor = fn(&DefinedNames) -> Option<Vec<DefinedNameRecord>>;

/// Shapes tried in order; the first one producing entries wins.
const NAME_EXTRACTORS: [(&str, NamesExtractor); 2] =
    [("mapping", from_mapping), ("list", from_list)];

pub fn extract_defined_names(names: Option<&DefinedNames>) -> Vec<DefinedNameRecord> {
    let Some(names) = names else {
        return Vec::new();
    };
    for (label, extract) in NAME_EXTRACTORS {
        if let Some(records) = extract(names).filter(|r| !r.is_empty()) {
            log::debug!("{} defined names read from {label} shape", records.len());
            return records;
        }
    }
    Vec::new()
}

/// An entry's own name takes precedence over the key it is grouped under.
fn from_mapping(names: &DefinedNames) -> Option<Vec<DefinedNameRecord>> {
    let DefinedNames::Mapping(groups) = names else {
        return None;
    };
    Some(
        groups
            .iter()
            .flat_map(|(key, entries)| {
                entries.iter().map(move |dn| DefinedNameRecord {
                    name: dn.name.clone().or_else(|| Some(key.clone())),
                    attr_text: dn.attr_text.clone(),
                })
            })
            .collect(),
    )
}

fn from_list(names: &DefinedNames) -> Option<Vec<DefinedNameRecord>> {
    let DefinedNames::List(list) = names else {
        return None;
    };
    Some(list.iter().map(record).collect())
}

fn record(dn: &DefinedName) -> DefinedNameRecord {
    DefinedNameRecord {
        name: dn.name.clone(),
        attr_text: dn.attr_text.clone(),
    }
}
