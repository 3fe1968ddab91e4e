// Defined names (named ranges and named formulas)

/// A single `<definedName>` entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinedName {
    pub name: Option<String>,
    /// Formula text the name refers to, e.g. `Sheet1!$A$1:$B$4`.
    pub attr_text: Option<String>,
}

impl DefinedName {
    pub fn new(name: impl Into<String>, attr_text: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attr_text: Some(attr_text.into()),
            ..Default::default()
        }
    }
}

/// Defined names as a source exposes them. Sources differ: some group the
/// definitions by name (one entry per scope), older ones hand over the flat
/// element list.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinedNames {
    Mapping(Vec<(String, Vec<DefinedName>)>),
    List(Vec<DefinedName>),
}
