use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// A sheet filter was given and no sheet in the workbook matched it.
    SheetNotFound(Vec<String>),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SheetNotFound(names) if names.len() == 1 => {
                write!(f, "sheet '{}' not found in workbook", names[0])
            }
            Self::SheetNotFound(names) if names.is_empty() => {
                write!(f, "no sheets found to export")
            }
            Self::SheetNotFound(names) => {
                let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
                write!(f, "none of the sheets {} found in workbook", quoted.join(", "))
            }
        }
    }
}

impl std::error::Error for ExtractError {}
