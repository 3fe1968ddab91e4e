// Export defaults
// Loaded from ~/.config/sheetprint/settings.toml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Indent JSON output by two spaces.
    pub pretty: bool,

    /// Write one file per sheet into the output directory.
    pub split_sheets: bool,

    /// Sheets to export. Empty = all.
    pub sheets: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pretty: true,
            split_sheets: false,
            sheets: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Read { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
            SettingsError::Parse { path, message } => {
                write!(f, "invalid settings in {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl Settings {
    /// Default settings file path, if the platform has a config directory
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sheetprint").join("settings.toml"))
    }

    /// Parse a settings file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load `explicit` if given, else the default file if it exists.
    /// Unreadable or malformed files fall back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) if path.exists() => path,
                _ => return Self::default(),
            },
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("warning: {}", e);
                eprintln!("Using default settings");
                Self::default()
            }
        }
    }

    /// Sheet filter, `None` when every sheet is exported
    pub fn sheet_filter(&self) -> Option<&[String]> {
        if self.sheets.is_empty() {
            None
        } else {
            Some(&self.sheets)
        }
    }
}
