//! The local preference store. It holds a single value: the theme.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

const APP_NAME: &str = "skilldocs";
const PREFS_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

/// Reads and writes the theme preference.
///
/// Backed by a JSON file, or by memory only (nothing survives the process).
#[derive(Debug, Default)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    memory: Option<Theme>,
}

impl PreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            memory: None,
        }
    }

    /// Store in the user's config directory.
    pub fn open_default() -> Result<Self, PreferenceError> {
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or(PreferenceError::NoConfigDir)?;
        Ok(Self::at(dirs.config_dir().join(PREFS_FILE)))
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// The stored theme, or the default when unset or unreadable.
    pub fn load_theme(&self) -> Theme {
        let Some(path) = &self.path else {
            return self.memory.unwrap_or_default();
        };

        match self.read(path) {
            Ok(prefs) => prefs.theme.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to load preferences, using defaults: {}", e);
                Theme::default()
            }
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        let Some(path) = &self.path else {
            self.memory = Some(theme);
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let prefs = Preferences { theme: Some(theme) };
        fs::write(path, serde_json::to_string_pretty(&prefs)?)?;
        Ok(())
    }

    fn read(&self, path: &PathBuf) -> Result<Preferences, PreferenceError> {
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
