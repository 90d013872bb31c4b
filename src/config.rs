//! Persisted per-user defaults: model, system prompt, and max diff chars.
//!
//! A missing or corrupt config file reads as empty defaults; only writes
//! can fail. Loaded once at startup and threaded through call sites.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Diff size cap used when neither the CLI nor the config specifies one.
pub const DEFAULT_MAX_CHARS: usize = 15_000;

/// Persisted defaults, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Custom system prompt replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Maximum diff characters sent to the LLM before truncation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

impl Settings {
    /// Path of the config file: `<config_dir>/engrave/config.json`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("engrave").join("config.json"))
    }

    /// Load persisted settings, falling back to empty defaults.
    ///
    /// An unreadable or unparseable file logs a warning and yields
    /// defaults rather than failing the invocation.
    pub fn load() -> Self {
        let path = match Self::path() {
            Ok(p) => p,
            Err(_) => return Self::default(),
        };
        Self::load_from(&path)
    }

    fn load_from(path: &PathBuf) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring corrupt config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Persist the settings, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(path, content).map_err(ConfigError::WriteFailed)?;
        Ok(())
    }

    /// Delete the persisted config. Deleting an absent file is a no-op.
    pub fn reset() -> Result<(), ConfigError> {
        let path = Self::path()?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::RemoveFailed(e)),
        }
    }

    /// Effective max-chars, after the per-invocation override.
    pub fn effective_max_chars(&self, override_value: Option<usize>) -> usize {
        override_value
            .or(self.max_chars)
            .unwrap_or(DEFAULT_MAX_CHARS)
    }
}
