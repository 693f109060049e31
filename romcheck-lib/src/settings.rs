//! Application settings stored in `~/.config/romcheck/settings.toml`.
//!
//! Every field has a default, so a missing file, a missing section, or a
//! missing key all fall back to built-in values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use romcheck_dat::ClassifierConfig;
use romcheck_dat::cache::default_cache_dir;
use romcheck_dat::loader::{DEFAULT_REMOTE_BASE, default_bundled_dir};
use serde::{Deserialize, Serialize};

use crate::error::ValidateError;

/// Canonical path to the settings file: `~/.config/romcheck/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romcheck").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sources: SourceSettings,
    pub cache: CacheSettings,
    pub classifier: ClassifierConfig,
}

/// `[sources]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Base URL of the remote catalog mirror
    pub remote_base: String,
    /// Directory holding bundled catalogs (default: data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundled_dir: Option<PathBuf>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            bundled_dir: None,
        }
    }
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Durable cache directory (default: cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub ttl_hours: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_hours: 24,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, ValidateError> {
        toml::from_str(text).map_err(|e| ValidateError::settings(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ValidateError> {
        toml::to_string_pretty(self).map_err(|e| ValidateError::settings(e.to_string()))
    }

    /// Load settings from `path` (or the canonical path). A missing or
    /// unreadable file yields defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(settings_path);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("No settings at {}: {e}", path.display());
                return Self::default();
            }
        };
        match Self::from_toml_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log::debug!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Durable cache directory, configured or default.
    pub fn cache_dir(&self) -> Result<PathBuf, ValidateError> {
        match &self.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_cache_dir()?),
        }
    }

    /// Bundled catalog directory, configured or default.
    pub fn bundled_dir(&self) -> Result<PathBuf, ValidateError> {
        match &self.sources.bundled_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_bundled_dir()?),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_hours.saturating_mul(60 * 60))
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
