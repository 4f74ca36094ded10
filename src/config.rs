//! Settings for the completion engine.
//!
//! Settings come either from a YAML file or from a host that exposes a
//! `get_setting(name)` lookup. Missing keys fall back to their defaults.
//!
//! Format:
//! ```yaml
//! show_only_last_word: true
//! preload_files:
//!   - "/usr/local/include/mylib/*.h"
//!   - "~/project/common/**/*.h"
//! exclude_files:
//!   - generated.h
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IndexerError, Result};

/// Default name of the settings file
pub const SETTINGS_FILENAME: &str = ".symbol-complete.yml";

/// Include recursion stops below this depth unless configured otherwise
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master switch; a disabled engine ignores every event
    pub enabled: bool,

    /// Raises the log level of the binary to `debug`
    pub debug: bool,

    /// Placeholders hold only the trailing identifier of each parameter
    pub show_only_last_word: bool,

    /// Suffix display keys with a tab and a hint (parameters or file name)
    pub annotate: bool,

    /// Glob patterns of files that stay indexed regardless of focus
    pub preload_files: Vec<String>,

    /// Basenames dropped from the preload matches
    pub exclude_files: Vec<String>,

    pub max_include_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            debug: false,
            show_only_last_word: false,
            annotate: true,
            preload_files: Vec::new(),
            exclude_files: Vec::new(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// Host-side settings lookup, one value per setting name
pub trait SettingsSource {
    fn get_setting(&self, name: &str) -> Option<Value>;
}

impl SettingsSource for serde_json::Map<String, Value> {
    fn get_setting(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Settings {
    /// Parses YAML settings content
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| IndexerError::Config(format!("Invalid settings YAML: {}", e)))
    }

    /// Reads and parses a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Builds settings from a host lookup. A value of the wrong type is
    /// ignored and the default is kept.
    pub fn from_source(source: &dyn SettingsSource) -> Self {
        let defaults = Self::default();
        Self {
            enabled: lookup(source, "enabled", defaults.enabled),
            debug: lookup(source, "debug", defaults.debug),
            show_only_last_word: lookup(
                source,
                "show_only_last_word",
                defaults.show_only_last_word,
            ),
            annotate: lookup(source, "annotate", defaults.annotate),
            preload_files: lookup(source, "preload_files", defaults.preload_files),
            exclude_files: lookup(source, "exclude_files", defaults.exclude_files),
            max_include_depth: lookup(source, "max_include_depth", defaults.max_include_depth),
        }
    }
}

fn lookup<T>(source: &dyn SettingsSource, name: &str, default: T) -> T
where
    T: serde::de::DeserializeOwned,
{
    match source.get_setting(name) {
        Some(value) => match serde_json::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Ignoring setting '{}': {}", name, e);
                default
            }
        },
        None => default,
    }
}
