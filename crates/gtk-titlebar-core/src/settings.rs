//! Read access to the editor's configuration.
//!
//! The resolver needs two keys, [`MODE_KEY`] and [`THEME_KEY`]. It reads
//! them through [`SettingsReader`], so the host can back it with whatever
//! store it has. [`JsonSettings`] reads a VS Code style `settings.json`
//! (comments and trailing commas allowed); [`MapSettings`] is an in-memory
//! map for tests and embedding.
//!
//! A reader never fails: a key it cannot supply is simply absent, and the
//! resolver falls back to its defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, TitlebarError};

/// Setting that selects `light`, `dark` or `auto`.
pub const MODE_KEY: &str = "gtkTitleBar.mode";

/// Setting that names the active color theme.
pub const THEME_KEY: &str = "workbench.colorTheme";

/// Abstraction over the host's configuration store.
pub trait SettingsReader {
    /// Get a string setting, or `None` if it is absent or not a string.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: SettingsReader + ?Sized> SettingsReader for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// In-memory settings.
#[derive(Debug, Clone, Default)]
pub struct MapSettings {
    values: HashMap<String, String>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl SettingsReader for MapSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Settings read from a JSON object.
///
/// Keys are looked up verbatim first (`"gtkTitleBar.mode": "dark"`), then as
/// a dotted path into nested objects (`"gtkTitleBar": { "mode": "dark" }`).
#[derive(Debug, Clone, Default)]
pub struct JsonSettings {
    values: Map<String, Value>,
    source_path: Option<PathBuf>,
}

impl JsonSettings {
    /// Parse settings from JSON text. `//` and `/* */` comments and trailing
    /// commas are accepted, as in editor settings files.
    pub fn from_json(text: &str) -> Result<Self> {
        let values: Map<String, Value> = json5::from_str(text)?;
        Ok(Self {
            values,
            source_path: None,
        })
    }

    /// Read and parse a settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| TitlebarError::read(path, e))?;
        let mut settings = Self::from_json(&content)?;
        settings.source_path = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Read a settings file, treating any failure as "no settings".
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "settings unavailable, using defaults");
                Self {
                    values: Map::new(),
                    source_path: Some(path.to_path_buf()),
                }
            }
        }
    }

    /// Read a settings file that may not exist yet.
    ///
    /// A missing file is "no settings". A file that exists but cannot be read
    /// or parsed is an error, so a caller reacting to edits can tell a
    /// half-written file apart from a deleted one.
    pub fn load_if_present<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::from_file(path) {
            Err(TitlebarError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(Self {
                    values: Map::new(),
                    source_path: Some(path.to_path_buf()),
                })
            }
            other => other,
        }
    }

    /// The file these settings were read from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }

        let mut parts = key.split('.');
        let first = parts.next()?;
        parts.try_fold(self.values.get(first)?, |value, part| value.get(part))
    }
}

impl SettingsReader for JsonSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.lookup(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
