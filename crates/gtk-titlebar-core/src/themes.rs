//! Installed-theme metadata.
//!
//! The resolver only needs to know, for each installed color theme, its name
//! and whether it is light or dark. The host supplies that list; this module
//! gives it a type ([`ThemeCatalog`]) and a few ways to build one:
//!
//! - from a catalog file, a YAML or JSON list of `{ name, variant }`,
//! - from editor extension manifests, whose `contributes.themes` entries
//!   carry a `uiTheme` base (`vs`, `vs-dark`, `hc-black`, `hc-light`).
//!
//! ```rust
//! use gtk_titlebar_core::{ThemeCatalog, Variant};
//!
//! let catalog = ThemeCatalog::from_yaml(r#"
//! - name: Monokai
//!   variant: dark
//! - name: Quiet Light
//!   variant: light
//! "#).unwrap();
//!
//! assert_eq!(catalog.variant_of("Monokai"), Some(Variant::Dark));
//! ```
//!
//! Order is significant: when two entries share a name, the first one wins.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TitlebarError};
use crate::variant::Variant;

/// One installed color theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    pub name: String,
    pub variant: Variant,
}

impl ThemeInfo {
    pub fn new(name: impl Into<String>, variant: Variant) -> Self {
        Self {
            name: name.into(),
            variant,
        }
    }
}

/// An ordered list of installed themes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeCatalog {
    themes: Vec<ThemeInfo>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a theme.
    pub fn add(mut self, name: impl Into<String>, variant: Variant) -> Self {
        self.push(ThemeInfo::new(name, variant));
        self
    }

    pub fn push(&mut self, theme: ThemeInfo) {
        self.themes.push(theme);
    }

    /// Append every theme of `other`, after the existing ones.
    pub fn extend(&mut self, other: ThemeCatalog) {
        self.themes.extend(other.themes);
    }

    pub fn themes(&self) -> &[ThemeInfo] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// The variant of the first theme called `name`.
    pub fn variant_of(&self, name: &str) -> Option<Variant> {
        self.themes
            .iter()
            .find(|theme| theme.name == name)
            .map(|theme| theme.variant)
    }

    /// Parse a YAML list of `{ name, variant }`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document is an empty catalog, not an error.
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON list of `{ name, variant }`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog file, choosing the parser by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml,
            Some("json") => Self::from_json,
            _ => return Err(TitlebarError::UnsupportedFormat(path.to_path_buf())),
        };

        let content =
            std::fs::read_to_string(path).map_err(|e| TitlebarError::read(path, e))?;
        let catalog = parse(&content)?;
        tracing::debug!(path = %path.display(), themes = catalog.len(), "loaded theme catalog");
        Ok(catalog)
    }

    /// Build a catalog from an extension manifest (`package.json`).
    ///
    /// Each `contributes.themes` entry is named by its `id`, or its `label`
    /// when it has no id. Entries with an unknown `uiTheme` or no name are
    /// skipped.
    pub fn from_manifest(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        for contribution in manifest.contributes.themes {
            let Some(name) = contribution.id.or(contribution.label) else {
                tracing::debug!("skipping theme contribution without id or label");
                continue;
            };
            match variant_for_ui_theme(&contribution.ui_theme) {
                Some(variant) => catalog.push(ThemeInfo::new(name, variant)),
                None => tracing::debug!(
                    theme = %name,
                    ui_theme = %contribution.ui_theme,
                    "skipping theme with unknown uiTheme"
                ),
            }
        }

        Ok(catalog)
    }

    /// Read an extension manifest file.
    pub fn from_manifest_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| TitlebarError::read(path, e))?;
        Self::from_manifest(&content)
    }
}

impl AsRef<[ThemeInfo]> for ThemeCatalog {
    fn as_ref(&self) -> &[ThemeInfo] {
        &self.themes
    }
}

impl From<Vec<ThemeInfo>> for ThemeCatalog {
    fn from(themes: Vec<ThemeInfo>) -> Self {
        Self { themes }
    }
}

impl FromIterator<ThemeInfo> for ThemeCatalog {
    fn from_iter<I: IntoIterator<Item = ThemeInfo>>(iter: I) -> Self {
        Self {
            themes: iter.into_iter().collect(),
        }
    }
}

/// Map an editor `uiTheme` base to a variant.
pub fn variant_for_ui_theme(ui_theme: &str) -> Option<Variant> {
    match ui_theme {
        "vs" | "hc-light" => Some(Variant::Light),
        "vs-dark" | "hc-black" => Some(Variant::Dark),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    contributes: Contributes,
}

#[derive(Debug, Default, Deserialize)]
struct Contributes {
    #[serde(default)]
    themes: Vec<ThemeContribution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeContribution {
    id: Option<String>,
    label: Option<String>,
    #[serde(default)]
    ui_theme: String,
}
