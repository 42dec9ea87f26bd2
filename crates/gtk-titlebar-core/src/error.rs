//! Error types for gtk-titlebar-core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration inputs.
///
/// Resolution and propagation never fail; only the explicit loaders for
/// settings files and theme catalogs return these.
#[derive(Debug, Error)]
pub enum TitlebarError {
    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// YAML content could not be parsed.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON content could not be parsed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings file could not be parsed.
    #[error("Invalid settings: {0}")]
    Jsonc(#[from] json5::Error),

    /// A catalog file had an extension we do not know how to parse.
    #[error("Unsupported catalog format: {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A variant name other than `light` or `dark`.
    #[error("Unknown variant '{0}' (expected 'light' or 'dark')")]
    UnknownVariant(String),
}

impl TitlebarError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Result type for gtk-titlebar-core operations.
pub type Result<T> = std::result::Result<T, TitlebarError>;
