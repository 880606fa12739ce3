//! Error types for configuration and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to encode or decode JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog file is inconsistent
    #[error("invalid catalog '{path}': {reason}")]
    InvalidCatalog {
        /// Path of the catalog file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Unknown setting name
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    /// A setting value could not be parsed
    #[error("invalid value '{value}' for setting '{key}': {reason}")]
    InvalidSetting {
        /// Setting name.
        key: String,
        /// Value as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No journal entry with this id
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid setting error.
    pub fn invalid_setting(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Write `contents` to `path`, creating parent directories first.
pub(crate) fn write_creating_parents(
    path: &std::path::Path,
    contents: impl AsRef<[u8]>,
) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| ConfigError::write_file(path, e))
}
