//! Platform-specific locations of moment's files.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/moment/` (Linux), `~/Library/Application Support/moment/` (macOS), `%APPDATA%\moment\` (Windows)
//!
//! Inside it:
//!
//! - `settings.toml`: volumes, selected bell and channel, session length
//! - `catalog.toml`: optional channel and bell catalog override
//! - `sessions.json`: the session journal

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "moment";

/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.toml";
/// Catalog override file name.
pub const CATALOG_FILE: &str = "catalog.toml";
/// Journal file name.
pub const JOURNAL_FILE: &str = "sessions.json";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Ensure a configuration directory exists.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
        tracing::debug!(dir = %dir.display(), "created config directory");
    }
    Ok(dir.to_path_buf())
}

/// Settings file inside `dir`.
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

/// Catalog override inside `dir`.
pub fn catalog_path(dir: &Path) -> PathBuf {
    dir.join(CATALOG_FILE)
}

/// Journal file inside `dir`.
pub fn journal_path(dir: &Path) -> PathBuf {
    dir.join(JOURNAL_FILE)
}
