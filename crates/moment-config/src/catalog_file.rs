//! Loading the channel and bell catalog from disk.

use std::path::Path;

use moment_engine::{Catalog, ChannelKind, EngineError};

use crate::error::{ConfigError, write_creating_parents};

/// Load a catalog from a TOML file, or the built-in catalog if the file
/// does not exist.
///
/// Relative paths of file-backed channels are resolved against the
/// directory containing the catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no catalog file; using built-in catalog");
        return Ok(Catalog::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let mut catalog: Catalog = toml::from_str(&content)?;

    if let Some(base) = path.parent() {
        for channel in &mut catalog.channels {
            if let ChannelKind::FileBacked { path: file } = &mut channel.kind
                && file.is_relative()
            {
                *file = base.join(&*file);
            }
        }
    }

    catalog.validate().map_err(|e| invalid(path, e))?;
    tracing::info!(
        path = %path.display(),
        channels = catalog.channels.len(),
        bells = catalog.bells.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Write a catalog as TOML, creating parent directories.
pub fn save_catalog(catalog: &Catalog, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    catalog.validate().map_err(|e| invalid(path, e))?;
    let content = toml::to_string_pretty(catalog)?;
    write_creating_parents(path, content)
}

fn invalid(path: &Path, err: EngineError) -> ConfigError {
    let reason = match err {
        EngineError::InvalidCatalog(reason) => reason,
        other => other.to_string(),
    };
    ConfigError::InvalidCatalog {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let catalog = load_catalog(dir.path().join("catalog.toml")).unwrap();
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn test_relative_file_paths_resolve_next_to_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
bells = []

[[channels]]
id = 0
name = "Silence"
kind = { type = "silence" }

[[channels]]
id = 1
name = "Creek"
kind = { type = "file", path = "sounds/creek.wav" }
"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(
            catalog.channel(1).unwrap().kind,
            ChannelKind::FileBacked {
                path: dir.path().join("sounds/creek.wav")
            }
        );
    }

    #[test]
    fn test_invalid_catalog_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
channels = []

[[bells]]
id = 0
name = "Broken"
frequency_hz = -5.0
decay_seconds = 1.0
"#,
        )
        .unwrap();

        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCatalog { .. }), "{err}");
        assert!(err.to_string().contains("catalog.toml"));
    }
}
