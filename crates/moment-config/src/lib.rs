//! Configuration and persistence for the moment meditation timer.
//!
//! # Features
//!
//! - **Catalog**: load ambient channels and bells from `catalog.toml`, or use the built-in set
//! - **Settings**: volumes, selected bell and channel, and session length in `settings.toml`
//! - **Journal**: newest-first session history in `sessions.json`
//! - **Paths**: platform-specific configuration directory
//!
//! # Example
//!
//! ```rust,no_run
//! use moment_config::{SessionJournal, SessionRecord, Settings, paths};
//!
//! let dir = paths::user_config_dir();
//! let mut settings = Settings::load(paths::settings_path(&dir))?;
//! settings.set("duration", "20")?;
//! settings.save(paths::settings_path(&dir))?;
//!
//! let journal = SessionJournal::open(paths::journal_path(&dir));
//! let id = journal.record(SessionRecord::new(chrono::Utc::now(), 1200, "", "Rain", "Chime"))?;
//! journal.update_reflection(&id, "calm")?;
//! # Ok::<(), moment_config::ConfigError>(())
//! ```

mod catalog_file;
mod error;
mod journal;
mod settings;

/// Platform-specific paths for configuration files.
pub mod paths;

pub use catalog_file::{load_catalog, save_catalog};
pub use error::ConfigError;
pub use journal::{DEFAULT_LIST_LIMIT, SessionJournal, SessionRecord, default_export_name};
pub use settings::{
    DURATION_PRESETS_MINUTES, MAX_DURATION_SECONDS, MIN_DURATION_SECONDS, Settings,
};
