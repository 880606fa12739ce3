//! Error types for the audio engine.

use std::path::PathBuf;

use moment_synth::ToneError;

/// Errors reported by the audio engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No audio output is available on this system.
    #[error("audio output is not supported on this system")]
    UnsupportedPlatform,

    /// No ambient channel with this id exists in the catalog.
    #[error("unknown ambient channel id {0}")]
    InvalidChannelId(u32),

    /// No bell with this id exists in the catalog.
    #[error("unknown bell id {0}")]
    InvalidBellId(u32),

    /// The context could not be resumed; it stays suspended.
    #[error("audio context resume was blocked; retry from a user action")]
    AutoplayBlocked,

    /// A tone was requested with unusable parameters.
    #[error("invalid tone: {0}")]
    InvalidTone(#[from] ToneError),

    /// An audio file could not be read or written.
    #[error("audio file error at {path}: {source}")]
    Media {
        /// File that failed
        path: PathBuf,
        /// Underlying WAV error
        #[source]
        source: hound::Error,
    },

    /// Audio stream setup or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The channel/bell catalog is inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl EngineError {
    /// Wrap a WAV error with the file it concerns.
    pub fn media(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Media {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
