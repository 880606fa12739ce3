//! Ambient channels and bell presets.
//!
//! The catalog is immutable configuration handed to the session controller at
//! construction. It serializes to TOML so users can add their own channels
//! and bells:
//!
//! ```toml
//! [[channels]]
//! id = 0
//! name = "Silence"
//! kind = { type = "silence" }
//!
//! [[channels]]
//! id = 3
//! name = "Drone"
//! kind = { type = "drone", frequency_hz = 220.0 }
//!
//! [[bells]]
//! id = 0
//! name = "Singing Bowl"
//! frequency_hz = 528.0
//! decay_seconds = 4.0
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// What an ambient channel plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelKind {
    /// No sound and no voice.
    Silence,
    /// Looping pink noise ("rain").
    #[serde(rename = "noise")]
    GeneratedNoise,
    /// Low-passed white noise with a slow volume swell.
    #[serde(rename = "waves")]
    GeneratedWaves,
    /// Sine drone with gentle vibrato.
    #[serde(rename = "drone")]
    GeneratedDrone {
        /// Carrier frequency in Hz
        frequency_hz: f32,
    },
    /// A looping WAV file.
    #[serde(rename = "file")]
    FileBacked {
        /// Path to the WAV file
        path: PathBuf,
    },
}

/// One selectable ambient soundscape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientChannelSpec {
    /// Unique channel id
    pub id: u32,
    /// Display name
    pub name: String,
    /// Sound source
    pub kind: ChannelKind,
}

impl AmbientChannelSpec {
    /// Create a channel spec.
    pub fn new(id: u32, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// Whether this is the silent channel.
    pub fn is_silence(&self) -> bool {
        matches!(self.kind, ChannelKind::Silence)
    }
}

/// One bell preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BellSpec {
    /// Unique bell id
    pub id: u32,
    /// Display name
    pub name: String,
    /// Fundamental frequency in Hz
    pub frequency_hz: f32,
    /// Seconds until the bell has died away
    pub decay_seconds: f32,
}

impl BellSpec {
    /// Create a bell spec.
    pub fn new(id: u32, name: impl Into<String>, frequency_hz: f32, decay_seconds: f32) -> Self {
        Self {
            id,
            name: name.into(),
            frequency_hz,
            decay_seconds,
        }
    }
}

/// Ordered channels and bells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Ambient channels, in display order
    pub channels: Vec<AmbientChannelSpec>,
    /// Bells, in display order
    pub bells: Vec<BellSpec>,
}

impl Catalog {
    /// Build a catalog, rejecting inconsistent input.
    pub fn new(channels: Vec<AmbientChannelSpec>, bells: Vec<BellSpec>) -> Result<Self> {
        let catalog = Self { channels, bells };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check id uniqueness, the single Silence channel, and tone parameters.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if !seen.insert(channel.id) {
                return Err(EngineError::InvalidCatalog(format!(
                    "duplicate channel id {}",
                    channel.id
                )));
            }
            if let ChannelKind::GeneratedDrone { frequency_hz } = channel.kind
                && !(frequency_hz.is_finite() && frequency_hz > 0.0)
            {
                return Err(EngineError::InvalidCatalog(format!(
                    "channel {} has drone frequency {frequency_hz}",
                    channel.id
                )));
            }
        }

        let silent = self.channels.iter().filter(|c| c.is_silence()).count();
        if silent != 1 {
            return Err(EngineError::InvalidCatalog(format!(
                "expected exactly one silence channel, found {silent}"
            )));
        }

        let mut seen = HashSet::new();
        for bell in &self.bells {
            if !seen.insert(bell.id) {
                return Err(EngineError::InvalidCatalog(format!(
                    "duplicate bell id {}",
                    bell.id
                )));
            }
            if !(bell.frequency_hz.is_finite() && bell.frequency_hz > 0.0) {
                return Err(EngineError::InvalidCatalog(format!(
                    "bell {} has frequency {}",
                    bell.id, bell.frequency_hz
                )));
            }
            if !(bell.decay_seconds.is_finite() && bell.decay_seconds > 0.0) {
                return Err(EngineError::InvalidCatalog(format!(
                    "bell {} has decay {}",
                    bell.id, bell.decay_seconds
                )));
            }
        }

        Ok(())
    }

    /// Look up a channel by id.
    pub fn channel(&self, id: u32) -> Option<&AmbientChannelSpec> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Look up a bell by id.
    pub fn bell(&self, id: u32) -> Option<&BellSpec> {
        self.bells.iter().find(|b| b.id == id)
    }

    /// The silent channel.
    pub fn silence(&self) -> Option<&AmbientChannelSpec> {
        self.channels.iter().find(|c| c.is_silence())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            channels: vec![
                AmbientChannelSpec::new(0, "Silence", ChannelKind::Silence),
                AmbientChannelSpec::new(1, "Rain", ChannelKind::GeneratedNoise),
                AmbientChannelSpec::new(2, "Waves", ChannelKind::GeneratedWaves),
                AmbientChannelSpec::new(
                    3,
                    "Drone",
                    ChannelKind::GeneratedDrone {
                        frequency_hz: 220.0,
                    },
                ),
            ],
            bells: vec![
                BellSpec::new(0, "Singing Bowl", 528.0, 4.0),
                BellSpec::new(1, "Temple Bell", 440.0, 3.0),
                BellSpec::new(2, "Chime", 880.0, 2.0),
                BellSpec::new(3, "Deep Gong", 220.0, 5.0),
                BellSpec::new(4, "Crystal", 1046.0, 3.0),
            ],
        }
    }
}
