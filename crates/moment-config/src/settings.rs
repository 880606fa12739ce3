//! User settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, write_creating_parents};

/// Shortest allowed session, in seconds.
pub const MIN_DURATION_SECONDS: u32 = 60;
/// Longest allowed session, in seconds.
pub const MAX_DURATION_SECONDS: u32 = 180 * 60;
/// Preset session lengths, in minutes.
pub const DURATION_PRESETS_MINUTES: [u32; 5] = [5, 10, 15, 20, 30];

/// Persistent user preferences.
///
/// # TOML Format
///
/// ```toml
/// bell_id = 0
/// channel_id = 2
/// bell_volume = 0.8
/// ambient_volume = 0.5
/// duration_seconds = 900
/// ```
///
/// Missing keys take their defaults; out-of-range values are clamped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bell rung at the end of a session.
    pub bell_id: u32,
    /// Last ambient channel.
    pub channel_id: u32,
    /// Bell volume in [0, 1].
    pub bell_volume: f32,
    /// Ambient volume in [0, 1].
    pub ambient_volume: f32,
    /// Session length.
    pub duration_seconds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bell_id: 0,
            channel_id: 0,
            bell_volume: 0.8,
            ambient_volume: 0.5,
            duration_seconds: 900,
        }
    }
}

fn clamp_volume(v: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(0.0, 1.0) }
}

impl Settings {
    /// Names accepted by [`set`](Self::set).
    pub const KEYS: [&'static str; 5] = [
        "bell",
        "channel",
        "bell_volume",
        "ambient_volume",
        "duration",
    ];

    /// Bring every value into range.
    #[must_use]
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        Self {
            bell_volume: clamp_volume(self.bell_volume, defaults.bell_volume),
            ambient_volume: clamp_volume(self.ambient_volume, defaults.ambient_volume),
            duration_seconds: self
                .duration_seconds
                .clamp(MIN_DURATION_SECONDS, MAX_DURATION_SECONDS),
            ..self
        }
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        Ok(settings.clamped())
    }

    /// Save settings, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        write_creating_parents(path, content)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Update one setting from its textual form.
    ///
    /// `duration` is given in minutes, volumes in [0, 1]. Values are
    /// clamped like on load; unparseable values are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parse_u32 = || {
            value
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid_setting(key, value, e.to_string()))
        };
        let parse_f32 = || {
            value
                .trim()
                .parse::<f32>()
                .map_err(|e| ConfigError::invalid_setting(key, value, e.to_string()))
        };

        match key {
            "bell" | "bell_id" => self.bell_id = parse_u32()?,
            "channel" | "channel_id" => self.channel_id = parse_u32()?,
            "bell_volume" => self.bell_volume = parse_f32()?,
            "ambient_volume" => self.ambient_volume = parse_f32()?,
            "duration" => {
                let minutes = parse_u32()?;
                if minutes == 0 || minutes > MAX_DURATION_SECONDS / 60 {
                    return Err(ConfigError::invalid_setting(
                        key,
                        value,
                        "expected 1 to 180 minutes",
                    ));
                }
                self.duration_seconds = minutes * 60;
            }
            other => return Err(ConfigError::UnknownSetting(other.to_string())),
        }
        *self = self.clone().clamped();
        Ok(())
    }

    /// Session length in whole minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_seconds / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.bell_id, 0);
        assert_eq!(s.channel_id, 0);
        assert_eq!(s.bell_volume, 0.8);
        assert_eq!(s.ambient_volume, 0.5);
        assert_eq!(s.duration_minutes(), 15);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let s = Settings::from_toml("channel_id = 3").unwrap();
        assert_eq!(s.channel_id, 3);
        assert_eq!(s.duration_seconds, 900);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let s = Settings::from_toml(
            "bell_volume = 3.5\nambient_volume = -1.0\nduration_seconds = 5",
        )
        .unwrap();
        assert_eq!(s.bell_volume, 1.0);
        assert_eq!(s.ambient_volume, 0.0);
        assert_eq!(s.duration_seconds, MIN_DURATION_SECONDS);

        let s = Settings::from_toml("duration_seconds = 999999").unwrap();
        assert_eq!(s.duration_seconds, MAX_DURATION_SECONDS);
    }

    #[test]
    fn test_set_by_key() {
        let mut s = Settings::default();
        s.set("duration", "20").unwrap();
        s.set("bell", "3").unwrap();
        s.set("ambient_volume", "1.5").unwrap();
        assert_eq!(s.duration_seconds, 1200);
        assert_eq!(s.bell_id, 3);
        assert_eq!(s.ambient_volume, 1.0);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut s = Settings::default();
        assert!(matches!(
            s.set("theme", "dark"),
            Err(ConfigError::UnknownSetting(_))
        ));
        assert!(matches!(
            s.set("bell_volume", "loud"),
            Err(ConfigError::InvalidSetting { .. })
        ));
        assert!(matches!(
            s.set("duration", "0"),
            Err(ConfigError::InvalidSetting { .. })
        ));
        assert!(s.set("duration", "181").is_err());
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Settings::from_toml("bell_volume = \"loud\""),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
