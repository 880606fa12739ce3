//! The session journal: a newest-first list of completed sits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, write_creating_parents};

/// Number of entries shown by default when listing.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// One completed meditation session.
///
/// Stored as JSON:
///
/// ```json
/// {
///   "id": "1718000000000",
///   "date": "2024-06-10T06:13:20Z",
///   "duration": 900,
///   "intention": "be patient",
///   "reflection": "",
///   "channel": "Rain",
///   "bell_sound": "Singing Bowl"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique id, the start time in milliseconds.
    pub id: String,
    /// When the session started.
    pub date: DateTime<Utc>,
    /// Time actually sat, in seconds.
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
    /// Intention set before starting; may be empty.
    #[serde(default)]
    pub intention: String,
    /// Reflection written afterwards; may be empty.
    #[serde(default)]
    pub reflection: String,
    /// Ambient channel name.
    #[serde(default)]
    pub channel: String,
    /// Bell name.
    #[serde(default)]
    pub bell_sound: String,
}

impl SessionRecord {
    /// Create a record for a session that started at `date`.
    pub fn new(
        date: DateTime<Utc>,
        duration_seconds: u32,
        intention: impl Into<String>,
        channel: impl Into<String>,
        bell_sound: impl Into<String>,
    ) -> Self {
        Self {
            id: date.timestamp_millis().to_string(),
            date,
            duration_seconds,
            intention: intention.into(),
            reflection: String::new(),
            channel: channel.into(),
            bell_sound: bell_sound.into(),
        }
    }

    /// Whole minutes sat.
    pub fn minutes(&self) -> u32 {
        self.duration_seconds / 60
    }
}

/// Session history stored as a JSON array on disk.
///
/// Every operation reads the file afresh. A missing or unparseable file
/// reads as an empty journal.
#[derive(Debug, Clone)]
pub struct SessionJournal {
    path: PathBuf,
}

impl SessionJournal {
    /// Open the journal at `path`. Nothing is read until it is used.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing this journal.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All sessions, newest first.
    pub fn sessions(&self) -> Vec<SessionRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "journal unreadable; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "journal corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, sessions: &[SessionRecord]) -> Result<(), ConfigError> {
        let json = serde_json::to_string(sessions)?;
        write_creating_parents(&self.path, json)
    }

    /// Add a session at the front. Returns its id, made unique if another
    /// session already has the same one.
    pub fn record(&self, mut record: SessionRecord) -> Result<String, ConfigError> {
        let mut sessions = self.sessions();
        let base = record.id.clone();
        let mut n = 1;
        while sessions.iter().any(|s| s.id == record.id) {
            record.id = format!("{base}-{n}");
            n += 1;
        }
        let id = record.id.clone();
        tracing::info!(id = %id, duration = record.duration_seconds, "session recorded");
        sessions.insert(0, record);
        self.save(&sessions)?;
        Ok(id)
    }

    /// Attach a reflection to a recorded session.
    pub fn update_reflection(&self, id: &str, reflection: &str) -> Result<(), ConfigError> {
        let mut sessions = self.sessions();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ConfigError::SessionNotFound(id.to_string()))?;
        session.reflection = reflection.trim().to_string();
        self.save(&sessions)
    }

    /// The newest `limit` sessions.
    pub fn list(&self, limit: usize) -> Vec<SessionRecord> {
        let mut sessions = self.sessions();
        sessions.truncate(limit);
        sessions
    }

    /// Write every session to `dest` as pretty-printed JSON. Returns the
    /// number exported.
    pub fn export(&self, dest: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let sessions = self.sessions();
        let json = serde_json::to_string_pretty(&sessions)?;
        write_creating_parents(dest.as_ref(), json)?;
        tracing::info!(dest = %dest.as_ref().display(), count = sessions.len(), "journal exported");
        Ok(sessions.len())
    }

    /// Delete every session.
    pub fn clear(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "journal cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::write_file(&self.path, e)),
        }
    }
}

/// Suggested export file name for a given day, e.g. `moment-sessions-2024-06-10.json`.
pub fn default_export_name(date: DateTime<Utc>) -> String {
    format!("moment-sessions-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_record_serializes_with_journal_field_names() {
        let r = SessionRecord::new(at(1_718_000_000), 600, "focus", "Rain", "Chime");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["id"], "1718000000000");
        assert_eq!(json["duration"], 600);
        assert_eq!(json["bell_sound"], "Chime");
        assert_eq!(json["date"], "2024-06-10T06:13:20Z");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let journal = SessionJournal::open(dir.path().join("sessions.json"));
        assert!(journal.sessions().is_empty());
        journal.clear().unwrap();
    }

    #[test]
    fn test_duplicate_ids_are_disambiguated() {
        let dir = TempDir::new().unwrap();
        let journal = SessionJournal::open(dir.path().join("sessions.json"));
        let r = SessionRecord::new(at(100), 60, "", "Silence", "Chime");
        let a = journal.record(r.clone()).unwrap();
        let b = journal.record(r).unwrap();
        assert_eq!(a, "100000");
        assert_eq!(b, "100000-1");
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(
            default_export_name(at(1_718_000_000)),
            "moment-sessions-2024-06-10.json"
        );
    }
}
