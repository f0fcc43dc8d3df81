//! Write-once session persistence.
//!
//! One JSON file per scoring cycle, named by its UTC timestamp. Files are
//! never overwritten and never read back by this service; they exist for
//! offline review.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::models::screening::Session;

/// Timestamp format shared by the session field and the file name.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Creates the data directory if needed. Called once at startup.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;
        info!("Session store ready at {}", self.dir.display());
        Ok(())
    }

    pub fn timestamp_now() -> String {
        Utc::now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Writes the session as pretty-printed JSON to
    /// `session_<timestamp>.json` and returns the file name. `create_new`
    /// enforces write-once: an existing file is an error, never clobbered.
    pub fn persist(&self, session: &Session) -> Result<String> {
        let name = format!("session_{}.json", session.timestamp);
        let path = self.dir.join(&name);

        let json = serde_json::to_string_pretty(session)
            .context("Failed to serialize session")?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create session file {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write session file {}", path.display()))?;

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::screening::ScoreResult;

    fn sample_session(timestamp: &str) -> Session {
        Session {
            timestamp: timestamp.to_string(),
            job_description: "Senior backend engineer".to_string(),
            resume_text: "5 years Go".to_string(),
            results: vec![ScoreResult {
                id: "q1".to_string(),
                question: "Why?".to_string(),
                answer: "Because.".to_string(),
                score: 8,
                rationale: "Strong detail on retries".to_string(),
            }],
        }
    }

    #[test]
    fn test_persist_writes_named_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        let name = store.persist(&sample_session("20250101T120000Z")).unwrap();
        assert_eq!(name, "session_20250101T120000Z.json");

        let written = std::fs::read_to_string(dir.path().join(&name)).unwrap();
        let parsed: Session = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.results[0].score, 8);
        // pretty-printed, matching the historical session files
        assert!(written.contains("\n  \"timestamp\""));
    }

    #[test]
    fn test_persist_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let session = sample_session("20250101T120000Z");

        store.persist(&session).unwrap();
        assert!(store.persist(&session).is_err());
    }

    #[test]
    fn test_timestamp_format_is_compact_utc() {
        let ts = SessionStore::timestamp_now();
        // e.g. 20250829T143000Z
        assert_eq!(ts.len(), 16);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[8..9], "T");
        assert!(ts[..8].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("data"));
        store.ensure_dir().unwrap();
        store.ensure_dir().unwrap();
        assert!(dir.path().join("data").is_dir());
    }
}
