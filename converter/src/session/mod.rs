//! The current open/convert/save session.
//!
//! A session owns at most one [`Conversion`]. Opening a new source replaces
//! the source text and its records together; a failed open leaves the
//! previous conversion in place.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::api::logs::{log_error, log_success};
use crate::error::{SaveError, SessionResult};
use crate::output::{save_output_named, SavedOutput};
use crate::transform::pipeline::{convert_bytes, convert_file, Conversion};
use crate::config::DEFAULT_OUTPUT_NAME;

#[derive(Debug, Clone)]
struct Opened {
    conversion: Conversion,
    opened_at: DateTime<Utc>,
}

/// Shell-owned holder of the current source and its converted output.
#[derive(Debug, Clone)]
pub struct Session {
    current: Option<Opened>,
    output_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session: nothing opened, nothing to save.
    pub fn new() -> Self {
        Self::with_output_name(DEFAULT_OUTPUT_NAME)
    }

    /// Empty session whose directory saves use `output_name`.
    pub fn with_output_name(output_name: impl Into<String>) -> Self {
        Self {
            current: None,
            output_name: output_name.into(),
        }
    }

    /// Open and convert a file.
    pub fn open_path(&mut self, path: &Path, encoding: Option<&str>) -> SessionResult<&Conversion> {
        let conversion = convert_file(path, encoding).map_err(|e| {
            log_error(format!("Open failed: {}", e));
            e
        })?;
        Ok(self.replace(conversion))
    }

    /// Open and convert uploaded bytes.
    pub fn open_bytes(&mut self, bytes: &[u8], origin: &str, encoding: Option<&str>) -> SessionResult<&Conversion> {
        let conversion = convert_bytes(bytes, origin, encoding).map_err(|e| {
            log_error(format!("Open failed: {}", e));
            e
        })?;
        Ok(self.replace(conversion))
    }

    fn replace(&mut self, conversion: Conversion) -> &Conversion {
        let opened = self.current.insert(Opened {
            conversion,
            opened_at: Utc::now(),
        });
        &opened.conversion
    }

    /// Current conversion, if a source is open.
    pub fn conversion(&self) -> Option<&Conversion> {
        self.current.as_ref().map(|o| &o.conversion)
    }

    /// Current source text.
    pub fn source(&self) -> Option<&str> {
        self.conversion().map(|c| c.source.as_str())
    }

    /// Current record blocks; empty when nothing is open.
    pub fn records(&self) -> &[String] {
        self.conversion().map(|c| c.records.as_slice()).unwrap_or(&[])
    }

    /// Preview text of the current conversion.
    pub fn preview(&self) -> Option<String> {
        self.conversion().map(Conversion::preview)
    }

    /// When the current source was opened.
    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|o| o.opened_at)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Save the current records to `path`.
    pub fn save(&self, path: &Path) -> SessionResult<SavedOutput> {
        let records = self.records();
        if records.is_empty() {
            return Err(SaveError::NothingToSave.into());
        }

        let saved = save_output_named(records, path, &self.output_name)?;
        log_success(format!("💾 Saved {} bytes to {}", saved.bytes_written, saved.path.display()));
        Ok(saved)
    }

    /// Drop the current source and output.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, SessionError, SourceError};

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.is_open());
        assert!(session.records().is_empty());
        assert!(session.preview().is_none());
        assert!(session.opened_at().is_none());
    }

    #[test]
    fn test_open_bytes_replaces_state() {
        let mut session = Session::new();
        session.open_bytes(b"A(m)B", "first.txt", None).unwrap();
        assert_eq!(session.records(), ["1\nA;B\n\n"]);

        session.open_bytes(b"C\nD", "second.txt", None).unwrap();
        assert_eq!(session.source(), Some("C\nD"));
        assert_eq!(session.records().len(), 2);
        assert_eq!(session.conversion().unwrap().info.origin, "second.txt");
    }

    #[test]
    fn test_failed_open_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session.open_bytes(b"A(m)B", "first.txt", None).unwrap();

        let result = session.open_path(&dir.path().join("missing.txt"), None);
        assert!(matches!(
            result,
            Err(SessionError::Open(PipelineError::Source(SourceError::NotFound(_))))
        ));
        assert_eq!(session.source(), Some("A(m)B"));
        assert_eq!(session.records(), ["1\nA;B\n\n"]);
    }

    #[test]
    fn test_failed_open_bytes_is_logged() {
        use crate::api::logs::{LogLevel, LOG_BROADCASTER};
        use tokio::sync::broadcast::error::TryRecvError;

        let mut rx = LOG_BROADCASTER.subscribe();
        let mut session = Session::new();
        session.open_bytes(b"A(m)B", "first.txt", None).unwrap();

        let result = session.open_bytes(b"C", "second.txt", Some("klingon-8"));
        assert!(matches!(
            result,
            Err(SessionError::Open(PipelineError::Source(SourceError::Encoding(_))))
        ));
        assert_eq!(session.source(), Some("A(m)B"));

        let mut logged = false;
        loop {
            match rx.try_recv() {
                Ok(entry) => {
                    if entry.level == LogLevel::Error && entry.message.contains("klingon-8") {
                        logged = true;
                    }
                }
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert!(logged);
    }

    #[test]
    fn test_save_without_open() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new();
        let result = session.save(&dir.path().join("out.csv"));
        assert!(matches!(result, Err(SessionError::Save(SaveError::NothingToSave))));
    }

    #[test]
    fn test_open_path_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lines.txt");
        std::fs::write(&input, "1, 2 (m) 3 (m) 4 (m) 5\n6 (m) 7").unwrap();

        let mut session = Session::with_output_name("converted");
        session.open_path(&input, None).unwrap();

        let saved = session.save(dir.path()).unwrap();
        assert_eq!(saved.path, dir.path().join("converted.csv"));
        assert_eq!(
            std::fs::read_to_string(&saved.path).unwrap(),
            "1\n12;3\n4;5\n2\n6;7\n\n"
        );
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.open_bytes(b"x", "x.txt", None).unwrap();
        assert!(session.is_open());

        session.clear();
        assert!(!session.is_open());
        assert!(session.records().is_empty());
    }
}
