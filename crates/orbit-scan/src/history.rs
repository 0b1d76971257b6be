//! Scan history — trait + JSONL-file implementation.
//!
//! History is an append-only audit trail: one serialized [`ScanRecord`] per
//! line, newline-terminated. Records are never rewritten, compacted, or
//! deleted. Reads tolerate blank lines and individually corrupt entries
//! (a partial final line from an interrupted append must not poison the
//! whole log).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use orbit_core::types::{ScanRecord, ScanTarget};

/// Errors that can occur during history store operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for scan history backends.
pub trait HistoryStore {
    /// Append a completed scan record. Existing entries are never touched.
    fn append(&self, record: &ScanRecord) -> Result<(), HistoryError>;

    /// The most recently appended record whose target matches `target`
    /// exactly (string equality, no CIDR containment). `None` when no entry
    /// matches or the store does not exist yet.
    fn most_recent_for(&self, target: &ScanTarget) -> Result<Option<ScanRecord>, HistoryError>;
}

/// JSONL-file backed history store.
pub struct JsonlHistoryStore {
    path: PathBuf,
}

impl JsonlHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonlHistoryStore {
    fn append(&self, record: &ScanRecord) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        tracing::debug!(
            target = %record.target,
            path = %self.path.display(),
            "Scan record appended to history"
        );

        Ok(())
    }

    fn most_recent_for(&self, target: &ScanTarget) -> Result<Option<ScanRecord>, HistoryError> {
        let contents = match std::fs::read(&self.path) {
            Ok(c) => c,
            // A store that does not exist yet simply has no history.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Newest entries are at the end; storage order is authoritative,
        // timestamps are not re-parsed for ordering. Lines are handled as
        // raw bytes so binary garbage (a torn write, disk corruption) is a
        // corrupt line to skip, not a reason to fail the whole read.
        for line in contents.split(|&b| b == b'\n').rev() {
            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }
            let record: ScanRecord = match serde_json::from_slice(line) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping corrupt history line");
                    continue;
                }
            };
            if &record.target == target {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }
}
