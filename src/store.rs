//! Result log persistence.
//!
//! [`ResultStore`] append-deduplicates query outcomes into a single JSON file
//! (`query_data.json`) in the working directory. The file is a flat JSON array
//! of records, fully rewritten on every successful append.
//!
//! # Concurrency
//! Single-writer, non-concurrent access is assumed. There is no locking or
//! transactional discipline: concurrent writers would race and the last full
//! rewrite wins.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use crate::engine::QueryMode;
use crate::errors::{Result, RunnerError};

/// File name of the result log inside the working directory.
pub const LOG_FILE_NAME: &str = "query_data.json";

/// One logged query outcome.
///
/// A record has no identity beyond structural equality: two records are the
/// same iff mode, query, and content are all equal. Records are never mutated
/// or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub mode: QueryMode,
    pub query: String,
    pub content: String,
}

impl QueryRecord {
    pub fn new(mode: QueryMode, query: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            mode,
            query: query.into(),
            content: content.into(),
        }
    }
}

/// Outcome of an [`ResultStore::append`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was new and the log file was rewritten.
    Added,
    /// A structurally equal record already exists; the file was left untouched.
    Duplicate,
}

/// File-backed, ordered, de-duplicated sequence of [`QueryRecord`]s.
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    /// Create a store writing to `working_dir/query_data.json`.
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            path: working_dir.as_ref().join(LOG_FILE_NAME),
        }
    }

    /// Returns the path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current log from disk.
    ///
    /// A missing file is the expected empty state. A file that exists but does
    /// not parse as an array of records is reported with a warning and treated
    /// as empty — a later append will overwrite it. Only decode failures are
    /// swallowed this way; I/O errors other than `NotFound` are surfaced.
    pub async fn load(&self) -> Result<Vec<QueryRecord>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RunnerError::io(self.path.display(), e)),
        };

        match serde_json::from_slice::<Vec<QueryRecord>>(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "result log is not a valid record array — starting fresh"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Append `record` to the log unless a structurally equal record exists.
    ///
    /// On [`AppendOutcome::Added`] the whole file is rewritten, pretty-printed,
    /// with the new record as its final element. On
    /// [`AppendOutcome::Duplicate`] the file is left untouched.
    pub async fn append(&self, record: &QueryRecord) -> Result<AppendOutcome> {
        let mut records = self.load().await?;

        if records.iter().any(|existing| existing == record) {
            return Ok(AppendOutcome::Duplicate);
        }

        records.push(record.clone());

        let body = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, body.as_bytes())
            .await
            .map_err(|e| RunnerError::io(self.path.display(), e))?;

        Ok(AppendOutcome::Added)
    }
}
