//! Query orchestration.
//!
//! [`QueryRunner`] ties the engine seam and the result log together: insert a
//! document, run a query per retrieval mode, persist each outcome.

use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::engine::{QueryMode, RagEngine};
use crate::errors::{Result, RunnerError};
use crate::store::{AppendOutcome, QueryRecord, ResultStore};

/// Drives an external retrieval engine and logs query outcomes.
pub struct QueryRunner<E> {
    engine: E,
    store: ResultStore,
}

impl<E: RagEngine> QueryRunner<E> {
    pub fn new(engine: E, store: ResultStore) -> Self {
        Self { engine, store }
    }

    /// Read a UTF-8 text document from disk and insert it into the engine,
    /// stamped with the current time.
    pub async fn insert_document(&self, path: &Path) -> Result<()> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RunnerError::io(path.display(), e))?;

        self.engine.insert(&text, Utc::now()).await?;
        info!(path = %path.display(), bytes = text.len(), "document inserted");
        Ok(())
    }

    /// Run `query` in a single retrieval mode, append the outcome to the
    /// result log, and return the answer text.
    ///
    /// A duplicate outcome (a structurally equal record already logged) leaves
    /// the log untouched; the answer is still returned.
    pub async fn run_query(&self, query: &str, mode: QueryMode) -> Result<String> {
        let content = self.engine.query(query, mode).await?;

        let record = QueryRecord::new(mode, query, content.clone());
        match self.store.append(&record).await? {
            AppendOutcome::Added => info!(%mode, "new record added to result log"),
            AppendOutcome::Duplicate => info!(%mode, "duplicate record — not added"),
        }

        Ok(content)
    }

    /// Run `query` in every retrieval mode, sequentially, in
    /// [`QueryMode::ALL`] order. Returns the answer per mode.
    pub async fn run_all_modes(&self, query: &str) -> Result<Vec<(QueryMode, String)>> {
        let mut results = Vec::with_capacity(QueryMode::ALL.len());
        for mode in QueryMode::ALL {
            let content = self.run_query(query, mode).await?;
            results.push((mode, content));
        }
        Ok(results)
    }

    /// Returns a reference to the underlying result store.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }
}
