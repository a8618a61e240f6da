//! # rag-runner
//!
//! Harness for driving a LightRAG-style retrieval-augmented-generation engine:
//! insert a text document, query it in every retrieval mode, and append each
//! outcome to a de-duplicated JSON log on disk.
//!
//! ## Architecture
//!
//! - **Engine seam**: the retrieval engine is a black box behind [`engine::RagEngine`];
//!   [`engine::rest::RestEngine`] reaches a running server over its REST API
//! - **Result log**: [`store::ResultStore`] append-deduplicates [`store::QueryRecord`]s
//!   into a single `query_data.json` (full-file rewrite, single-writer)
//! - **Orchestration**: [`runner::QueryRunner`] wires document insertion and the
//!   per-mode query loop together

pub mod config;
pub mod engine;
pub mod errors;
pub mod runner;
pub mod store;

// Re-export the main entry points
pub use config::Config;
pub use engine::{QueryMode, RagEngine};
pub use errors::{EngineError, Result, RunnerError};
pub use runner::QueryRunner;
pub use store::{AppendOutcome, QueryRecord, ResultStore};
