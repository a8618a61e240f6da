//! Retrieval engine seam.
//!
//! The engine itself — indexing, embedding, graph construction, LLM calls — is
//! external. This module defines the trait the runner drives it through, plus
//! the REST client implementation in [`rest`].

pub mod rest;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Retrieval strategy understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Plain vector retrieval, no graph context.
    Naive,
    /// Entity-neighbourhood retrieval.
    Local,
    /// Community/summary-level retrieval.
    Global,
    /// Local + global combined.
    Hybrid,
    /// Knowledge graph + vector retrieval integrated.
    Mix,
}

impl QueryMode {
    /// Every mode, in enumeration order.
    pub const ALL: [QueryMode; 5] = [
        QueryMode::Naive,
        QueryMode::Local,
        QueryMode::Global,
        QueryMode::Hybrid,
        QueryMode::Mix,
    ];

    /// The lowercase wire/on-disk name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Naive => "naive",
            QueryMode::Local => "local",
            QueryMode::Global => "global",
            QueryMode::Hybrid => "hybrid",
            QueryMode::Mix => "mix",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = crate::errors::RunnerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "naive" => Ok(QueryMode::Naive),
            "local" => Ok(QueryMode::Local),
            "global" => Ok(QueryMode::Global),
            "hybrid" => Ok(QueryMode::Hybrid),
            "mix" => Ok(QueryMode::Mix),
            other => Err(crate::errors::RunnerError::Validation(format!(
                "unknown query mode '{other}'"
            ))),
        }
    }
}

/// Trait representing the external retrieval-augmented-generation engine.
#[allow(async_fn_in_trait)]
pub trait RagEngine: Send + Sync {
    /// Insert a text document into the engine's store.
    async fn insert(&self, text: &str, timestamp: DateTime<Utc>) -> Result<()>;

    /// Run a query in the given retrieval mode and return the answer text.
    async fn query(&self, query: &str, mode: QueryMode) -> Result<String>;
}
