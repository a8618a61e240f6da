//! Error types for rag-runner.

/// Alias for Results returning [`RunnerError`].
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Top-level error type for rag-runner.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl RunnerError {
    /// Create an IO error with a path context.
    pub(crate) fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        RunnerError::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Retrieval-engine-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Rate limited")]
    RateLimit,

    #[error("Authentication failed")]
    Authentication,

    #[error("Empty response from engine")]
    EmptyResponse,

    #[error("API error: HTTP {status} — {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}
