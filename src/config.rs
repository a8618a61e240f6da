//! Runner configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{Result, RunnerError};

/// Central configuration loaded from environment variables.
///
/// Components receive this (or fields of it) at construction time; nothing
/// downstream reads the process environment again, so the log path and engine
/// endpoint stay deterministic and testable without env mutation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Directory holding `query_data.json`. Env: `WORKING_DIR` (required).
    pub working_dir: PathBuf,

    /// Base URL of the retrieval engine's REST API.
    /// Env: `ENGINE_URL`, default `http://localhost:9621`.
    #[validate(length(min = 1))]
    pub engine_url: String,

    /// Optional API key sent as `X-API-Key`. Env: `ENGINE_API_KEY`.
    pub engine_api_key: Option<String>,

    /// Text document inserted into the engine before querying.
    /// Env: `DOCUMENT_PATH` (required).
    pub document_path: PathBuf,

    /// Query text issued in every retrieval mode.
    /// Env: `QUERY`, default `"What is written about Mozart"`.
    #[validate(length(min = 1))]
    pub query: String,

    /// Per-request HTTP timeout in seconds (must be > 0).
    /// Env: `REQUEST_TIMEOUT_SECS`, default 120.
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first (non-fatal if `.env` is absent),
    /// then reads each variable from the process environment. Required
    /// variables (`WORKING_DIR`, `DOCUMENT_PATH`) return a
    /// [`RunnerError::Validation`] error when absent.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let working_dir = std::env::var("WORKING_DIR")
            .map(PathBuf::from)
            .map_err(|_| RunnerError::Validation("WORKING_DIR is required".to_string()))?;

        let engine_url = std::env::var("ENGINE_URL")
            .unwrap_or_else(|_| "http://localhost:9621".to_string());

        let engine_api_key = std::env::var("ENGINE_API_KEY").ok();

        let document_path = std::env::var("DOCUMENT_PATH")
            .map(PathBuf::from)
            .map_err(|_| RunnerError::Validation("DOCUMENT_PATH is required".to_string()))?;

        let query = std::env::var("QUERY")
            .unwrap_or_else(|_| "What is written about Mozart".to_string());

        let request_timeout_secs = parse_env_u64("REQUEST_TIMEOUT_SECS", 120)?;

        let config = Self {
            working_dir,
            engine_url,
            engine_api_key,
            document_path,
            query,
            request_timeout_secs,
        };

        config
            .validate()
            .map_err(|e| RunnerError::Validation(e.to_string()))?;

        Ok(config)
    }

    /// Create the working directory if absent, then canonicalize it.
    ///
    /// Canonicalization resolves symlinks and makes the stored path absolute,
    /// so the result-log path is stable for the rest of the run. Uses
    /// `tokio::fs` throughout (non-blocking).
    pub async fn ensure_working_dir(&mut self) -> Result<()> {
        tokio::fs::create_dir_all(&self.working_dir)
            .await
            .map_err(|e| RunnerError::io(self.working_dir.display(), e))?;

        self.working_dir = tokio::fs::canonicalize(&self.working_dir)
            .await
            .map_err(|e| RunnerError::io(self.working_dir.display(), e))?;

        Ok(())
    }
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(val) => val.parse::<u64>().map_err(|_| {
            RunnerError::Validation(format!("{name} must be a positive integer"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Temporarily sets env vars for a test, restoring originals afterward.
    fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        // Save originals.
        let originals: Vec<(&str, Option<String>)> =
            vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

        // Set test values.
        for (k, v) in vars {
            env::set_var(k, v);
        }

        let result = f();

        // Restore originals.
        for (k, original) in &originals {
            match original {
                Some(v) => env::set_var(k, v),
                None => env::remove_var(k),
            }
        }

        result
    }

    #[test]
    fn test_config_defaults() {
        with_env(
            &[
                ("WORKING_DIR", "/tmp/rag-work"),
                ("DOCUMENT_PATH", "/tmp/doc.txt"),
            ],
            || {
                // Remove optional vars in case they're set in the process env.
                env::remove_var("ENGINE_URL");
                env::remove_var("ENGINE_API_KEY");
                env::remove_var("QUERY");
                env::remove_var("REQUEST_TIMEOUT_SECS");

                let config = Config::from_env().expect("config should load");
                assert_eq!(config.working_dir, PathBuf::from("/tmp/rag-work"));
                assert_eq!(config.engine_url, "http://localhost:9621");
                assert!(config.engine_api_key.is_none());
                assert_eq!(config.query, "What is written about Mozart");
                assert_eq!(config.request_timeout_secs, 120);
            },
        );
    }

    #[test]
    fn test_config_custom_values() {
        with_env(
            &[
                ("WORKING_DIR", "/data/rag"),
                ("ENGINE_URL", "http://rag.internal:9621"),
                ("ENGINE_API_KEY", "secret-key"),
                ("DOCUMENT_PATH", "/data/docs/var1.txt"),
                ("QUERY", "What are the top themes in this story?"),
                ("REQUEST_TIMEOUT_SECS", "30"),
            ],
            || {
                let config = Config::from_env().expect("config should load");
                assert_eq!(config.working_dir, PathBuf::from("/data/rag"));
                assert_eq!(config.engine_url, "http://rag.internal:9621");
                assert_eq!(config.engine_api_key.as_deref(), Some("secret-key"));
                assert_eq!(config.document_path, PathBuf::from("/data/docs/var1.txt"));
                assert_eq!(config.query, "What are the top themes in this story?");
                assert_eq!(config.request_timeout_secs, 30);
            },
        );
    }

    #[test]
    fn test_config_missing_working_dir() {
        let saved_wd = env::var("WORKING_DIR").ok();
        let saved_doc = env::var("DOCUMENT_PATH").ok();
        env::remove_var("WORKING_DIR");
        env::set_var("DOCUMENT_PATH", "/tmp/doc.txt");

        let result = Config::from_env();

        if let Some(v) = saved_wd { env::set_var("WORKING_DIR", v); }
        if let Some(v) = saved_doc { env::set_var("DOCUMENT_PATH", v); } else { env::remove_var("DOCUMENT_PATH"); }

        assert!(result.is_err());
        match result.unwrap_err() {
            RunnerError::Validation(msg) => {
                assert!(msg.contains("WORKING_DIR"));
            }
            e => panic!("expected Validation error, got {:?}", e),
        }
    }

    #[test]
    fn test_config_missing_document_path() {
        let saved_doc = env::var("DOCUMENT_PATH").ok();
        env::remove_var("DOCUMENT_PATH");

        let saved_wd = env::var("WORKING_DIR").ok();
        env::set_var("WORKING_DIR", "/tmp/rag-work");

        let result = Config::from_env();

        if let Some(v) = saved_doc { env::set_var("DOCUMENT_PATH", v); } else { env::remove_var("DOCUMENT_PATH"); }
        if let Some(v) = saved_wd { env::set_var("WORKING_DIR", v); } else { env::remove_var("WORKING_DIR"); }

        assert!(result.is_err());
    }

    #[test]
    fn test_config_invalid_timeout() {
        with_env(
            &[
                ("WORKING_DIR", "/tmp/rag-work"),
                ("DOCUMENT_PATH", "/tmp/doc.txt"),
                ("REQUEST_TIMEOUT_SECS", "not-a-number"),
            ],
            || {
                let result = Config::from_env();
                assert!(result.is_err());
                match result.unwrap_err() {
                    RunnerError::Validation(msg) => {
                        assert!(msg.contains("REQUEST_TIMEOUT_SECS"));
                    }
                    e => panic!("expected Validation error, got {:?}", e),
                }
            },
        );
    }

    #[test]
    fn test_config_zero_timeout() {
        with_env(
            &[
                ("WORKING_DIR", "/tmp/rag-work"),
                ("DOCUMENT_PATH", "/tmp/doc.txt"),
                ("REQUEST_TIMEOUT_SECS", "0"),
            ],
            || {
                let result = Config::from_env();
                assert!(result.is_err());
            },
        );
    }

    #[tokio::test]
    async fn test_ensure_working_dir_creates_and_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            working_dir: dir.path().join("nested/work"),
            engine_url: "http://localhost:9621".to_string(),
            engine_api_key: None,
            document_path: PathBuf::from("/tmp/doc.txt"),
            query: "q".to_string(),
            request_timeout_secs: 120,
        };

        config.ensure_working_dir().await.expect("should create dir");
        assert!(config.working_dir.is_dir());
        assert!(config.working_dir.is_absolute());
    }
}
