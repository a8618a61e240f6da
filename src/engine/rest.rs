//! REST client for a LightRAG-style retrieval engine server.
//!
//! Uses `reqwest` for HTTP, `moka` for query-response caching, and `backoff`
//! for exponential-backoff retry on rate limits / transient errors.

use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{EngineError, Result, RunnerError};

use super::{QueryMode, RagEngine};

// ── Cache configuration ───────────────────────────────────────────────────────

/// Configuration for the in-process query-response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held in memory.
    pub max_capacity: u64,
    /// How long each entry lives before eviction.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Duration::from_secs(3_600), // 1 hour
        }
    }
}

// ── Client struct ─────────────────────────────────────────────────────────────

/// HTTP client implementing [`RagEngine`] against a running engine server.
///
/// The server owns indexing, embedding, and LLM access; this client only
/// speaks the two endpoints the runner needs:
/// - `POST /documents/text` — insert a document
/// - `POST /query` — run a query in a retrieval mode
pub struct RestEngine {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    /// Keyed by `md5(mode + query)` → answer text.
    cache: Cache<String, String>,
}

impl RestEngine {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` – Engine server base URL (e.g. `http://localhost:9621`).
    /// * `api_key`  – Optional key sent as `X-API-Key` on every request.
    /// * `timeout`  – Per-request HTTP timeout.
    /// * `cache_config` – Cache capacity and TTL.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        cache_config: CacheConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let cache = Cache::builder()
            .max_capacity(cache_config.max_capacity)
            .time_to_live(cache_config.ttl)
            .build();

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            cache,
        })
    }

    /// Build a client from the loaded runner configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.engine_url.clone(),
            config.engine_api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
            CacheConfig::default(),
        )
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Compute an MD5 cache key from mode + query text.
    fn cache_key(mode: QueryMode, query: &str) -> String {
        use md5::{Digest, Md5};
        let mut h = Md5::new();
        h.update(mode.as_str().as_bytes());
        h.update(query.as_bytes());
        format!("{:x}", h.finalize())
    }

    /// POST `body` to `path` with exponential-backoff retry.
    ///
    /// Retries on [`EngineError::RateLimit`] (HTTP 429), transient 5xx errors,
    /// and network-level timeouts / connection failures. Returns the parsed
    /// JSON response body (`Null` when the body is empty or not JSON).
    async fn post_with_retry(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500))
            .with_max_interval(Duration::from_secs(10))
            .with_max_elapsed_time(Some(Duration::from_secs(60)))
            .build();

        let url = format!("{}{}", self.base_url, path);

        backoff::future::retry(backoff, || async {
            let mut request = self.http.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                request = request.header("X-API-Key", key);
            }

            let response = request.send().await.map_err(|e| {
                // Network-level failures (timeouts, connection refused) are transient.
                let engine_err = EngineError::Transport(e.to_string());
                if e.is_timeout() || e.is_connect() {
                    warn!("engine unreachable — retrying with backoff");
                    backoff::Error::transient(engine_err)
                } else {
                    backoff::Error::permanent(engine_err)
                }
            })?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(EngineError::Transport(e.to_string())))?;

            if status.is_success() {
                return Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::Null));
            }

            let engine_err = map_status(status.as_u16(), text);
            match &engine_err {
                EngineError::RateLimit => {
                    warn!("engine rate limit hit — retrying with backoff");
                    Err(backoff::Error::transient(engine_err))
                }
                EngineError::Api { status, .. } if *status >= 500 => {
                    warn!("engine transient server error ({}) — retrying", status);
                    Err(backoff::Error::transient(engine_err))
                }
                _ => Err(backoff::Error::permanent(engine_err)),
            }
        })
        .await
        .map_err(RunnerError::Engine)
    }
}

// ── RagEngine implementation ──────────────────────────────────────────────────

impl RagEngine for RestEngine {
    async fn insert(&self, text: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let body = json!({
            "text": text,
            "timestamp": timestamp.to_rfc3339(),
        });

        self.post_with_retry("/documents/text", body).await?;
        debug!(bytes = text.len(), "document inserted");
        Ok(())
    }

    async fn query(&self, query: &str, mode: QueryMode) -> Result<String> {
        let key = Self::cache_key(mode, query);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(%mode, "query cache hit");
            return Ok(cached);
        }

        let body = json!({
            "query": query,
            "mode": mode.as_str(),
        });

        let response = self.post_with_retry("/query", body).await?;
        let content = response["response"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or(RunnerError::Engine(EngineError::EmptyResponse))?;

        self.cache.insert(key, content.clone()).await;

        Ok(content)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Map a non-success HTTP status (plus body text) to our [`EngineError`].
fn map_status(status: u16, message: String) -> EngineError {
    match status {
        401 | 403 => EngineError::Authentication,
        429 => EngineError::RateLimit,
        other => EngineError::Api {
            status: other,
            message,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
