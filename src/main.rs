use tracing::{error, info};

use rag_runner::engine::rest::RestEngine;
use rag_runner::{Config, QueryRunner, ResultStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rag_runner=info".parse()?),
        )
        .init();

    info!("rag-runner starting");

    // ── Config ────────────────────────────────────────────────────────────────
    let mut config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    // ensure_working_dir canonicalizes working_dir so the result-log path is
    // absolute and symlink-resolved from this point forward.
    config.ensure_working_dir().await.map_err(|e| {
        error!("Working directory error: {}", e);
        e
    })?;

    info!(
        working_dir = %config.working_dir.display(),
        engine = %config.engine_url,
        "configuration loaded"
    );

    // ── Wiring ────────────────────────────────────────────────────────────────
    let engine = RestEngine::from_config(&config)?;
    let store = ResultStore::new(&config.working_dir);
    let runner = QueryRunner::new(engine, store);

    // ── Insert + query loop ───────────────────────────────────────────────────
    runner.insert_document(&config.document_path).await?;

    let results = runner.run_all_modes(&config.query).await?;
    for (mode, content) in &results {
        println!("=== mode: {mode} ===");
        println!("{content}");
    }

    let logged = runner.store().load().await?;
    info!(records = logged.len(), log = %runner.store().path().display(), "run complete");

    Ok(())
}
