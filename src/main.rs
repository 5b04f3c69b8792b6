//! Scrape ETL - fetch pages, count their words, cache and store the results
//!
//! Runs the configured URL list once through the pipeline, then prints a
//! sample of the store contents.

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrape_etl::pipeline::{Pause, Pipeline};
use scrape_etl::Config;

/// Main entry point for the demo run.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the pipeline (starts the store reaper)
/// 4. Process every URL in order, pausing between them
/// 5. Print the store sample and statistics
/// 6. Stop the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrape_etl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, store_ttl={}s, reap_interval={}ms, fetch_timeout={}s, urls={}",
        config.cache_capacity,
        config.store_ttl,
        config.reap_interval_ms,
        config.fetch_timeout,
        config.urls.len()
    );

    let mut pipeline = Pipeline::from_config(&config).context("failed to build pipeline")?;

    let shutdown = CancellationToken::new();
    tokio::spawn(ctrl_c_signal(shutdown.clone()));

    let summary = pipeline
        .run(&config.urls, Pause::from(&config), &shutdown)
        .await;
    if summary.interrupted {
        warn!("Run interrupted before all URLs were processed");
    }

    println!("\n[STORE CONTENTS]");
    for row in pipeline.dump(config.dump_limit, config.dump_words).await {
        println!("{}", serde_json::to_string(&row)?);
    }

    let cache_stats = pipeline.cache_stats();
    let store_stats = pipeline.store_stats().await;
    info!(
        "Cache: {} hits, {} misses, {} evictions ({:.0}% hit rate)",
        cache_stats.hits,
        cache_stats.misses,
        cache_stats.evictions,
        cache_stats.hit_rate() * 100.0
    );
    info!(
        "Store: {} live entries, {} expired",
        store_stats.total_entries, store_stats.expirations
    );

    pipeline.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Cancels `shutdown` on Ctrl+C so the run stops between URLs.
async fn ctrl_c_signal(shutdown: CancellationToken) {
    if signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, stopping after the current URL...");
        shutdown.cancel();
    }
}
