//! Ring LRU demo
//!
//! Builds a keyed cache from environment configuration, runs a few
//! operations against it and prints the resulting order and statistics.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ring_lru::{CacheError, CacheStore, Config};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ring_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size={}, ttl={}s, eliminate_length={:?}",
        config.max_size, config.ttl_seconds, config.eliminate_length
    );

    let mut cache: CacheStore<String, String> =
        CacheStore::from_config(&config).context("invalid cache configuration")?;

    for i in 0..10 {
        cache.set(format!("key{i}"), format!("value-{i}"))?;
    }
    cache.set("key1".to_string(), "value-1-updated".to_string())?;

    match cache.get(&"key3".to_string()) {
        Ok(value) => info!("key3 = {}", value),
        Err(err) => warn!("key3 unavailable: {}", err),
    }

    match cache.get(&"missing".to_string()) {
        Err(CacheError::NotFound(key)) => info!("lookup of {} missed", key),
        other => info!("unexpected lookup result: {:?}", other),
    }

    if let Err(err) = cache.delete(&"key0".to_string()) {
        warn!("could not delete key0: {}", err);
    }

    println!("LRU order (most recent first): {:?}", cache.keys());
    println!(
        "{}",
        serde_json::to_string_pretty(&cache.stats()).context("failed to render stats")?
    );

    info!("Demo complete");
    Ok(())
}
