//! fbrss-rs — sync RSS feeds into a FeoBlog-style signed content store.
//!
//! Reads feed subscriptions from a TOML config, and for each one publishes
//! new feed entries as signed items to the remote store. Duplicate
//! suppression is two-layered: the timestamp of the newest remote post acts
//! as a watermark, and a bounded per-feed cache of recently published GUIDs
//! catches backdated or reordered entries the watermark would miss.
//!
//! Designed to run periodically from a scheduler (cron, systemd timer).
//! Exactly one instance should run against a given cache directory at a
//! time; the cache files are not locked.

#![warn(clippy::all)]

mod cache;
mod cli;
mod client;
mod config;
mod feed;
mod identity;
mod protos;
mod sync;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cache::GuidCache;
use client::HttpStore;
use config::{Config, FeedConfig, FeedSubscription};
use feed::RssSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::load(&cli.config_file)?;
    tracing::info!(
        server = %config.server_url,
        feeds = config.feeds.len(),
        "Starting fbrss-rs"
    );

    let http = reqwest::Client::new();
    let store = HttpStore::new(&config.server_url, http.clone());
    let source = RssSource::new(http);

    let mut num_errors = 0u32;

    // Feeds run sequentially in config order. One feed's failure is logged
    // and counted, then the loop moves on; the process still exits 0.
    for feed_config in &config.feeds {
        if let Err(e) = sync_one(&store, &source, &config, feed_config).await {
            num_errors += 1;
            tracing::error!(rss_url = %feed_config.rss_url, error = %e, "Error syncing feed");
        }
    }

    if num_errors > 0 {
        tracing::warn!(num_errors, "Finished with errors");
    } else {
        tracing::info!("Finished");
    }

    Ok(())
}

/// Run one feed's sync pass end to end: build the subscription, open its
/// cache, sync, and always flush the cache back to disk so a mid-pass
/// failure keeps whatever was published.
async fn sync_one(
    store: &HttpStore,
    source: &RssSource,
    config: &Config,
    feed_config: &FeedConfig,
) -> anyhow::Result<()> {
    let feed = FeedSubscription::from_config(feed_config)?;
    let mut guid_cache = GuidCache::open(&config.cache_dir, &feed.user_id.to_string())?;
    tracing::debug!(feed = %feed.name, cached_guids = guid_cache.len(), "Opened GUID cache");

    let now_ms = chrono::Utc::now().timestamp_millis();
    let result = sync::sync_feed(store, source, &feed, &mut guid_cache, now_ms).await;

    if let Err(e) = guid_cache.save() {
        tracing::error!(feed = %feed.name, error = %e, "Failed to save GUID cache");
    }

    let stats = result?;
    tracing::info!(
        feed = %feed.name,
        published = stats.published,
        skipped_old = stats.skipped_old,
        skipped_future = stats.skipped_future,
        skipped_duplicate = stats.skipped_duplicate,
        "Sync pass complete"
    );
    Ok(())
}
