//! The per-feed sync pass.
//!
//! One pass: find the resume watermark from the remote listing, bootstrap a
//! profile if the stream is brand new, then publish feed entries that clear
//! the watermark, the future-timestamp guard, and the duplicate cache.
//!
//! Entries are published oldest first on purpose. If the pass dies partway,
//! the already-published entries are the oldest ones, so the next run's
//! watermark (plus the cache) resumes exactly where this one stopped.
//!
//! The caller owns the cache for the duration of the pass and must save it
//! on every exit path; this module only mutates it in memory.

pub mod error;

pub use error::SyncError;

use prost::Message;

use crate::cache::GuidCache;
use crate::client::Store;
use crate::config::FeedSubscription;
use crate::feed::{FeedEntry, FeedSource};
use crate::identity::UserId;
use crate::protos::{item, Item, ItemListEntry, ItemType, Post, Profile};

/// What one sync pass did, for the run loop's summary log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub published: u32,
    pub skipped_old: u32,
    pub skipped_future: u32,
    pub skipped_duplicate: u32,
    pub profile_created: bool,
}

/// Run one sync pass for one feed.
///
/// `now_ms` is the caller's idea of the current UTC time in milliseconds;
/// entries timestamped after it are never published.
pub async fn sync_feed(
    store: &dyn Store,
    source: &dyn FeedSource,
    feed: &FeedSubscription,
    cache: &mut GuidCache,
    now_ms: i64,
) -> Result<SyncStats, SyncError> {
    tracing::debug!(feed = %feed.name, user_id = %feed.user_id, "Syncing feed");
    let mut stats = SyncStats::default();

    let items = store.list_items(&feed.user_id).await?;
    let has_items = !items.is_empty();
    let latest_timestamp = latest_post_timestamp(&items);
    tracing::debug!(latest_timestamp, "Resume watermark");

    // A brand-new stream gets a default profile. This also probes write
    // permission before any feed content is touched.
    if !has_items {
        let profile = default_profile(feed, now_ms);
        publish(store, &feed.user_id, feed, &profile).await?;
        stats.profile_created = true;
        tracing::info!(feed = %feed.name, "Created default profile");
    }

    let mut entries = source.fetch(&feed.rss_url).await?;
    entries.sort_by_key(|e| e.timestamp_ms);

    for entry in &entries {
        if entry.timestamp_ms <= latest_timestamp {
            tracing::debug!(guid = %entry.guid, ts = entry.timestamp_ms, "Skipping old entry");
            stats.skipped_old += 1;
            continue;
        }
        if entry.timestamp_ms > now_ms {
            tracing::warn!(
                title = %entry.title,
                ts = entry.timestamp_ms,
                "Refusing to sync entry with a future timestamp"
            );
            stats.skipped_future += 1;
            continue;
        }
        // Empty GUIDs can't be deduplicated, so such entries are always
        // published. Known tradeoff: a GUID-less feed may re-publish on
        // every run once its entries age past the watermark.
        if !entry.guid.is_empty() && cache.contains(&entry.guid) {
            tracing::debug!(guid = %entry.guid, "Skipping entry with cached GUID");
            stats.skipped_duplicate += 1;
            continue;
        }

        let item = entry_to_item(entry);
        publish(store, &feed.user_id, feed, &item).await?;
        cache.add(&entry.guid);
        stats.published += 1;
        tracing::info!(feed = %feed.name, title = %entry.title, "Published entry");
    }

    Ok(stats)
}

/// Timestamp of the newest post-type item, or 0 if none.
///
/// Scans front to back and stops at the first post. Relies on the store's
/// newest-first listing order; the watermark is wrong if the server does
/// not honor that contract.
fn latest_post_timestamp(items: &[ItemListEntry]) -> i64 {
    items
        .iter()
        .find(|item| item.item_type() == ItemType::Post)
        .map(|item| item.timestamp_ms_utc)
        .unwrap_or(0)
}

fn default_profile(feed: &FeedSubscription, now_ms: i64) -> Item {
    Item {
        timestamp_ms_utc: now_ms,
        utc_offset_minutes: 0,
        kind: Some(item::Kind::Profile(Profile {
            display_name: feed.name.clone(),
            about: format!(
                "This account contains items from the following RSS feed:  \n<{}>",
                feed.rss_url
            ),
        })),
    }
}

/// Convert a normalized feed entry to a post item: HTML body to markdown,
/// with the entry's link appended when the body doesn't already carry it.
fn entry_to_item(entry: &FeedEntry) -> Item {
    let mut body = html2md::parse_html(&entry.description);
    if !entry.link.is_empty() && !body.contains(&entry.link) {
        body.push_str(&format!("  \n<{}>", entry.link));
    }
    Item {
        timestamp_ms_utc: entry.timestamp_ms,
        utc_offset_minutes: 0,
        kind: Some(item::Kind::Post(Post {
            title: entry.title.clone(),
            body,
        })),
    }
}

async fn publish(
    store: &dyn Store,
    user_id: &UserId,
    feed: &FeedSubscription,
    item: &Item,
) -> Result<(), SyncError> {
    let item_bytes = item.encode_to_vec();
    let signature = feed.password.sign(&item_bytes);
    store.put_item(user_id, &signature, &item_bytes).await?;
    Ok(())
}
