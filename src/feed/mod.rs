//! Feed source abstraction and the RSS implementation.
//!
//! The synchronizer only sees [`FeedSource`] and the normalized [`FeedEntry`]
//! it yields; fetching and XML parsing live behind the trait so tests can
//! feed in entries directly.

pub mod error;

pub use error::FeedError;

use async_trait::async_trait;
use chrono::DateTime;

/// One feed entry, normalized on ingestion.
///
/// Feeds are not required to supply a GUID, description, or link; those
/// default to the empty string. Entries without a parsable published date
/// are dropped during normalization, since every downstream decision keys
/// off the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Raw HTML body as supplied by the feed.
    pub description: String,
    pub guid: String,
    /// Published time, milliseconds since the unix epoch, UTC.
    pub timestamp_ms: i64,
}

/// Source of feed entries for one subscription.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError>;
}

/// Fetches and parses a live RSS feed over HTTP.
pub struct RssSource {
    http: reqwest::Client,
}

impl RssSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl FeedSource for RssSource {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        let channel = rss::Channel::read_from(&body[..])?;
        Ok(normalize_channel(&channel))
    }
}

/// Convert parsed channel items into normalized entries, dropping the
/// undateable ones.
fn normalize_channel(channel: &rss::Channel) -> Vec<FeedEntry> {
    channel
        .items()
        .iter()
        .filter_map(normalize_item)
        .collect()
}

fn normalize_item(item: &rss::Item) -> Option<FeedEntry> {
    let timestamp_ms = match item.pub_date().map(DateTime::parse_from_rfc2822) {
        Some(Ok(date)) => date.timestamp_millis(),
        Some(Err(e)) => {
            tracing::warn!(
                title = item.title().unwrap_or(""),
                error = %e,
                "Dropping entry with unparsable publish date"
            );
            return None;
        }
        None => {
            tracing::warn!(
                title = item.title().unwrap_or(""),
                "Dropping entry with no publish date"
            );
            return None;
        }
    };

    Some(FeedEntry {
        title: item.title().unwrap_or_default().to_string(),
        link: item.link().unwrap_or_default().to_string(),
        description: item.description().unwrap_or_default().to_string(),
        guid: item
            .guid()
            .map(|g| g.value().to_string())
            .unwrap_or_default(),
        timestamp_ms,
    })
}
