//! Error types for feed fetching and parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error fetching feed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} fetching feed {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse feed XML: {0}")]
    Parse(#[from] rss::Error),
}
