//! Error types for a feed sync pass.

use thiserror::Error;

use crate::client::ClientError;
use crate::feed::FeedError;

/// A fatal error during one feed's sync pass. The run loop logs it, counts
/// it, and moves on to the next feed; the pass resumes correctly next run
/// via the watermark plus whatever the cache flushed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}
