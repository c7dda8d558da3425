//! Error types for the duplicate cache.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing a cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
