//! Error types for identifier decoding and credential handling.

use thiserror::Error;

/// Errors from decoding user IDs, signatures, or signing credentials.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The string is not valid base58 (or its checksum failed).
    #[error("Invalid base58 in {what}: {source}")]
    Decode {
        what: &'static str,
        source: bs58::decode::Error,
    },

    /// Decoded to the wrong number of bytes for the signing scheme.
    #[error("{what} must be {expected} bytes, got {actual}")]
    WrongLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
