//! Error types for the remote store client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error talking to store: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. Fatal to the current feed's sync pass.
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode item list: {0}")]
    Decode(#[from] prost::DecodeError),
}
