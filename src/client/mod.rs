//! Remote content-store client.
//!
//! The synchronizer talks to the store through the [`Store`] trait; the HTTP
//! implementation is deliberately thin. Two endpoints:
//!
//! - `GET  <base>/u/<user_id>/items` — protobuf [`ItemList`], newest first
//! - `PUT  <base>/u/<user_id>/i/<signature>` — serialized item as the body
//!
//! The upsert is idempotent server-side: items are content-addressed by
//! their signature, so re-putting identical bytes is safe.

pub mod error;

pub use error::ClientError;

use async_trait::async_trait;
use prost::Message;

use crate::identity::{Signature, UserId};
use crate::protos::{ItemList, ItemListEntry};

/// Request/response boundary to the remote store. Implemented over HTTP in
/// production and by in-memory mocks in tests.
#[async_trait]
pub trait Store: Send + Sync {
    /// List a user's items. The server returns them newest first; the
    /// watermark computed from this listing is wrong if it does not.
    async fn list_items(&self, user_id: &UserId) -> Result<Vec<ItemListEntry>, ClientError>;

    /// Upsert one signed item.
    async fn put_item(
        &self,
        user_id: &UserId,
        signature: &Signature,
        item_bytes: &[u8],
    ) -> Result<(), ClientError>;
}

pub struct HttpStore {
    base_url: String,
    http: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn items_url(&self, user_id: &UserId) -> String {
        format!("{}/u/{}/items", self.base_url, user_id)
    }

    fn item_url(&self, user_id: &UserId, signature: &Signature) -> String {
        format!("{}/u/{}/i/{}", self.base_url, user_id, signature)
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn list_items(&self, user_id: &UserId) -> Result<Vec<ItemListEntry>, ClientError> {
        let url = self.items_url(user_id);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = response.bytes().await?;
        let list = ItemList::decode(&body[..])?;
        // Pagination is unimplemented; one page suffices to find the newest
        // post, which is all the synchronizer needs.
        Ok(list.items)
    }

    async fn put_item(
        &self,
        user_id: &UserId,
        signature: &Signature,
        item_bytes: &[u8],
    ) -> Result<(), ClientError> {
        let url = self.item_url(user_id, signature);
        let response = self
            .http
            .put(&url)
            .body(item_bytes.to_vec())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }
}
