//! Wire messages for the FeoBlog protocol.
//!
//! These mirror the subset of `feoblog.proto` this tool exchanges with the
//! server: the item listing returned by `GET /u/<uid>/items`, and the `Item`
//! payload sent with `PUT /u/<uid>/i/<sig>`. The messages are written by hand
//! with prost derives rather than generated, so no protoc step is needed at
//! build time.
//!
//! Protobuf serialization of a given message value is deterministic, which is
//! what makes the remote upsert idempotent: publishing byte-identical content
//! twice produces the same signature and therefore the same item address.

/// Discriminant used in item listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, prost::Enumeration)]
#[repr(i32)]
pub enum ItemType {
    Unknown = 0,
    Post = 1,
    Profile = 2,
}

/// One page of a user's item listing, newest first.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ItemList {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<ItemListEntry>,
    /// Set by the server when there are no further pages.
    #[prost(bool, tag = "2")]
    pub no_more_items: bool,
}

/// Listing metadata for one stored item. Enough to find the watermark
/// without fetching item bodies.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ItemListEntry {
    #[prost(bytes = "vec", tag = "1")]
    pub user_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub timestamp_ms_utc: i64,
    /// Raw [`ItemType`] discriminant; unknown values map to
    /// [`ItemType::Unknown`] via [`ItemListEntry::item_type`].
    #[prost(int32, tag = "4")]
    pub item_type: i32,
}

impl ItemListEntry {
    pub fn item_type(&self) -> ItemType {
        ItemType::try_from(self.item_type).unwrap_or(ItemType::Unknown)
    }
}

/// The unit of published content. Exactly one of the oneof variants is set.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Item {
    /// Milliseconds since the unix epoch, UTC.
    #[prost(int64, tag = "1")]
    pub timestamp_ms_utc: i64,
    #[prost(sint32, tag = "2")]
    pub utc_offset_minutes: i32,
    #[prost(oneof = "item::Kind", tags = "3, 4")]
    pub kind: Option<item::Kind>,
}

pub mod item {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "3")]
        Post(super::Post),
        #[prost(message, tag = "4")]
        Profile(super::Profile),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Post {
    #[prost(string, tag = "1")]
    pub title: String,
    /// Markdown body.
    #[prost(string, tag = "2")]
    pub body: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Profile {
    #[prost(string, tag = "1")]
    pub display_name: String,
    #[prost(string, tag = "2")]
    pub about: String,
}
