//! Upstream media origin interfaces: byte streaming and catalog queries.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::{CatalogError, ItemId, RelayError};

/// Body of an origin response, yielded chunk by chunk as the consumer polls.
pub type MediaBodyStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// Headers governing partial-content negotiation, copied from the origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialContentHeaders {
    pub content_length: Option<String>,
    pub content_range: Option<String>,
    pub content_type: Option<String>,
    pub accept_ranges: Option<String>,
}

/// Response head and streaming body received from the origin.
pub struct OriginResponse {
    pub status: u16,
    pub headers: PartialContentHeaders,
    pub body: MediaBodyStream,
}

impl fmt::Debug for OriginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Source of raw media bytes.
#[async_trait]
pub trait MediaOrigin: Send + Sync {
    /// Request the media stream for `item_id`, forwarding `range` verbatim when given.
    ///
    /// `range` is the raw header value; it is not required to be ASCII.
    ///
    /// Any HTTP status returned by the origin is a successful call; only
    /// transport failures and timeouts are errors.
    async fn open_stream(
        &self,
        item_id: &ItemId,
        range: Option<&[u8]>,
    ) -> Result<OriginResponse, RelayError>;
}

/// A movie or series in the origin's library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub item_type: String,
    pub image_url: String,
    pub overview: String,
}

/// A single episode of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeItem {
    pub id: String,
    pub name: String,
    pub item_type: String,
    pub series_name: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub image_url: String,
    pub overview: String,
}

/// Read-only metadata queries against the origin.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Most recently added movies and series.
    async fn list_library(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Episodes of the given series.
    async fn list_episodes(&self, series_id: &ItemId) -> Result<Vec<EpisodeItem>, CatalogError>;
}
