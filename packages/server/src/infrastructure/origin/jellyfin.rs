//! Jellyfin-compatible media origin client.
//!
//! The API key travels in the `X-Emby-Token` header of server-side requests
//! only. URLs built here for clients (image URLs) never carry it.

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, HeaderMap, HeaderValue, RANGE,
};

use crate::{
    config::OriginConfig,
    domain::{
        CatalogError, CatalogItem, EpisodeItem, ItemId, MediaCatalog, MediaOrigin,
        OriginResponse, PartialContentHeaders, RelayError,
    },
    infrastructure::dto::origin::{OriginItemDto, OriginItemListDto},
};

const TOKEN_HEADER: &str = "X-Emby-Token";

/// Transcoding parameters pinned for every relayed stream
const STREAM_PARAMS: [(&str, &str); 4] = [
    ("videoCodec", "h264"),
    ("audioCodec", "aac"),
    ("maxBitrate", "3000000"),
    ("transcodingContainer", "mp4"),
];

const LIBRARY_LIMIT: &str = "50";
const EPISODE_LIMIT: &str = "100";

pub struct JellyfinOrigin {
    client: reqwest::Client,
    config: OriginConfig,
}

impl JellyfinOrigin {
    pub fn new(config: OriginConfig) -> Result<Self, reqwest::Error> {
        // no total request timeout: it would cut off long streams
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Origin URL of the transcoded stream, without query parameters
    pub fn stream_url(&self, item_id: &ItemId) -> String {
        format!("{}/Videos/{}/stream.mp4", self.config.base_url(), item_id)
    }

    /// Query parameters appended to [`Self::stream_url`]
    pub fn stream_query(&self) -> Vec<(&str, &str)> {
        let mut params = STREAM_PARAMS.to_vec();
        params.push(("UserId", self.config.user_id()));
        params
    }

    /// Public poster URL for an item
    pub fn image_url(&self, item_id: &str, tag: Option<&str>) -> String {
        format!(
            "{}/Items/{}/Images/Primary?maxHeight=400&tag={}",
            self.config.base_url(),
            item_id,
            tag.unwrap_or_default()
        )
    }

    fn to_catalog_item(&self, item: OriginItemDto) -> CatalogItem {
        let tag = item.image_tags.as_ref().and_then(|t| t.primary.as_deref());
        CatalogItem {
            image_url: self.image_url(&item.id, tag),
            id: item.id,
            name: item.name,
            item_type: item.r#type,
            overview: item.overview.unwrap_or_default(),
        }
    }

    fn to_episode_item(&self, item: OriginItemDto) -> EpisodeItem {
        let tag = item.image_tags.as_ref().and_then(|t| t.primary.as_deref());
        EpisodeItem {
            image_url: self.image_url(&item.id, tag),
            id: item.id,
            name: item.name,
            item_type: item.r#type,
            series_name: item.series_name,
            season_number: item.parent_index_number,
            episode_number: item.index_number,
            overview: item.overview.unwrap_or_default(),
        }
    }

    async fn fetch_items(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<Vec<OriginItemDto>, CatalogError> {
        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, self.config.api_key())
            .query(query)
            .timeout(self.config.response_timeout)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let list: OriginItemListDto = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(list.items)
    }
}

fn header_value(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl MediaOrigin for JellyfinOrigin {
    async fn open_stream(
        &self,
        item_id: &ItemId,
        range: Option<&[u8]>,
    ) -> Result<OriginResponse, RelayError> {
        let mut request = self
            .client
            .get(self.stream_url(item_id))
            .query(&self.stream_query())
            .header(TOKEN_HEADER, self.config.api_key());
        if let Some(range) = range {
            match HeaderValue::from_bytes(range) {
                Ok(range) => request = request.header(RANGE, range),
                Err(e) => tracing::warn!("Range header cannot be forwarded: {}", e),
            }
        }

        let timeout = self.config.response_timeout;
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| RelayError::OriginTimeout(timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::OriginTimeout(self.config.connect_timeout)
                } else {
                    RelayError::OriginUnreachable(e.to_string())
                }
            })?;

        let headers = response.headers();
        let headers = PartialContentHeaders {
            content_length: header_value(headers, CONTENT_LENGTH),
            content_range: header_value(headers, CONTENT_RANGE),
            content_type: header_value(headers, CONTENT_TYPE),
            accept_ranges: header_value(headers, ACCEPT_RANGES),
        };
        let status = response.status().as_u16();

        // pulled lazily: the origin is read only as fast as the consumer polls
        let body = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();

        Ok(OriginResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl MediaCatalog for JellyfinOrigin {
    async fn list_library(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = format!(
            "{}/Users/{}/Items",
            self.config.base_url(),
            self.config.user_id()
        );
        let query = [
            ("Recursive", "true"),
            ("IncludeItemTypes", "Movie,Series"),
            ("SortBy", "DateCreated"),
            ("SortOrder", "Descending"),
            ("Limit", LIBRARY_LIMIT),
            ("Fields", "PrimaryImageAspectRatio,Overview"),
        ];
        let items = self.fetch_items(url, &query).await?;
        Ok(items
            .into_iter()
            .map(|item| self.to_catalog_item(item))
            .collect())
    }

    async fn list_episodes(&self, series_id: &ItemId) -> Result<Vec<EpisodeItem>, CatalogError> {
        let url = format!("{}/Shows/{}/Episodes", self.config.base_url(), series_id);
        let query = [
            ("UserId", self.config.user_id()),
            ("Recursive", "true"),
            ("Fields", "Overview,ParentIndexNumber,IndexNumber,SeriesName"),
            ("Limit", EPISODE_LIMIT),
        ];
        let items = self.fetch_items(url, &query).await?;
        Ok(items
            .into_iter()
            .map(|item| self.to_episode_item(item))
            .collect())
    }
}
