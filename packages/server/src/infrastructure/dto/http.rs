//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Relay URL handed to clients in place of the origin URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamUrlDto {
    pub url: String,
}

/// Library entry (movie or series)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemDto {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub image_url: String,
    pub overview: String,
}

/// Episode of a series
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDto {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub series_name: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub image_url: String,
    pub overview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeListDto {
    pub episodes: Vec<EpisodeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
