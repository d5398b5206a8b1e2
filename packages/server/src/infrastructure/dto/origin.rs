//! Payloads returned by the Jellyfin-compatible media origin.

use serde::Deserialize;

/// `{"Items": [...]}` wrapper used by list endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginItemListDto {
    #[serde(default)]
    pub items: Vec<OriginItemDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginItemDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub r#type: String,
    pub overview: Option<String>,
    pub series_name: Option<String>,
    pub parent_index_number: Option<u32>,
    pub index_number: Option<u32>,
    pub image_tags: Option<OriginImageTagsDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginImageTagsDto {
    pub primary: Option<String>,
}
