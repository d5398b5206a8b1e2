//! Conversion logic between DTOs and domain entities.

use crate::domain::{CatalogItem, EpisodeItem, OutboundEvent, RoomState};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<RoomState> for dto::RoomStateDto {
    fn from(state: RoomState) -> Self {
        Self {
            is_playing: state.is_playing,
            current_time: state.current_time,
            update_time: state.update_time.value(),
        }
    }
}

impl From<&OutboundEvent> for dto::ServerEventDto {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::SyncStatus(state) => Self::SyncStatus((*state).into()),
            OutboundEvent::SyncPlay { current_time } => Self::SyncPlay(dto::PositionDto {
                current_time: *current_time,
            }),
            OutboundEvent::SyncPause { current_time } => Self::SyncPause(dto::PositionDto {
                current_time: *current_time,
            }),
            OutboundEvent::SyncSeek { current_time } => Self::SyncSeek(dto::PositionDto {
                current_time: *current_time,
            }),
            OutboundEvent::ReceiveMessage(payload) => {
                Self::ReceiveMessage(payload.clone().into_value())
            }
        }
    }
}

impl From<CatalogItem> for http::CatalogItemDto {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            r#type: item.item_type,
            image_url: item.image_url,
            overview: item.overview,
        }
    }
}

impl From<EpisodeItem> for http::EpisodeDto {
    fn from(item: EpisodeItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            r#type: item.item_type,
            series_name: item.series_name,
            season_number: item.season_number,
            episode_number: item.episode_number,
            image_url: item.image_url,
            overview: item.overview,
        }
    }
}
