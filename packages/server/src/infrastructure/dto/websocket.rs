//! WebSocket event DTOs.
//!
//! Every text frame carries one envelope `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Events sent by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEventDto {
    JoinRoom(String),
    Play(PlaybackPayloadDto),
    Pause(PlaybackPayloadDto),
    Seek(PlaybackPayloadDto),
    SendMessage(Map<String, Value>),
}

/// Payload of `play`, `pause` and `seek`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPayloadDto {
    pub room_id: String,
    /// Playback position in seconds
    pub current_time: f64,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEventDto {
    SyncStatus(RoomStateDto),
    SyncPlay(PositionDto),
    SyncPause(PositionDto),
    SyncSeek(PositionDto),
    ReceiveMessage(Value),
}

/// Room playback state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub is_playing: bool,
    pub current_time: f64,
    /// Unix timestamp (milliseconds since epoch) of the last update
    pub update_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub current_time: f64,
}
