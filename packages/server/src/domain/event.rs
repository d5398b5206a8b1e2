//! Events pushed from the server to connected clients.

use super::entity::{ChatPayload, PlaybackCommand, RoomState};

/// Outbound event delivered over a connection.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Current room state, sent only to the connection that joined
    SyncStatus(RoomState),
    SyncPlay { current_time: f64 },
    SyncPause { current_time: f64 },
    SyncSeek { current_time: f64 },
    ReceiveMessage(ChatPayload),
}

impl OutboundEvent {
    /// Event name on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::SyncStatus(_) => "sync_status",
            Self::SyncPlay { .. } => "sync_play",
            Self::SyncPause { .. } => "sync_pause",
            Self::SyncSeek { .. } => "sync_seek",
            Self::ReceiveMessage(_) => "receive_message",
        }
    }
}

impl From<PlaybackCommand> for OutboundEvent {
    fn from(command: PlaybackCommand) -> Self {
        match command {
            PlaybackCommand::Play { current_time } => Self::SyncPlay { current_time },
            PlaybackCommand::Pause { current_time } => Self::SyncPause { current_time },
            PlaybackCommand::Seek { current_time } => Self::SyncSeek { current_time },
        }
    }
}
