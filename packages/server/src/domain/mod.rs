//! Domain layer for the watch-together server.
//!
//! This module contains the playback model and the interfaces the use cases
//! depend on. It is independent of DTOs, HTTP clients and the WebSocket
//! transport.

pub mod credential;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod media;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use credential::CredentialVerifier;
pub use entity::{ChatPayload, Connection, Identity, PlaybackCommand, RoomState};
pub use error::{AuthError, CatalogError, MessagePushError, RelayError, ValueObjectError};
pub use event::OutboundEvent;
pub use factory::ConnectionIdFactory;
pub use media::{
    CatalogItem, EpisodeItem, MediaBodyStream, MediaCatalog, MediaOrigin, OriginResponse,
    PartialContentHeaders,
};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{RoomGuard, RoomRepository};
pub use value_object::{ConnectionId, ItemId, RoomId, Timestamp};
