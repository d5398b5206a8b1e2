//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod browse_catalog;
pub mod connect_participant;
pub mod control_playback;
pub mod disconnect_participant;
pub mod error;
pub mod join_room;
pub mod relay_stream;
pub mod send_message;

pub use browse_catalog::BrowseCatalogUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use control_playback::{ControlPlaybackUseCase, PlaybackOutcome};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, JoinRoomError, PlaybackError, SendMessageError};
pub use join_room::JoinRoomUseCase;
pub use relay_stream::RelayStreamUseCase;
pub use send_message::SendMessageUseCase;
