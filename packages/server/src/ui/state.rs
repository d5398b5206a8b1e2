//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::{
    BrowseCatalogUseCase, ConnectParticipantUseCase, ControlPlaybackUseCase,
    DisconnectParticipantUseCase, JoinRoomUseCase, RelayStreamUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// ControlPlaybackUseCase（再生操作のユースケース）
    pub control_playback_usecase: Arc<ControlPlaybackUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// RelayStreamUseCase（ストリーム中継のユースケース）
    pub relay_stream_usecase: Arc<RelayStreamUseCase>,
    /// BrowseCatalogUseCase（ライブラリ閲覧のユースケース）
    pub browse_catalog_usecase: Arc<BrowseCatalogUseCase>,
}
