//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MessagePushError, ValueObjectError};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// コネクション ID の生成に失敗
    #[error("failed to assign connection id: {0}")]
    ConnectionId(#[from] ValueObjectError),
}

/// join_room のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    /// sync_status の送信に失敗（ルームへの参加自体は完了している）
    #[error("failed to deliver sync_status: {0}")]
    StatusDeliveryFailed(#[from] MessagePushError),
}

/// play / pause / seek のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// 状態は更新済みだがファンアウトに失敗
    #[error("failed to fan out playback event: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}

/// send_message のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// ペイロードに文字列の roomId が無い
    #[error("message payload has no string roomId")]
    MissingRoomId,

    #[error("invalid roomId: {0}")]
    InvalidRoomId(#[from] ValueObjectError),

    #[error("failed to fan out message: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}
