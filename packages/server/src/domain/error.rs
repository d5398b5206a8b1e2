//! Domain layer error definitions.

use std::time::Duration;

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} bytes (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// ItemId validation error
    #[error("ItemId cannot be empty")]
    ItemIdEmpty,

    /// ItemId too long error
    #[error("ItemId cannot exceed {max} bytes (got {actual})")]
    ItemIdTooLong { max: usize, actual: usize },

    /// ItemId contains characters outside `[A-Za-z0-9_-]`
    #[error("ItemId contains invalid characters: {0}")]
    ItemIdInvalidCharacter(String),
}

/// Errors returned by a credential verifier
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to issue token: {0}")]
    Issue(String),
}

/// MessagePusher のエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// 送信先のコネクションが登録されていない
    #[error("Connection not found: {0}")]
    ClientNotFound(String),

    /// チャンネルへの送信に失敗（受信側がクローズ済み）
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// イベントのシリアライズに失敗
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// Failures while contacting the upstream media origin for stream bytes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("origin unreachable: {0}")]
    OriginUnreachable(String),

    #[error("origin did not respond within {0:?}")]
    OriginTimeout(Duration),
}

/// Failures while querying the upstream media catalog
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("origin request failed: {0}")]
    Request(String),

    #[error("origin returned status {0}")]
    Status(u16),

    #[error("unexpected origin payload: {0}")]
    Decode(String),
}
