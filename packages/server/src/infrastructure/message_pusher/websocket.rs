//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - ルーム（グループ）のメンバーシップを管理
//! - クライアントへのイベント送信（push_to, broadcast_to_group）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。
//! イベントは送信時に 1 度だけ JSON にエンコードされます。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel, RoomId},
    infrastructure::dto::websocket::ServerEventDto,
};

#[derive(Default)]
struct PusherState {
    /// 接続中のコネクションの WebSocket sender
    clients: HashMap<ConnectionId, PusherChannel>,
    /// ルーム ID → 所属コネクション
    groups: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.join_group(&room_id, &connection_id).await;
/// pusher.broadcast_to_group(&room_id, &connection_id, &event).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    state: Mutex<PusherState>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームに所属しているコネクション数を取得
    pub async fn group_size(&self, room_id: &RoomId) -> usize {
        let state = self.state.lock().await;
        state.groups.get(room_id).map_or(0, HashSet::len)
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEventDto::from(event))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut state = self.state.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        state.clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut state = self.state.lock().await;
        state.clients.remove(connection_id);
        state.groups.retain(|_, members| {
            members.remove(connection_id);
            !members.is_empty()
        });
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn join_group(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let mut state = self.state.lock().await;
        state
            .groups
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.clone());
        tracing::debug!("Connection '{}' joined group '{}'", connection_id, room_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let state = self.state.lock().await;

        if let Some(sender) = state.clients.get(connection_id) {
            sender
                .send(content)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(connection_id.to_string()))
        }
    }

    async fn broadcast_to_group(
        &self,
        room_id: &RoomId,
        exclude: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let content = Self::encode(event)?;
        let state = self.state.lock().await;

        let Some(members) = state.groups.get(room_id) else {
            return Ok(0);
        };

        let mut delivered = 0;
        for target in members.iter().filter(|id| *id != exclude) {
            match state.clients.get(target) {
                // ブロードキャストでは一部の送信失敗を許容（再送はしない）
                Some(sender) => match sender.send(content.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!("Failed to push '{}' to '{}': {}", event.name(), target, e)
                    }
                },
                None => {
                    tracing::warn!("Connection '{}' not found during broadcast, skipping", target)
                }
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {} member(s) of '{}'",
            event.name(),
            delivered,
            room_id
        );

        Ok(delivered)
    }
}
