//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの遅延作成と、参加者本人への sync_status の送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：未登録ルームへの初回参加 → 初期状態を受信
//! - 正常系：再生中ルームへの参加 → 現在の状態を受信
//! - エッジケース：参加時に他のメンバーへは何も送られない
//! - 並行性：更新中のルームへの参加 → 更新の完了を待ち、更新後の状態を受信する

use std::sync::Arc;

use synccinema_shared::time::Clock;

use crate::domain::{
    Connection, MessagePusher, OutboundEvent, RoomId, RoomRepository, RoomState, Timestamp,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（Room Registry の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RoomState)` - 参加時点のルーム状態（参加者本人に送信済み）
    /// * `Err(JoinRoomError)` - sync_status の送信に失敗
    pub async fn execute(
        &self,
        connection: &Connection,
        room_id: RoomId,
    ) -> Result<RoomState, JoinRoomError> {
        // 1. ルームのロックを取得（無ければ作成）。参加が終わるまで同じルームの更新は待たされる
        let now = Timestamp::new(self.clock.now_millis());
        let room = self.repository.lock_or_create(&room_id, now).await;
        let state = *room;

        // 2. トランスポートのグループに参加
        self.message_pusher
            .join_group(&room_id, &connection.id)
            .await;
        tracing::info!(
            "User '{}' joined room '{}'",
            connection.display_name(),
            room_id
        );

        // 3. 参加者本人にのみ現在の状態を送信
        self.message_pusher
            .push_to(&connection.id, &OutboundEvent::SyncStatus(state))
            .await?;
        drop(room);

        Ok(state)
    }
}
