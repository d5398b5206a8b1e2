//! UseCase: 再生操作（play / pause / seek）の同期
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ControlPlaybackUseCase::execute() メソッド
//! - ルーム状態の更新と、送信者以外のメンバーへのファンアウト
//!
//! ### なぜこのテストが必要か
//! - 送信者除外・ルーム隔離・最後の書き込みが勝つ、の 3 つが同期の中核
//! - 未登録ルームへの操作は黙って捨てられることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：play → 他のメンバーが sync_play を受信、送信者は何も受信しない
//! - 正常系：異なる送信者からの連続操作 → 最後の操作が状態になる
//! - エッジケース：未登録ルーム → 状態もファンアウトも発生しない
//! - 並行性：2 人が同時に操作 → 第三者が最後に受信する状態が Registry の状態と一致する

use std::sync::Arc;

use synccinema_shared::time::Clock;

use crate::domain::{
    Connection, MessagePusher, OutboundEvent, PlaybackCommand, RoomId, RoomRepository, RoomState,
    Timestamp,
};

use super::error::PlaybackError;

/// 再生操作の処理結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackOutcome {
    /// 状態を更新し、`notified` 人のメンバーに通知した
    Applied { state: RoomState, notified: usize },
    /// ルームが存在しないため無視した
    UnknownRoom,
}

/// 再生操作のユースケース
pub struct ControlPlaybackUseCase {
    /// Repository（Room Registry の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ControlPlaybackUseCase {
    /// 新しい ControlPlaybackUseCase を作成
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

    /// 再生操作を実行
    ///
    /// クライアントが申告した再生位置はそのまま信頼する（検証しない）。
    ///
    /// # Returns
    ///
    /// * `Ok(PlaybackOutcome::Applied)` - 状態を更新して通知した
    /// * `Ok(PlaybackOutcome::UnknownRoom)` - ルームが無いため何もしなかった
    /// * `Err(PlaybackError)` - 通知に失敗（状態は更新済み）
    pub async fn execute(
        &self,
        connection: &Connection,
        room_id: &RoomId,
        command: PlaybackCommand,
    ) -> Result<PlaybackOutcome, PlaybackError> {
        // 1. ルームのロックを取得（ルームが無ければ黙って捨てる）
        let Some(mut room) = self.repository.lock_existing(room_id).await else {
            tracing::debug!(
                "Dropped '{}' from '{}': room '{}' has no state",
                command.name(),
                connection.display_name(),
                room_id
            );
            return Ok(PlaybackOutcome::UnknownRoom);
        };

        // 2. 状態を更新し、ロックを保持したまま送信者以外のメンバーへファンアウト
        // （同じルームの通知順が更新順と一致する）
        let now = Timestamp::new(self.clock.now_millis());
        room.apply(command, now);
        let state = *room;
        let notified = self
            .message_pusher
            .broadcast_to_group(room_id, &connection.id, &OutboundEvent::from(command))
            .await?;
        drop(room);

        tracing::debug!(
            "'{}' {} at {}s in room '{}'",
            connection.display_name(),
            command.name(),
            command.current_time(),
            room_id
        );

        Ok(PlaybackOutcome::Applied { state, notified })
    }
}
