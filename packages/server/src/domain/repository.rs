//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム状態ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{PlaybackCommand, RoomId, RoomState, Timestamp};

/// ルーム 1 つ分の排他ロック
///
/// 保持している間、同じルームの他の操作は待たされる。状態の更新と
/// その通知をこのロックの内側で行うことで、通知の順序が更新の順序と一致する。
pub type RoomGuard = OwnedMutexGuard<RoomState>;

/// Room Registry trait
///
/// ルーム ID から再生状態へのマッピングを保持する唯一の共有状態。
///
/// ## 直列化
///
/// ルームごとに排他ロックを持つ。`lock_*` で得た `RoomGuard` を保持している間は
/// 同じルームへの他の読み取り・更新は待たされる。
/// 同一ルームへの同時更新は「最後に処理された書き込みが勝つ」。
///
/// ## ライフサイクル
///
/// エントリは最初の join で作られ、プロセス終了まで削除されない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームのロックを取得し、存在しなければ初期状態で作成する
    async fn lock_or_create(&self, room_id: &RoomId, now: Timestamp) -> RoomGuard;

    /// 既存ルームのロックを取得する（未登録なら `None`、ルームは作らない）
    async fn lock_existing(&self, room_id: &RoomId) -> Option<RoomGuard>;

    /// 登録済みルーム数を取得
    async fn count_rooms(&self) -> usize;

    /// ルーム状態を取得し、存在しなければ初期状態で作成する
    async fn find_or_create(&self, room_id: &RoomId, now: Timestamp) -> RoomState {
        *self.lock_or_create(room_id, now).await
    }

    /// 既存ルームに再生操作を適用し、更新後の状態を返す
    ///
    /// ルームが存在しない場合は何もせず `None` を返す。
    async fn apply_playback(
        &self,
        room_id: &RoomId,
        command: PlaybackCommand,
        now: Timestamp,
    ) -> Option<RoomState> {
        let mut room = self.lock_existing(room_id).await?;
        room.apply(command, now);
        Some(*room)
    }
}
