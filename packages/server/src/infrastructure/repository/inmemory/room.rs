//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 直列化
//!
//! マップはエントリの追加と検索の間だけロックし、各ルームの状態は
//! それぞれの `Mutex` で保護します。ルームのロック待ちの間にマップのロックは保持しません。
//!
//! ## 既知の制約
//!
//! ルームのエントリは削除されません（最後のメンバーが抜けても残る）。
//! 空ルームの破棄はオプションの改善項目として扱います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RoomGuard, RoomId, RoomRepository, RoomState, Timestamp};

/// インメモリ Room Repository 実装
///
/// ルーム ID → 再生状態のマップを保持し、ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// ルーム ID → 再生状態（ルームごとにロック）
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<RoomState>>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn lock_or_create(&self, room_id: &RoomId, now: Timestamp) -> RoomGuard {
        let room = {
            let mut rooms = self.rooms.lock().await;
            rooms
                .entry(room_id.clone())
                .or_insert_with(|| {
                    tracing::debug!("Room '{}' created", room_id);
                    Arc::new(Mutex::new(RoomState::initial(now)))
                })
                .clone()
        };
        room.lock_owned().await
    }

    async fn lock_existing(&self, room_id: &RoomId) -> Option<RoomGuard> {
        let room = {
            let rooms = self.rooms.lock().await;
            rooms.get(room_id)?.clone()
        };
        Some(room.lock_owned().await)
    }

    async fn count_rooms(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}
