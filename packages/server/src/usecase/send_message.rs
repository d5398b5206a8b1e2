//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ペイロードの roomId で指定されたルームへの、送信者を除いたファンアウト
//!
//! ### なぜこのテストが必要か
//! - ペイロードは一切加工せずにそのまま中継されることを保証
//! - roomId が無い・不正なメッセージは誰にも届かないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信 → 他のメンバーが receive_message を受信
//! - エッジケース：送信者のみのルーム（ファンアウト対象なし）
//! - 異常系：roomId が無い / 空文字列

use std::sync::Arc;

use crate::domain::{ChatPayload, Connection, MessagePusher, OutboundEvent, RoomId};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// メッセージ送信を実行
    ///
    /// メッセージはルーム状態に保存されない。送信者がそのルームに参加して
    /// いるかどうかも確認しない。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信したメンバー数
    /// * `Err(SendMessageError)` - roomId が無い・不正、またはファンアウト失敗
    pub async fn execute(
        &self,
        connection: &Connection,
        payload: ChatPayload,
    ) -> Result<usize, SendMessageError> {
        // 1. 宛先ルームをペイロードから取り出す
        let room_id = payload
            .room_id()
            .ok_or(SendMessageError::MissingRoomId)?
            .to_string();
        let room_id = RoomId::new(room_id)?;

        // 2. ペイロードをそのまま送信者以外のメンバーへ中継
        let delivered = self
            .message_pusher
            .broadcast_to_group(&room_id, &connection.id, &OutboundEvent::ReceiveMessage(payload))
            .await?;

        tracing::debug!(
            "Relayed message from '{}' to {} member(s) of room '{}'",
            connection.display_name(),
            delivered,
            room_id
        );

        Ok(delivered)
    }
}
