//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断したコネクションが全グループから外れること
//!
//! ### なぜこのテストが必要か
//! - 切断後のファンアウトが閉じたチャンネルに向かわないことを保証
//! - ルーム状態は切断で消えない（最後の参加者が抜けても残る）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームに参加中のコネクションの切断
//! - エッジケース：最後の参加者の切断（ルーム状態は残る）

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者切断を実行
    ///
    /// 他の参加者への通知は行わず、ルーム状態にも触れない。
    pub async fn execute(&self, connection: &Connection) {
        self.message_pusher.unregister_client(&connection.id).await;
        tracing::info!("'{}' disconnected", connection.display_name());
    }
}
