//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - ハンドシェイク時のトークン検証と、コネクションへの Identity の付与
//!
//! ### なぜこのテストが必要か
//! - 認証は「参考情報」であり、接続の可否を決めない
//! - トークンが無効でも接続は確立され、匿名として扱われることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークン → Identity 付与
//! - 正常系：トークン無し → 匿名
//! - 異常系：期限切れ / 不正なトークン → 匿名（エラーにはならない）

use std::sync::Arc;

use crate::domain::{
    AuthError, Connection, ConnectionIdFactory, CredentialVerifier, Identity, MessagePusher,
    PusherChannel,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// CredentialVerifier（トークン検証の抽象化）
    verifier: Arc<dyn CredentialVerifier>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            verifier,
            message_pusher,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `token` - ハンドシェイクのクエリパラメータで渡されたトークン（任意）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 接続成功（認証に失敗した場合も匿名として成功）
    /// * `Err(ConnectError)` - コネクション ID の採番に失敗
    pub async fn execute(
        &self,
        token: Option<&str>,
        sender: PusherChannel,
    ) -> Result<Connection, ConnectError> {
        // 1. コネクション ID を採番
        let connection_id = ConnectionIdFactory::generate()?;

        // 2. トークンを検証（失敗しても接続は拒否しない）
        let identity = self.authenticate(token);
        let connection = Connection::new(connection_id, identity);

        // 3. MessagePusher にコネクションを登録
        self.message_pusher
            .register_client(connection.id.clone(), sender)
            .await;

        Ok(connection)
    }

    /// トークンを検証し、成功した場合のみ Identity を返す
    pub fn authenticate(&self, token: Option<&str>) -> Option<Identity> {
        let token = token.filter(|t| !t.is_empty())?;

        match self.verifier.verify(token) {
            Ok(identity) => Some(identity),
            Err(AuthError::Expired) => {
                tracing::warn!("Handshake token expired, continuing as anonymous");
                None
            }
            Err(e) => {
                tracing::warn!("Handshake token rejected ({}), continuing as anonymous", e);
                None
            }
        }
    }
}
