//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのイベント送信と、ルーム単位のグループ管理を抽象化します。
//! ルームのメンバーシップはトランスポート側で管理し、Room Registry には持たせません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent, RoomId};

/// コネクションごとの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// クライアントへのイベント通知インターフェース
///
/// 配送は at-most-once。失敗した送信は再送しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// コネクションの登録を解除し、所属する全てのグループから外す
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// コネクションをルームのグループに追加（冪等）
    async fn join_group(&self, room_id: &RoomId, connection_id: &ConnectionId);

    /// 特定のコネクションにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// ルームのメンバー（`exclude` を除く）にイベントを送信
    ///
    /// 一部のメンバーへの送信失敗は許容し、実際に送信できた数を返す。
    async fn broadcast_to_group(
        &self,
        room_id: &RoomId,
        exclude: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError>;
}
