//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信を抽象化します。
//! WebSocket の送信キュー管理は Infrastructure 層が担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Payload};

/// Outbound queue of one connection, drained by its socket writer task
pub type PusherChannel = mpsc::Sender<Payload>;

/// Outcome of delivering one payload to one peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub target: ConnectionId,
    pub outcome: Result<(), MessagePushError>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 送信キューを登録解除（冪等）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のコネクションへ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        payload: Payload,
    ) -> Result<(), MessagePushError>;

    /// Deliver `payload` to every target independently.
    ///
    /// One report per target, in target order. A failing target never
    /// prevents delivery to the others and is not unregistered here.
    async fn broadcast(&self, targets: Vec<ConnectionId>, payload: &Payload)
    -> Vec<DeliveryReport>;
}
