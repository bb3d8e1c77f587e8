//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 各コネクションの送信キュー（`PusherChannel`）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信キューを受け取り、メッセージ送信に使用します。
//!
//! 送信キューは有界で、各送信には期限（`send_timeout`）があります。
//! 遅いピアは自分宛ての配送を失敗させるだけで、他のピアへの配送を止めません。
//! ロックは送信前に解放されます。

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::sync::{Mutex, mpsc::error::SendTimeoutError};

use crate::domain::{
    ConnectionId, DeliveryReport, MessagePushError, MessagePusher, Payload, PusherChannel,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のコネクションの送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
    /// 1 ピアあたりの送信期限
    send_timeout: Duration,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            send_timeout,
        }
    }

    /// 登録中のコネクション数
    pub async fn registered_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    async fn deliver(
        &self,
        target: ConnectionId,
        sender: Option<PusherChannel>,
        payload: Payload,
    ) -> DeliveryReport {
        let outcome = match sender {
            None => Err(MessagePushError::ClientNotFound(target)),
            Some(sender) => sender
                .send_timeout(payload, self.send_timeout)
                .await
                .map_err(|e| match e {
                    SendTimeoutError::Timeout(_) => MessagePushError::Timeout(target),
                    SendTimeoutError::Closed(_) => MessagePushError::ChannelClosed(target),
                }),
        };

        DeliveryReport { target, outcome }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        payload: Payload,
    ) -> Result<(), MessagePushError> {
        let sender = self.clients.lock().await.get(connection_id).cloned();
        self.deliver(*connection_id, sender, payload).await.outcome
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        payload: &Payload,
    ) -> Vec<DeliveryReport> {
        // 送信キューを複製してからロックを解放する
        let senders: Vec<(ConnectionId, Option<PusherChannel>)> = {
            let clients = self.clients.lock().await;
            targets
                .into_iter()
                .map(|target| (target, clients.get(&target).cloned()))
                .collect()
        };

        let reports = join_all(
            senders
                .into_iter()
                .map(|(target, sender)| self.deliver(target, sender, payload.clone())),
        )
        .await;

        for report in &reports {
            match &report.outcome {
                Ok(()) => tracing::debug!("Relayed {} bytes to '{}'", payload.len(), report.target),
                // ブロードキャストでは一部の送信失敗を許容
                Err(e) => tracing::warn!("Failed to relay to '{}': {}", report.target, e),
            }
        }

        reports
    }
}
