//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 配送対象の選定（送信者を除く同じルームのメンバーのみ）
//!
//! ### なぜこのテストが必要か
//! - 自分自身への配送や、別ルームへの漏洩が起きないことを保証する
//! - ペイロードが変更されずにそのまま届くことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームの他メンバーへの配送
//! - エッジケース：送信者のみのルーム、存在しないルーム

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DeliveryReport, MessagePusher, Payload, RoomCode, RoomRepository,
};

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ中継を実行
    ///
    /// レジストリのロック下でメンバーのスナップショットを取り、ロック解放後に配送する。
    /// 配送失敗はピアごとの結果として返るだけで、送信者の状態には影響しない。
    ///
    /// # Returns
    ///
    /// 配送対象ごとの配送結果（配送対象が無ければ空）
    pub async fn execute(
        &self,
        room_code: &RoomCode,
        from: &ConnectionId,
        payload: Payload,
    ) -> Vec<DeliveryReport> {
        let targets = self.repository.members_except(room_code, from).await;
        if targets.is_empty() {
            tracing::debug!("No peers in room '{}' to relay to", room_code);
            return Vec::new();
        }

        self.message_pusher.broadcast(targets, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePushError, PusherChannel, RoomCapacity},
        infrastructure::repository::InMemoryRoomRepository,
    };
    use tokio::sync::Mutex;

    // Recording MessagePusher for testing
    #[derive(Default)]
    struct RecordingMessagePusher {
        broadcasts: Mutex<Vec<(Vec<ConnectionId>, Payload)>>,
    }

    #[async_trait::async_trait]
    impl MessagePusher for RecordingMessagePusher {
        async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {
            // No-op for mock
        }

        async fn unregister_client(&self, _connection_id: &ConnectionId) {
            // No-op for mock
        }

        async fn push_to(
            &self,
            _connection_id: &ConnectionId,
            _payload: Payload,
        ) -> Result<(), MessagePushError> {
            Ok(())
        }

        async fn broadcast(
            &self,
            targets: Vec<ConnectionId>,
            payload: &Payload,
        ) -> Vec<DeliveryReport> {
            let reports = targets
                .iter()
                .map(|target| DeliveryReport {
                    target: *target,
                    outcome: Ok(()),
                })
                .collect();
            self.broadcasts
                .lock()
                .await
                .push((targets, payload.clone()));
            reports
        }
    }

    fn room_code(code: &str) -> RoomCode {
        RoomCode::new(code).unwrap()
    }

    fn setup() -> (
        RelayMessageUseCase,
        Arc<InMemoryRoomRepository>,
        Arc<RecordingMessagePusher>,
    ) {
        let repository = Arc::new(InMemoryRoomRepository::new(RoomCapacity::new(3).unwrap()));
        let pusher = Arc::new(RecordingMessagePusher::default());
        let usecase = RelayMessageUseCase::new(repository.clone(), pusher.clone());
        (usecase, repository, pusher)
    }

    #[tokio::test]
    async fn test_relay_excludes_sender_and_other_rooms() {
        // テスト項目: 送信者自身と別ルームのメンバーには配送されない
        // given (前提条件):
        let (usecase, repository, pusher) = setup();
        let (a, b, c, outsider) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        for id in [a, b, c] {
            repository.join(room_code("R1"), id, None).await.unwrap();
        }
        repository.join(room_code("R2"), outsider, None).await.unwrap();

        // when (操作):
        let payload = Payload::Text(r#"{"sdp":"offer-x"}"#.to_string());
        let reports = usecase.execute(&room_code("R1"), &a, payload.clone()).await;

        // then (期待する結果):
        assert_eq!(reports.len(), 2);
        let broadcasts = pusher.broadcasts.lock().await;
        assert_eq!(broadcasts.len(), 1);
        let (targets, relayed) = &broadcasts[0];
        assert!(targets.contains(&b));
        assert!(targets.contains(&c));
        assert!(!targets.contains(&a));
        assert!(!targets.contains(&outsider));
        // ペイロードは変更されない
        assert_eq!(relayed, &payload);
    }

    #[tokio::test]
    async fn test_relay_alone_in_room_delivers_nothing() {
        // テスト項目: 送信者しかいないルームでは配送しない
        // given (前提条件):
        let (usecase, repository, pusher) = setup();
        let a = ConnectionId::generate();
        repository.join(room_code("solo"), a, None).await.unwrap();

        // when (操作):
        let reports = usecase
            .execute(&room_code("solo"), &a, Payload::Binary(vec![0xde, 0xad]))
            .await;

        // then (期待する結果):
        assert!(reports.is_empty());
        assert!(pusher.broadcasts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_relay_to_unknown_room_does_not_create_it() {
        // テスト項目: 参加されていないルームへの中継はルームを生成しない
        // given (前提条件):
        let (usecase, repository, _pusher) = setup();
        let a = ConnectionId::generate();

        // when (操作):
        let reports = usecase
            .execute(&room_code("ghost"), &a, Payload::Text("hi".to_string()))
            .await;

        // then (期待する結果):
        assert!(reports.is_empty());
        assert!(!repository.contains_room(&room_code("ghost")).await);
    }
}
