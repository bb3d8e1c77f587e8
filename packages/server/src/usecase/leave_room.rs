//! UseCase: ルーム退出処理
//!
//! コネクションの終了時に必ず一度だけ呼ばれ、レジストリと送信キューの両方から
//! コネクションを取り除きます。冪等なので二度呼ばれても害はありません。

use std::sync::Arc;

use crate::domain::{ConnectionId, LeaveOutcome, MessagePusher, RoomCode, RoomRepository};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム退出を実行
    ///
    /// 最後のメンバーが退出した場合、ルームはレジストリから削除される。
    pub async fn execute(&self, room_code: &RoomCode, connection_id: &ConnectionId) -> LeaveOutcome {
        let outcome = self.repository.leave(room_code, connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;

        if outcome.room_closed {
            tracing::info!("Room '{}' is empty, closing room", room_code);
        }

        outcome
    }
}
