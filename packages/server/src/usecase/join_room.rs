//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 送信キューの登録とレジストリへの参加の順序、拒否時の後始末
//!
//! ### なぜこのテストが必要か
//! - 参加が拒否されたコネクションの送信キューが残ると、配送対象から外れない
//! - 人数制限の判定が既存メンバーに影響しないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加（ルーム生成）、既存ルームへの参加
//! - 異常系：人数制限超過

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, PusherChannel, RoomCode, RoomRepository, UserId,
};

use super::error::JoinError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// 送信キューを先に登録してからレジストリに参加させるため、
    /// 参加直後に届いたメッセージも取りこぼさない。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加後のルームの人数
    /// * `Err(JoinError)` - 参加拒否（レジストリも送信キューも変更されない）
    pub async fn execute(
        &self,
        room_code: RoomCode,
        connection_id: ConnectionId,
        user_id: Option<UserId>,
        sender: PusherChannel,
    ) -> Result<usize, JoinError> {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        match self
            .repository
            .join(room_code, connection_id, user_id)
            .await
        {
            Ok(occupancy) => Ok(occupancy),
            Err(e) => {
                self.message_pusher.unregister_client(&connection_id).await;
                Err(e.into())
            }
        }
    }
}
