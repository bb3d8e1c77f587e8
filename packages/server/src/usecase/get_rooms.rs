//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在する（メンバーが一人以上いる）ルームをコード順で返す
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, RoomCapacity, RoomCode},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test]
    async fn test_get_rooms_lists_only_live_rooms() {
        // テスト項目: 全員が退出したルームは一覧に含まれない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new(RoomCapacity::default()));
        let usecase = GetRoomsUseCase::new(repository.clone());
        let (a, b) = (ConnectionId::generate(), ConnectionId::generate());
        let live = RoomCode::new("live").unwrap();
        let gone = RoomCode::new("gone").unwrap();
        repository.join(live.clone(), a, None).await.unwrap();
        repository.join(gone.clone(), b, None).await.unwrap();
        repository.leave(&gone, &b).await;

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].code, live);
    }
}
