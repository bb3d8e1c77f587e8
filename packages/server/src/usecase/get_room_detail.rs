//! UseCase: ルーム詳細取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomCode, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム詳細を取得
    ///
    /// # Arguments
    ///
    /// * `room_code` - パスから受け取った未検証のルームコード
    pub async fn execute(&self, room_code: String) -> Result<Room, GetRoomDetailError> {
        let room_code =
            RoomCode::try_from(room_code).map_err(|_| GetRoomDetailError::InvalidRoomCode)?;

        self.repository
            .get_room(&room_code)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, RoomCapacity},
        infrastructure::repository::InMemoryRoomRepository,
    };

    fn setup() -> (GetRoomDetailUseCase, Arc<InMemoryRoomRepository>) {
        let repository = Arc::new(InMemoryRoomRepository::new(RoomCapacity::default()));
        (GetRoomDetailUseCase::new(repository.clone()), repository)
    }

    #[tokio::test]
    async fn test_get_room_detail_found() {
        // テスト項目: 存在するルームの詳細が取得できる
        // given (前提条件):
        let (usecase, repository) = setup();
        let a = ConnectionId::generate();
        repository
            .join(RoomCode::new("123456").unwrap(), a, None)
            .await
            .unwrap();

        // when (操作):
        let result = usecase.execute("123456".to_string()).await;

        // then (期待する結果):
        let room = result.unwrap();
        assert_eq!(room.code.as_str(), "123456");
        assert!(room.has_member(&a));
    }

    #[tokio::test]
    async fn test_get_room_detail_not_found_and_invalid() {
        // テスト項目: 存在しない・不正なルームコードはエラーになる
        // given (前提条件):
        let (usecase, _repository) = setup();

        // when (操作):
        let missing = usecase.execute("nope".to_string()).await;
        let invalid = usecase.execute("   ".to_string()).await;

        // then (期待する結果):
        assert_eq!(missing, Err(GetRoomDetailError::RoomNotFound));
        assert_eq!(invalid, Err(GetRoomDetailError::InvalidRoomCode));
    }
}
