//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError};

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// 人数制限に達している
    #[error("Room full")]
    RoomFull { capacity: usize },
}

impl From<RepositoryError> for JoinError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Room(RoomError::RoomFull { capacity }) => {
                JoinError::RoomFull { capacity }
            }
        }
    }
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room code is invalid")]
    InvalidRoomCode,

    #[error("room not found")]
    RoomNotFound,
}
