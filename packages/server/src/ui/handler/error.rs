//! Errors that end a connection before or while it is served.

use thiserror::Error;

use crate::{
    domain::AuthError,
    infrastructure::dto::websocket::ErrorNotification,
    usecase::JoinError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Missing or invalid session; refused before the upgrade
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// Join frame absent, malformed, or without a usable room code
    #[error("Invalid or missing room_code")]
    InvalidJoinRequest,

    /// Join frame did not arrive in time
    #[error("Timed out waiting for room_code")]
    JoinTimeout,

    /// Capacity policy rejected the join
    #[error("Room full")]
    RoomFull,

    /// Receive failure or remote close
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<JoinError> for ConnectionError {
    fn from(error: JoinError) -> Self {
        match error {
            JoinError::RoomFull { .. } => ConnectionError::RoomFull,
        }
    }
}

impl ConnectionError {
    /// Error frame to send before closing, if the peer can still receive one
    pub fn notification(&self) -> Option<ErrorNotification> {
        match self {
            ConnectionError::InvalidJoinRequest
            | ConnectionError::JoinTimeout
            | ConnectionError::RoomFull => Some(ErrorNotification::new(self.to_string())),
            ConnectionError::Unauthorized(_) | ConnectionError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_are_notified() {
        // テスト項目: プロトコルエラーと満室はエラー通知を伴う
        // given (前提条件):
        let invalid = ConnectionError::InvalidJoinRequest;
        let full = ConnectionError::from(JoinError::RoomFull { capacity: 2 });

        // when (操作):
        let invalid_notification = invalid.notification();
        let full_notification = full.notification();

        // then (期待する結果):
        assert_eq!(
            invalid_notification,
            Some(ErrorNotification::new("Invalid or missing room_code"))
        );
        assert_eq!(full_notification, Some(ErrorNotification::new("Room full")));
    }

    #[test]
    fn test_transport_errors_are_not_notified() {
        // テスト項目: 通信エラーでは通知を送らない
        // given (前提条件):
        let error = ConnectionError::Transport("reset".to_string());

        // when (操作) / then (期待する結果):
        assert_eq!(error.notification(), None);
    }
}
