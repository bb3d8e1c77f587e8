//! Error types for the signaling peer.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The relay refused the session credential before the upgrade
    #[error("Unauthorized: the relay rejected the session credential")]
    Unauthorized,

    /// The room already holds as many peers as the relay allows
    #[error("Room '{0}' is full")]
    RoomFull(String),

    /// The relay closed the socket with an error notification
    #[error("Rejected by relay: {0}")]
    Rejected(String),

    /// Invalid client-side input (e.g. a malformed URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
