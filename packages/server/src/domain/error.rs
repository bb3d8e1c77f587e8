//! Domain error types.

use thiserror::Error;

use super::{ConnectionId, ConnectionState};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("room code must not be empty")]
    EmptyRoomCode,

    #[error("room code must be at most {0} characters")]
    RoomCodeTooLong(usize),

    #[error("room code must not contain control characters")]
    InvalidRoomCode,

    #[error("user id must be a positive integer")]
    InvalidUserId,

    #[error("room capacity must be at least 1")]
    ZeroCapacity,
}

/// Room admission errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The room already holds as many members as the capacity policy allows
    #[error("room is full (capacity {capacity})")]
    RoomFull { capacity: usize },
}

/// Invalid step in the connection lifecycle state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("connection {connection} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        connection: ConnectionId,
        from: ConnectionState,
        to: ConnectionState,
    },
}

/// Session authentication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing session credential")]
    MissingCredential,

    #[error("invalid session credential")]
    InvalidCredential,
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Per-peer delivery failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} is not registered")]
    ClientNotFound(ConnectionId),

    #[error("outbox of connection {0} is closed")]
    ChannelClosed(ConnectionId),

    #[error("delivery to connection {0} timed out")]
    Timeout(ConnectionId),
}
