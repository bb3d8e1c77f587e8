//! Value objects of the relay domain.
//!
//! 不変で、生成時にバリデーション済みであることを型で保証します。

use std::{fmt, num::NonZeroUsize};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueError;

/// Upper bound on the length of a room code (in characters)
pub const ROOM_CODE_MAX_LENGTH: usize = 64;

/// Room code: the opaque key that groups live connections.
///
/// Kept exactly as received: `"X"` and `" X "` name different rooms.
/// Blank codes, codes longer than [`ROOM_CODE_MAX_LENGTH`] and codes with
/// control characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(ValueError::EmptyRoomCode);
        }
        if value.chars().count() > ROOM_CODE_MAX_LENGTH {
            return Err(ValueError::RoomCodeTooLong(ROOM_CODE_MAX_LENGTH));
        }
        if value.chars().any(char::is_control) {
            return Err(ValueError::InvalidRoomCode);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one live connection.
///
/// Room membership is keyed by this handle, never by user identity: the same
/// user may hold several connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated user identity supplied by the session collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// User ids start at 1; zero is reserved for "no user".
    pub fn new(value: u64) -> Result<Self, ValueError> {
        if value == 0 {
            return Err(ValueError::InvalidUserId);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum number of members a room admits.
///
/// Always bounded. The default of two is the point-to-point signaling cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomCapacity(NonZeroUsize);

impl RoomCapacity {
    pub const POINT_TO_POINT: RoomCapacity = RoomCapacity(NonZeroUsize::MIN.saturating_add(1));

    pub fn new(value: usize) -> Result<Self, ValueError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(ValueError::ZeroCapacity)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for RoomCapacity {
    fn default() -> Self {
        Self::POINT_TO_POINT
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
