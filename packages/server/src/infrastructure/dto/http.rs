//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// One live room in `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room_code: String,
    pub occupancy: usize,
    pub capacity: usize,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Member entry of `GET /api/rooms/{room_code}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub user_id: Option<u64>,
    /// RFC 3339 (UTC)
    pub joined_at: String,
}

/// `GET /api/rooms/{room_code}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room_code: String,
    pub capacity: usize,
    /// Sorted by join time
    pub members: Vec<MemberDetailDto>,
    /// RFC 3339 (UTC)
    pub created_at: String,
}
