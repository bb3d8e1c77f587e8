//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, RepositoryError, Room, RoomCode, UserId};

/// Result of a leave operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// The connection was a member and has been removed
    pub removed: bool,
    /// Members left in the room afterwards
    pub remaining: usize,
    /// The room became empty and was dropped from the registry
    pub room_closed: bool,
}

/// Room Registry trait
///
/// Process-wide mapping from room code to the set of live connections.
/// Each operation is atomic with respect to the member set of the room it
/// touches; implementations must never hold their exclusion across network I/O.
///
/// ## Invariant
///
/// A room is present iff it has at least one member: it is created by the
/// first successful `join` and dropped by the `leave` that empties it.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Admit a connection, creating the room on first join.
    ///
    /// Returns the occupancy after admission. A rejected join leaves the
    /// registry untouched (no empty room is left behind).
    async fn join(
        &self,
        room_code: RoomCode,
        connection_id: ConnectionId,
        user_id: Option<UserId>,
    ) -> Result<usize, RepositoryError>;

    /// Remove a connection; idempotent. Drops the room when it becomes empty.
    async fn leave(&self, room_code: &RoomCode, connection_id: &ConnectionId) -> LeaveOutcome;

    /// Snapshot of the room's members other than `exclude` (empty if the room is absent)
    async fn members_except(
        &self,
        room_code: &RoomCode,
        exclude: &ConnectionId,
    ) -> Vec<ConnectionId>;

    /// 現在のメンバー数（ルームが存在しなければ 0）
    async fn count_members(&self, room_code: &RoomCode) -> usize;

    /// ルームがレジストリに存在するか
    async fn contains_room(&self, room_code: &RoomCode) -> bool;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_code: &RoomCode) -> Option<Room>;

    /// 全ルームのスナップショットを取得
    async fn list_rooms(&self) -> Vec<Room>;
}
