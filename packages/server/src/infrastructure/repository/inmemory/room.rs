//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリのルームレジストリとして使用します。
//!
//! ## 排他制御
//!
//! レジストリ全体を一つの `Mutex` で保護します（粗粒度ロック）。
//! join / leave / members_except はすべて同じロックの下で実行されるため、
//! 同じルームのメンバー集合に対する更新の取りこぼしや、列挙中の変更は発生しません。
//! ロックを保持したままネットワーク I/O を行うことはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use rendezvous_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, LeaveOutcome, Member, RepositoryError, Room, RoomCapacity, RoomCode,
    RoomRepository, Timestamp, UserId,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// room code → Room（メンバーが一人以上いるルームのみ）
    rooms: Mutex<HashMap<RoomCode, Room>>,
    /// 全ルームに一律で適用される人数制限
    capacity: RoomCapacity,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(capacity: RoomCapacity) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// 時刻の取得元を差し替えて作成（テスト用）
    pub fn with_clock(capacity: RoomCapacity, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            capacity,
            clock,
        }
    }

    pub fn capacity(&self) -> RoomCapacity {
        self.capacity
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(
        &self,
        room_code: RoomCode,
        connection_id: ConnectionId,
        user_id: Option<UserId>,
    ) -> Result<usize, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let member = Member::new(user_id, now);

        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(&room_code) {
            Some(room) => Ok(room.admit(connection_id, member, self.capacity)?),
            None => {
                // 新規ルームは参加が成功した場合のみ登録する
                let mut room = Room::new(room_code.clone(), now);
                let occupancy = room.admit(connection_id, member, self.capacity)?;
                rooms.insert(room_code, room);
                Ok(occupancy)
            }
        }
    }

    async fn leave(&self, room_code: &RoomCode, connection_id: &ConnectionId) -> LeaveOutcome {
        let mut rooms = self.rooms.lock().await;

        let Some(room) = rooms.get_mut(room_code) else {
            return LeaveOutcome {
                removed: false,
                remaining: 0,
                room_closed: false,
            };
        };

        let removed = room.remove(connection_id);
        let remaining = room.occupancy();
        let room_closed = room.is_empty();
        if room_closed {
            rooms.remove(room_code);
        }

        LeaveOutcome {
            removed,
            remaining,
            room_closed,
        }
    }

    async fn members_except(
        &self,
        room_code: &RoomCode,
        exclude: &ConnectionId,
    ) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_code)
            .map(|room| room.members_except(exclude))
            .unwrap_or_default()
    }

    async fn count_members(&self, room_code: &RoomCode) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room_code).map(Room::occupancy).unwrap_or(0)
    }

    async fn contains_room(&self, room_code: &RoomCode) -> bool {
        let rooms = self.rooms.lock().await;
        rooms.contains_key(room_code)
    }

    async fn get_room(&self, room_code: &RoomCode) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_code).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut snapshot: Vec<Room> = rooms.values().cloned().collect();
        snapshot.sort_by(|a, b| a.code.cmp(&b.code));
        snapshot
    }
}
