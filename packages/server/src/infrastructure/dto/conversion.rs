//! Conversion logic between domain entities and DTOs.

use rendezvous_shared::time::millis_to_rfc3339;

use crate::domain::{Room, RoomCapacity};
use crate::infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto};

impl RoomSummaryDto {
    pub fn from_room(room: &Room, capacity: RoomCapacity) -> Self {
        Self {
            room_code: room.code.as_str().to_string(),
            occupancy: room.occupancy(),
            capacity: capacity.get(),
            created_at: millis_to_rfc3339(room.created_at.value()),
        }
    }
}

impl RoomDetailDto {
    pub fn from_room(room: &Room, capacity: RoomCapacity) -> Self {
        let mut members: Vec<_> = room.members.iter().collect();
        members.sort_by_key(|(id, member)| (member.joined_at, **id));

        Self {
            room_code: room.code.as_str().to_string(),
            capacity: capacity.get(),
            members: members
                .into_iter()
                .map(|(id, member)| MemberDetailDto {
                    connection_id: id.to_string(),
                    user_id: member.user_id.map(|user| user.value()),
                    joined_at: millis_to_rfc3339(member.joined_at.value()),
                })
                .collect(),
            created_at: millis_to_rfc3339(room.created_at.value()),
        }
    }
}
