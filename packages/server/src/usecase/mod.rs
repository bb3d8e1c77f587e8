//! UseCase layer: the operations the connection handlers and HTTP API call.

mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod relay_message;

pub use error::{GetRoomDetailError, JoinError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_message::RelayMessageUseCase;
