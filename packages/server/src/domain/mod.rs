//! Domain layer: value objects, entities, and the traits the relay depends on.

pub mod authenticator;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use authenticator::SessionAuthenticator;
pub use entity::{Connection, ConnectionState, Member, Payload, Room};
pub use error::{
    AuthError, LifecycleError, MessagePushError, RepositoryError, RoomError, ValueError,
};
pub use message_pusher::{DeliveryReport, MessagePusher, PusherChannel};
pub use repository::{LeaveOutcome, RoomRepository};
pub use value_object::{ConnectionId, RoomCapacity, RoomCode, Timestamp, UserId};

#[cfg(test)]
pub use authenticator::MockSessionAuthenticator;
