//! Infrastructure layer: concrete registry, delivery, authentication and wire formats.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod repository;
