//! Server configuration.

use std::time::Duration;

use crate::domain::RoomCapacity;

/// Runtime settings of the relay server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Capacity policy applied to every room
    pub room_capacity: RoomCapacity,
    /// Deadline for delivering one message to one peer
    pub send_timeout: Duration,
    /// Per-connection outbound queue length (1: at most one message pending per peer)
    pub outbox_capacity: usize,
    /// How long a new connection may take to send its join frame
    pub join_timeout: Duration,
    /// Admit connections without a session credential
    pub allow_anonymous: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            room_capacity: RoomCapacity::default(),
            send_timeout: Duration::from_millis(2_000),
            outbox_capacity: 1,
            join_timeout: Duration::from_millis(10_000),
            allow_anonymous: false,
        }
    }
}

impl ServerConfig {
    /// Settings each connection handler needs
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            room_capacity: self.room_capacity,
            outbox_capacity: self.outbox_capacity.max(1),
            join_timeout: self.join_timeout,
        }
    }
}

/// Per-connection settings shared through the application state
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub room_capacity: RoomCapacity,
    pub outbox_capacity: usize,
    pub join_timeout: Duration,
}
