//! WebSocket relay server: routing, connection handlers, and process lifecycle.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::{error::ConnectionError, websocket::parse_join_frame};
pub use server::Server;
pub use signal::shutdown_signal;
