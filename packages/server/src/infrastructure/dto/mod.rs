//! Data Transfer Objects for the wire (WebSocket frames and HTTP responses).

mod conversion;
pub mod http;
pub mod websocket;
