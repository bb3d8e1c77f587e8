//! Real-time signaling relay.
//!
//! Peers connect over WebSocket, name a room, and every frame they send is
//! relayed verbatim to the other members of that room. Rooms live only in
//! memory and disappear the moment their last member leaves.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
