//! CLI peer for the signaling relay.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
pub use session::{ClientOptions, build_request};
