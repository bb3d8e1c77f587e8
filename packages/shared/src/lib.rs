//! Utilities shared by the rendezvous server and client binaries.

pub mod logger;
pub mod time;
