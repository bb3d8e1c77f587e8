//! CLI peer for the signaling relay.
//!
//! Joins a room and sends every input line verbatim as one text frame; frames
//! relayed from the other peers are printed as they arrive.
//! Reconnects on transport errors (max 5 attempts with 5 second interval).
//! A rejected session or a full room ends the client immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin rendezvous-client -- --room 123456 --session 1
//! cargo run --bin rendezvous-client -- -r 123456 -s 2 -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use rendezvous_client::{ClientOptions, run_client};
use rendezvous_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "rendezvous-client")]
#[command(about = "Signaling peer that relays stdin lines to the other members of a room", long_about = None)]
struct Args {
    /// Room code to join
    #[arg(short = 'r', long)]
    room: String,

    /// Session credential sent as the `session_id` cookie
    #[arg(short = 's', long)]
    session: Option<String>,

    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let options = ClientOptions {
        url: args.url,
        room: args.room,
        session: args.session,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
