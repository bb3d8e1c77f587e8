//! WebSocket signaling relay server.
//!
//! Peers join a room with their first frame and every later frame is relayed
//! verbatim to the other members of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin rendezvous-server
//! cargo run --bin rendezvous-server -- --host 0.0.0.0 --port 3000 --room-capacity 2
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use rendezvous_server::{
    config::ServerConfig,
    domain::{RoomCapacity, SessionAuthenticator},
    infrastructure::{
        auth::{AnonymousAuthenticator, CookieSessionAuthenticator},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::{Server, state::AppState},
};
use rendezvous_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "rendezvous-server")]
#[command(about = "WebSocket signaling relay with per-room fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Maximum members per room (2 = point-to-point signaling)
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u16).range(1..))]
    room_capacity: u16,

    /// Deadline for delivering one message to one peer, in milliseconds
    #[arg(long, default_value = "2000")]
    send_timeout_ms: u64,

    /// Outbound queue length per connection (1 = one pending message per peer)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    outbox_capacity: u16,

    /// How long a new connection may take to name its room, in milliseconds
    #[arg(long, default_value = "10000")]
    join_timeout_ms: u64,

    /// Admit connections without a `session_id` cookie
    #[arg(long)]
    allow_anonymous: bool,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        Ok(ServerConfig {
            host: self.host,
            port: self.port,
            room_capacity: RoomCapacity::new(usize::from(self.room_capacity))?,
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            outbox_capacity: usize::from(self.outbox_capacity),
            join_timeout: Duration::from_millis(self.join_timeout_ms),
            allow_anonymous: self.allow_anonymous,
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize dependencies in order:
    // 1. Repository (room registry)
    // 2. MessagePusher
    // 3. Authenticator
    // 4. AppState (use cases)
    // 5. Server
    let repository = Arc::new(InMemoryRoomRepository::new(config.room_capacity));
    tracing::info!(
        "Room registry ready (capacity {} per room)",
        repository.capacity().get()
    );

    let message_pusher = Arc::new(WebSocketMessagePusher::new(config.send_timeout));

    let authenticator: Arc<dyn SessionAuthenticator> = if config.allow_anonymous {
        tracing::warn!("Anonymous connections are allowed");
        Arc::new(AnonymousAuthenticator)
    } else {
        Arc::new(CookieSessionAuthenticator)
    };

    let app_state = AppState::new(
        repository,
        message_pusher,
        authenticator,
        config.connection_settings(),
    );

    let server = Server::new(app_state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
