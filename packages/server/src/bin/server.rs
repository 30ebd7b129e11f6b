//! WebRTC signaling server.
//!
//! Pairs two browser peers per room and relays their SDP offer/answer over
//! WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin duet-server
//! cargo run --bin duet-server -- --host 0.0.0.0 --port 3000 --relay-timeout-secs 30
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use duet_server::{
    infrastructure::repository::InMemoryRoomRepository,
    signaling::SignalingConfig,
    ui::{AppState, Server},
};
use duet_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "duet-server")]
#[command(about = "WebRTC signaling relay: pairs peers per room and relays offer/answer", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Give up a relay when a peer does not answer within this many seconds
    #[arg(long)]
    relay_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_CRATE_NAME"), &args.log_level);

    // 1. Repository (in-memory room registry)
    let config = SignalingConfig {
        relay_timeout: args.relay_timeout_secs.map(Duration::from_secs),
    };
    let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock), config));

    // 2. UseCases
    let state = AppState::from_repository(repository);

    // 3. Server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
