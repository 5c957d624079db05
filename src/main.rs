//! Message Board Server - Entry Point
//!
//! Starts the Board actor and the TCP listener, accepting connections.

use std::env;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_board::{listener, Board, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_board=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_board=info")),
        )
        .init();

    // Bind address and board name from the command line, or defaults
    let config = Config::from_args(env::args());

    // Each board has its own task for serialization of events
    let (board, handle) = Board::new(config.board_name.clone(), config.event_queue_capacity);
    tokio::spawn(board.run());

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Message board listening on {}", config.addr);

    listener::serve(listener, handle, config.delivery_capacity).await;

    Ok(())
}
