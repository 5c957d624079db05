//! Connection accept loop
//!
//! Spawns one handler task per accepted connection, all sharing one board.

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::board::BoardHandle;
use crate::handler::handle_connection;
use crate::types::ConnectionId;

/// Accept connections forever
///
/// Accept errors and handler errors are logged; neither stops the loop.
pub async fn serve(listener: TcpListener, board: BoardHandle, delivery_capacity: usize) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let connection_id = ConnectionId::new();
                info!("New connection {} from {}", connection_id, addr);
                let board = board.clone();

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) =
                        handle_connection(stream, connection_id, board, delivery_capacity).await
                    {
                        warn!("Connection {} ended with error: {}", connection_id, e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
