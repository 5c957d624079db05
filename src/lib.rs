//! In-memory Broadcast Message Board Library
//!
//! Clients connect over TCP, pick a name, and every line they send is
//! relayed to everyone else currently on the board. Nothing is stored:
//! a client that is not connected when a line is published never sees it.
//!
//! # Protocol
//! - Server → client on connect: `username> `
//! - Client → server: one line with the name (whitespace trimmed)
//! - Every later line is broadcast to the other members as `<name>: <line>`
//! - Closing the connection logs the client out
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `Board` is the actor owning the membership map
//! - Each connection has a `handler` task submitting events through a `BoardHandle`
//! - No locks needed - all membership access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use chat_board::{listener, Board};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (board, handle) = Board::new("1", 256);
//!     tokio::spawn(board.run());
//!
//!     let tcp = TcpListener::bind("127.0.0.1:5001").await.unwrap();
//!     listener::serve(tcp, handle, 32).await;
//! }
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod handler;
pub mod listener;
pub mod member;
pub mod membership;
pub mod message;
pub mod types;

// Re-export main types for convenience
pub use board::{Board, BoardHandle};
pub use config::Config;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use member::Member;
pub use membership::Membership;
pub use message::{Delivery, Notification, PROMPT};
pub use types::ConnectionId;
