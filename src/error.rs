//! Error types for the message board
//!
//! Defines connection-level errors and delivery send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Every variant is fatal for the connection that hit it and
/// for nothing else.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the client stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The board task is gone and can no longer accept events
    #[error("Board closed")]
    BoardClosed,
}

/// Delivery send errors
///
/// Occurs when the board pushes a message to a member whose
/// receiving side has already gone away.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
