//! Message definitions
//!
//! The events handlers submit to the board, the deliveries the board
//! pushes back, and the bytes of the line protocol.

use tokio::sync::{mpsc, oneshot};

/// Prompt written to a client right after it connects (no newline)
pub const PROMPT: &str = "username> ";

/// Handler → Board event
///
/// Constructed by a connection handler, consumed exactly once by the
/// board's event loop.
#[derive(Debug)]
pub enum Notification {
    /// Register `name`, replacing any earlier registration of it
    Login {
        name: String,
        reply: mpsc::Sender<Delivery>,
    },
    /// Remove `name` if registered
    Logout { name: String },
    /// Broadcast `text` to everyone except `name`
    Publish { name: String, text: String },
    /// Snapshot of the registered names, sorted
    Members { reply: oneshot::Sender<Vec<String>> },
}

/// Board → Handler message
///
/// One line published by another member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Name the line was published under
    pub from: String,
    /// The line as received, trailing newline included
    pub text: String,
}

impl Delivery {
    pub fn new(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            text: text.into(),
        }
    }

    /// Render as it is written to the recipient's stream
    pub fn to_wire(&self) -> String {
        format!("{}: {}", self.from, self.text)
    }
}
