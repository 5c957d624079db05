//! Member struct definition
//!
//! Represents one registered client as the board sees it: a name and
//! the sending half of that client's delivery channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::Delivery;

/// Registered board member
///
/// The board holds the only sender; the connection handler owns the
/// receiver.
#[derive(Debug)]
pub struct Member {
    /// Registration key
    pub name: String,
    /// Board → Client delivery channel
    pub sender: mpsc::Sender<Delivery>,
}

impl Member {
    /// Create a new member with the given name and delivery channel
    pub fn new(name: String, sender: mpsc::Sender<Delivery>) -> Self {
        Self { name, sender }
    }

    /// Push a delivery to this member
    ///
    /// Waits while the member's channel is full. Returns an error if the
    /// receiver has been dropped (handler gone).
    pub async fn send(&self, delivery: Delivery) -> Result<(), SendError> {
        self.sender
            .send(delivery)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Check whether the handler is still receiving
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}
