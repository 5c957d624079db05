//! Board actor implementation
//!
//! The single owner of one room's membership. Handlers never touch the
//! membership map; they submit `Notification`s through a `BoardHandle`
//! and the board applies them one at a time, in arrival order.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::AppError;
use crate::member::Member;
use crate::membership::Membership;
use crate::message::{Delivery, Notification};

/// The board actor
///
/// Created together with its first handle by [`Board::new`], then driven
/// by [`Board::run`] on its own task.
pub struct Board {
    /// Board name, used in logs
    name: String,
    /// Registered members: name -> Member
    membership: Membership,
    /// Event receiver channel
    receiver: mpsc::Receiver<Notification>,
}

/// Cloneable submission side of a board
///
/// Every method suspends only while the board's event queue is full.
#[derive(Debug, Clone)]
pub struct BoardHandle {
    name: String,
    sender: mpsc::Sender<Notification>,
}

impl Board {
    /// Create a board whose event queue holds up to `capacity` pending events
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(name: impl Into<String>, capacity: usize) -> (Self, BoardHandle) {
        let name = name.into();
        let (sender, receiver) = mpsc::channel(capacity);
        let board = Self {
            name: name.clone(),
            membership: Membership::new(),
            receiver,
        };
        (board, BoardHandle { name, sender })
    }

    /// Run the board event loop
    ///
    /// Processes events until every handle has been dropped.
    pub async fn run(mut self) {
        info!("Board {} started", self.name);

        while let Some(notification) = self.receiver.recv().await {
            self.handle_notification(notification).await;
        }

        info!("Board {} shutting down", self.name);
    }

    /// Process a single event
    async fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::Login { name, reply } => self.handle_login(name, reply),
            Notification::Logout { name } => self.handle_logout(&name),
            Notification::Publish { name, text } => self.handle_publish(name, text).await,
            Notification::Members { reply } => {
                let _ = reply.send(self.membership.names());
            }
        }
    }

    fn handle_login(&mut self, name: String, reply: mpsc::Sender<Delivery>) {
        info!("Board {}: login from [{}]", self.name, name);
        // The displaced sender is dropped here, closing that channel.
        if self.membership.insert(Member::new(name.clone(), reply)).is_some() {
            debug!("Board {}: [{}] replaced an earlier login", self.name, name);
        }
        debug!("Board {}: {} members", self.name, self.membership.len());
    }

    fn handle_logout(&mut self, name: &str) {
        if self.membership.remove(name).is_some() {
            info!("Board {}: logout from [{}]", self.name, name);
        } else {
            debug!("Board {}: logout from unknown [{}]", self.name, name);
        }
        debug!("Board {}: {} members", self.name, self.membership.len());
    }

    /// Fan a line out to every member but the sender
    ///
    /// Each send waits for room in that member's channel, so one slow
    /// reader holds up this publish and every event queued behind it.
    async fn handle_publish(&self, name: String, text: String) {
        debug!("Board {}: msg from [{}]", self.name, name);
        let delivery = Delivery::new(name, text);

        for member in self.membership.recipients(&delivery.from) {
            // Also covers a receiver dropped while the send is waiting
            if !member.is_connected() || member.send(delivery.clone()).await.is_err() {
                debug!(
                    "Board {}: [{}] is no longer receiving, skipped",
                    self.name, member.name
                );
                continue;
            }
            debug!("Board {}:   fwd to [{}]", self.name, member.name);
        }
    }
}

impl BoardHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `name`; deliveries for it go to `reply`
    pub async fn login(
        &self,
        name: impl Into<String>,
        reply: mpsc::Sender<Delivery>,
    ) -> Result<(), AppError> {
        self.submit(Notification::Login {
            name: name.into(),
            reply,
        })
        .await
    }

    /// Unregister `name`; a no-op if it is not registered
    pub async fn logout(&self, name: impl Into<String>) -> Result<(), AppError> {
        self.submit(Notification::Logout { name: name.into() }).await
    }

    /// Send `text` to every member except `name`
    pub async fn publish(
        &self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), AppError> {
        self.submit(Notification::Publish {
            name: name.into(),
            text: text.into(),
        })
        .await
    }

    /// Registered names, sorted, as of this point in the event order
    pub async fn members(&self) -> Result<Vec<String>, AppError> {
        let (reply, response) = oneshot::channel();
        self.submit(Notification::Members { reply }).await?;
        response.await.map_err(|_| AppError::BoardClosed)
    }

    async fn submit(&self, notification: Notification) -> Result<(), AppError> {
        self.sender
            .send(notification)
            .await
            .map_err(|_| AppError::BoardClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::task::JoinSet;
    use tokio::time::timeout;

    fn spawn_board() -> BoardHandle {
        let (board, handle) = Board::new("test", 16);
        tokio::spawn(board.run());
        handle
    }

    #[tokio::test]
    async fn test_board_name() {
        let (_board, handle) = Board::new("lobby", 1);
        assert_eq!(handle.name(), "lobby");
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let board = spawn_board();
        let (tx, _rx) = mpsc::channel(4);

        board.login("bob", tx).await.unwrap();
        assert_eq!(board.members().await.unwrap(), vec!["bob"]);

        board.logout("bob").await.unwrap();
        assert!(board.members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_unknown_is_noop() {
        let board = spawn_board();
        let (tx, _rx) = mpsc::channel(4);
        board.login("alice", tx).await.unwrap();

        board.logout("nobody").await.unwrap();

        assert_eq!(board.members().await.unwrap(), vec!["alice"]);
    }

    #[tokio::test]
    async fn test_publish_skips_sender() {
        let board = spawn_board();
        let mut receivers = Vec::new();
        for name in ["a", "b", "c", "sender"] {
            let (tx, rx) = mpsc::channel(4);
            board.login(name, tx).await.unwrap();
            receivers.push((name, rx));
        }

        board.publish("sender", "hi\n").await.unwrap();
        // Queued behind the publish, so the fan-out has finished
        board.members().await.unwrap();

        for (name, rx) in receivers.iter_mut() {
            let got = rx.try_recv().ok();
            if *name == "sender" {
                assert_eq!(got, None);
            } else {
                assert_eq!(got, Some(Delivery::new("sender", "hi\n")));
            }
        }
    }

    #[tokio::test]
    async fn test_publish_with_no_other_members() {
        let board = spawn_board();
        let (tx, mut rx) = mpsc::channel(4);
        board.login("bob", tx).await.unwrap();

        board.publish("bob", "anyone?\n").await.unwrap();
        board.members().await.unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_second_login_wins() {
        let board = spawn_board();
        let (first_tx, mut first_rx) = mpsc::channel(4);
        let (second_tx, mut second_rx) = mpsc::channel(4);

        board.login("bob", first_tx).await.unwrap();
        board.login("bob", second_tx).await.unwrap();
        board.publish("alice", "hi\n").await.unwrap();

        assert_eq!(second_rx.recv().await, Some(Delivery::new("alice", "hi\n")));
        // The board dropped the displaced sender
        assert_eq!(first_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_double_login_single_logout_removes_name() {
        let board = spawn_board();
        let (first_tx, _first_rx) = mpsc::channel(4);
        let (second_tx, _second_rx) = mpsc::channel(4);

        board.login("bob", first_tx).await.unwrap();
        board.login("bob", second_tx).await.unwrap();
        board.logout("bob").await.unwrap();

        assert!(board.members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_receiver_does_not_stop_board() {
        let board = spawn_board();
        let (gone_tx, gone_rx) = mpsc::channel(4);
        let (live_tx, mut live_rx) = mpsc::channel(4);
        board.login("gone", gone_tx).await.unwrap();
        board.login("live", live_tx).await.unwrap();
        drop(gone_rx);

        board.publish("sender", "still here\n").await.unwrap();

        assert_eq!(
            live_rx.recv().await,
            Some(Delivery::new("sender", "still here\n"))
        );
        assert_eq!(board.members().await.unwrap(), vec!["gone", "live"]);
    }

    #[tokio::test]
    async fn test_concurrent_events_linearize() {
        let board = spawn_board();
        let mut tasks = JoinSet::new();

        for i in 0..32 {
            let board = board.clone();
            tasks.spawn(async move {
                let name = format!("client-{:02}", i);
                let (tx, rx) = mpsc::channel(1);
                drop(rx);
                board.login(name.clone(), tx).await.unwrap();
                board.publish(name.clone(), "ping\n").await.unwrap();
                if i % 2 == 0 {
                    board.logout(name).await.unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let expected: Vec<String> = (0..32)
            .filter(|i| i % 2 == 1)
            .map(|i| format!("client-{:02}", i))
            .collect();
        assert_eq!(board.members().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_per_sender_order_is_preserved() {
        let board = spawn_board();
        let (tx, mut rx) = mpsc::channel(256);
        board.login("observer", tx).await.unwrap();

        let mut tasks = JoinSet::new();
        for sender in ["x", "y", "z"] {
            let board = board.clone();
            tasks.spawn(async move {
                for seq in 0..20 {
                    board.publish(sender, format!("{}\n", seq)).await.unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }
        board.members().await.unwrap();

        let mut next = std::collections::HashMap::new();
        while let Ok(delivery) = rx.try_recv() {
            let expected = next.entry(delivery.from.clone()).or_insert(0);
            assert_eq!(delivery.text, format!("{}\n", expected));
            *expected += 1;
        }
        assert_eq!(next.values().sum::<i32>(), 60);
    }

    #[tokio::test]
    async fn test_board_stops_when_handles_dropped() {
        let (board, handle) = Board::new("test", 4);
        let task = tokio::spawn(board.run());

        drop(handle);

        timeout(Duration::from_secs(1), task)
            .await
            .expect("board loop ended")
            .unwrap();
    }

    #[tokio::test]
    async fn test_submit_after_board_gone() {
        let (board, handle) = Board::new("test", 4);
        drop(board);

        let result = handle.logout("bob").await;
        assert!(matches!(result, Err(AppError::BoardClosed)));
        assert!(matches!(handle.members().await, Err(AppError::BoardClosed)));
    }
}
