//! Server configuration
//!
//! Built from command-line arguments, falling back to defaults:
//! `chat_board [ADDR] [BOARD_NAME]`

/// Default listen address
pub const DEFAULT_ADDR: &str = "0.0.0.0:5001";

/// Default board name
pub const DEFAULT_BOARD_NAME: &str = "1";

/// Pending events the board queue holds before submitters wait
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Pending deliveries per client before the board waits on it
pub const DELIVERY_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the listener binds to
    pub addr: String,
    /// Name of the single board
    pub board_name: String,
    pub event_queue_capacity: usize,
    pub delivery_capacity: usize,
}

impl Config {
    /// Build from an argv-style iterator (program name first)
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().skip(1);
        let defaults = Self::default();

        Self {
            addr: args.next().unwrap_or(defaults.addr),
            board_name: args.next().unwrap_or(defaults.board_name),
            ..defaults
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            board_name: DEFAULT_BOARD_NAME.to_string(),
            event_queue_capacity: EVENT_QUEUE_CAPACITY,
            delivery_capacity: DELIVERY_CAPACITY,
        }
    }
}
