//! Game-related error types
//!
//! Only rejected operations live here. Lookups of unknown tables, players or
//! seats are answered with `Option`, never with an error.

use thiserror::Error;

/// Errors that can occur during seating and session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    // Seating errors
    #[error("Player {user_id} is already seated at this table")]
    PlayerAlreadySeated { user_id: String },
    #[error("Table is full. There are already {capacity} players")]
    TableFull { capacity: usize },
    #[error("There is no seat at {index}")]
    NegativeSeatIndex { index: isize },

    // Session errors
    #[error("Table {session_id} has been stopped")]
    SessionStopped { session_id: u64 },
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
