use super::constants::{MIN_BIG_BET, MIN_SMALL_BET, MIN_TURN_TIME_MS};
use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Table settings as supplied by whoever opens the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct GameSettings {
    pub creator_id: String,
    pub small_bet: i64,
    pub big_bet: i64,
    pub turn_time_ms: u64,
    /// Seat count, 0 means "use the configured default"
    pub max_players: usize,
}

impl GameSettings {
    pub fn new(creator_id: impl Into<String>, small_bet: i64, big_bet: i64, turn_time_ms: u64) -> Self {
        Self {
            creator_id: creator_id.into(),
            small_bet,
            big_bet,
            turn_time_ms,
            max_players: 0,
        }
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Replace values no table can run with.
    pub fn normalized(mut self, config: &Config) -> Self {
        if self.small_bet < MIN_SMALL_BET {
            self.small_bet = MIN_SMALL_BET;
        }
        if self.big_bet < MIN_BIG_BET {
            self.big_bet = MIN_BIG_BET;
        }
        if self.turn_time_ms <= MIN_TURN_TIME_MS {
            self.turn_time_ms = config.default_turn_time_ms;
        }
        if self.max_players == 0 {
            self.max_players = config.default_seats;
        }
        self
    }

    pub fn turn_time(&self) -> Duration {
        Duration::from_millis(self.turn_time_ms)
    }
}
