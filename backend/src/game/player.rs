use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub user_id: String,
    pub username: String,
    /// Requested seat before seating, assigned seat afterwards. Only `SeatTable` writes it once seated.
    pub seat: usize,
    pub chips: i64,
    /// Still contesting the current hand (not folded)
    pub playing: bool,
}

impl Player {
    pub fn new(user_id: String, username: String, seat: usize, chips: i64) -> Self {
        Self {
            user_id,
            username,
            seat,
            chips,
            playing: false,
        }
    }

    pub fn fold(&mut self) {
        self.playing = false;
    }

    /// Zero chips: still seated, but never handed the turn.
    pub fn is_exhausted(&self) -> bool {
        self.chips <= 0
    }

    /// Eligible to receive the turn
    pub fn can_act(&self) -> bool {
        self.playing && !self.is_exhausted()
    }
}
