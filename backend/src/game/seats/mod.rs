mod player_mgmt;
mod turns;

pub use turns::TurnAdvance;

use super::{
    error::{GameError, GameResult},
    player::Player,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed-capacity seating around one table, plus the turn pointers.
///
/// Seat indices are circular: every scan wraps from `capacity - 1` back to `0`
/// and visits each seat at most once, so no lookup can spin on a table with
/// no qualifying occupant.
///
/// Not internally synchronized. The owning session serializes all mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SeatSnapshot", into = "SeatSnapshot")]
pub struct SeatTable {
    seats: Vec<Option<Player>>,
    seat_by_id: HashMap<String, usize>,
    current_player_index: Option<usize>,
    prev_player_index: Option<usize>,
}

/// Wire shape of a `SeatTable`. The id index is derived, so only the seat array travels.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeatSnapshot {
    seats: Vec<Option<Player>>,
    current_player_index: Option<usize>,
    prev_player_index: Option<usize>,
}

impl From<SeatTable> for SeatSnapshot {
    fn from(table: SeatTable) -> Self {
        Self {
            seats: table.seats,
            current_player_index: table.current_player_index,
            prev_player_index: table.prev_player_index,
        }
    }
}

impl From<SeatSnapshot> for SeatTable {
    fn from(snapshot: SeatSnapshot) -> Self {
        let mut table = SeatTable::new(snapshot.seats.len());

        for (seat, occupant) in snapshot.seats.into_iter().enumerate() {
            let Some(mut player) = occupant else {
                continue;
            };
            if table.seat_by_id.contains_key(&player.user_id) {
                tracing::warn!(
                    "Dropping duplicate occupant {} at seat {} while restoring table",
                    player.user_id,
                    seat
                );
                continue;
            }
            player.seat = seat;
            table.seat_by_id.insert(player.user_id.clone(), seat);
            table.seats[seat] = Some(player);
        }

        let capacity = table.capacity();
        table.current_player_index = snapshot.current_player_index.filter(|&i| i < capacity);
        table.prev_player_index = snapshot.prev_player_index.filter(|&i| i < capacity);
        table
    }
}

impl SeatTable {
    /// Create an empty table. A capacity of zero is raised to one seat.
    pub fn new(capacity: usize) -> Self {
        Self {
            seats: vec![None; capacity.max(1)],
            seat_by_id: HashMap::new(),
            current_player_index: None,
            prev_player_index: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    /// Number of occupied seats
    pub fn size(&self) -> usize {
        self.seat_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seat_by_id.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    /// Occupant of `index mod capacity`, if any.
    pub fn get_player(&self, index: isize) -> GameResult<Option<&Player>> {
        let seat = self.start_seat(index)?;
        Ok(self.seats[seat].as_ref())
    }

    pub fn index_of_player(&self, user_id: &str) -> Option<usize> {
        self.seat_by_id.get(user_id).copied()
    }

    pub fn player_by_id(&self, user_id: &str) -> Option<&Player> {
        let seat = self.index_of_player(user_id)?;
        self.seats[seat].as_ref()
    }

    /// Mutable access for chip and playing-flag changes. The seat must not be rewritten through this.
    pub fn player_by_id_mut(&mut self, user_id: &str) -> Option<&mut Player> {
        let seat = self.index_of_player(user_id)?;
        self.seats[seat].as_mut()
    }

    pub fn contains_player(&self, user_id: &str) -> bool {
        self.seat_by_id.contains_key(user_id)
    }

    /// Seated players in seat order
    pub fn players(&self) -> Vec<Player> {
        self.occupants().cloned().collect()
    }

    /// Seated players still contesting the hand, for pot settlement at showdown.
    pub fn involved_players(&self) -> Vec<&Player> {
        self.occupants().filter(|p| p.playing).collect()
    }

    pub fn current_player_index(&self) -> Option<usize> {
        self.current_player_index
    }

    pub fn prev_player_index(&self) -> Option<usize> {
        self.prev_player_index
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_index
            .and_then(|seat| self.seats[seat].as_ref())
    }

    /// The player who acted last, used to highlight their move.
    pub fn previous_player(&self) -> Option<&Player> {
        self.prev_player_index
            .and_then(|seat| self.seats[seat].as_ref())
    }

    fn occupants(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter().flatten()
    }

    /// Reject negative indices, fold everything else onto the circle.
    fn start_seat(&self, index: isize) -> GameResult<usize> {
        if index < 0 {
            return Err(GameError::NegativeSeatIndex { index });
        }
        Ok(index as usize % self.capacity())
    }
}
