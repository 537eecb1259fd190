use super::*;

/// Outcome of moving the turn pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// The turn now belongs to the player at this seat.
    Eligible(usize),
    /// Nobody seated is playing with chips behind. The pointer stopped where the scan gave up.
    NoEligiblePlayer,
}

impl TurnAdvance {
    pub fn seat(self) -> Option<usize> {
        match self {
            TurnAdvance::Eligible(seat) => Some(seat),
            TurnAdvance::NoEligiblePlayer => None,
        }
    }
}

impl SeatTable {
    /// First occupant at or clockwise from `index`.
    pub fn get_available_player(&self, index: isize) -> GameResult<Option<&Player>> {
        let start = self.start_seat(index)?;
        Ok(self.first_occupied_from(start))
    }

    /// First occupant at or clockwise from `index` who is still playing the hand.
    pub fn get_available_playing_player(&self, index: isize) -> GameResult<Option<&Player>> {
        let capacity = self.capacity();
        let mut cursor = self.start_seat(index)?;

        // Each round lands on a distinct occupant, so `capacity` rounds cover the table.
        for _ in 0..capacity {
            let Some(player) = self.first_occupied_from(cursor) else {
                return Ok(None);
            };
            if player.playing {
                return Ok(Some(player));
            }
            cursor = (player.seat + 1) % capacity;
        }

        Ok(None)
    }

    /// Same policy as `get_available_playing_player`, counter-clockwise.
    pub fn get_available_playing_player_reversed(
        &self,
        index: isize,
    ) -> GameResult<Option<&Player>> {
        let capacity = self.capacity();
        let start = self.start_seat(index)?;

        Ok((0..capacity)
            .map(|step| (start + capacity - step) % capacity)
            .find_map(|seat| self.seats[seat].as_ref().filter(|p| p.playing)))
    }

    /// Hand the turn to `index`, or the next occupied seat clockwise from it.
    ///
    /// The old current index becomes the previous one. If the table is empty the
    /// pointer stops on the previous index, or after one full lap.
    pub fn set_current_player_index(&mut self, index: usize) {
        self.prev_player_index = self.current_player_index;

        let capacity = self.capacity();
        let start = index % capacity;
        for offset in 0..capacity {
            let seat = (start + offset) % capacity;
            self.current_player_index = Some(seat);
            if self.seats[seat].is_some() || Some(seat) == self.prev_player_index {
                break;
            }
        }
    }

    /// Move the turn clockwise to the next player who is playing and has chips.
    pub fn next_player(&mut self) -> TurnAdvance {
        self.advance_turn(true)
    }

    pub(super) fn advance_turn(&mut self, record_previous: bool) -> TurnAdvance {
        if record_previous {
            self.prev_player_index = self.current_player_index;
        }

        let capacity = self.capacity();
        for _ in 0..capacity {
            let seat = self
                .current_player_index
                .map_or(0, |current| (current + 1) % capacity);
            self.current_player_index = Some(seat);

            if self.is_turn_eligible(seat) {
                tracing::debug!("Turn moves to seat {}", seat);
                return TurnAdvance::Eligible(seat);
            }
            if Some(seat) == self.prev_player_index {
                break;
            }
        }

        tracing::debug!(
            "No eligible player for the turn, pointer rests at {:?}",
            self.current_player_index
        );
        TurnAdvance::NoEligiblePlayer
    }

    fn is_turn_eligible(&self, seat: usize) -> bool {
        self.seats[seat].as_ref().is_some_and(Player::can_act)
    }

    fn first_occupied_from(&self, start: usize) -> Option<&Player> {
        let capacity = self.capacity();
        (0..capacity).find_map(|offset| self.seats[(start + offset) % capacity].as_ref())
    }
}
