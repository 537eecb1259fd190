use super::*;

impl SeatTable {
    /// Seat a player at their requested seat, or the next free one clockwise.
    ///
    /// Returns the assigned seat. Nothing is mutated when the player is rejected.
    pub fn add_player(&mut self, mut player: Player) -> GameResult<usize> {
        if self.seat_by_id.contains_key(&player.user_id) {
            return Err(GameError::PlayerAlreadySeated {
                user_id: player.user_id,
            });
        }

        let capacity = self.capacity();
        let requested = player.seat % capacity;
        let seat = (0..capacity)
            .map(|offset| (requested + offset) % capacity)
            .find(|&seat| self.seats[seat].is_none())
            .ok_or(GameError::TableFull { capacity })?;

        if seat != requested {
            tracing::debug!(
                "Seat {} taken, seating {} at {}",
                requested,
                player.user_id,
                seat
            );
        }

        player.seat = seat;
        self.seat_by_id.insert(player.user_id.clone(), seat);
        self.seats[seat] = Some(player);
        Ok(seat)
    }

    /// Vacate a player's seat. Returns the removed player, or `None` if they were not seated.
    ///
    /// Removing the player whose turn it is moves the turn on without touching
    /// the previous-turn pointer: the departed player never acted.
    pub fn remove_player(&mut self, user_id: &str) -> Option<Player> {
        let seat = self.seat_by_id.remove(user_id)?;
        let removed = self.seats[seat].take();

        if self.current_player_index == Some(seat) {
            self.advance_turn(false);
        }

        removed
    }

    /// Empty every seat and forget the turn pointers. Used when the table is disbanded.
    pub fn clear(&mut self) {
        self.seats.iter_mut().for_each(|seat| *seat = None);
        self.seat_by_id.clear();
        self.current_player_index = None;
        self.prev_player_index = None;
    }

    /// Called at the start of every hand.
    pub fn mark_all_players_as_playing(&mut self) {
        for player in self.seats.iter_mut().flatten() {
            player.playing = true;
        }
    }
}
