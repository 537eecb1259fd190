//! One live table: its settings, its seats and its lifecycle.
//!
//! The seat engine is not thread-safe on its own, so every seat or turn
//! mutation goes through the session mutex. Different sessions never share
//! mutable state and can be driven fully in parallel.

use super::{
    constants::BROADCAST_CHANNEL_CAPACITY,
    error::{GameError, GameResult},
    player::Player,
    seats::SeatTable,
    settings::GameSettings,
};
use crate::audit;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tokio::sync::broadcast;

/// Notified whenever a player's chip stack changes, so it can be persisted.
pub trait PlayerUpdateListener: Send + Sync {
    fn on_player_updated(&self, session_id: u64, player: &Player);
}

/// Listener for tables nobody needs to persist (tests, demos).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl PlayerUpdateListener for NoopListener {
    fn on_player_updated(&self, _session_id: u64, _player: &Player) {}
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Running,
    Stopped, // Terminal, seats cleared
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Stopped,
    PlayerJoined { user_id: String, seat: usize },
    PlayerLeft { user_id: String },
    PlayerUpdated { user_id: String, chips: i64 },
}

struct SessionInner {
    state: SessionState,
    seats: SeatTable,
}

pub struct GameSession {
    id: u64,
    settings: GameSettings,
    created_at: DateTime<Utc>,
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<SessionEvent>,
    listener: Arc<dyn PlayerUpdateListener>,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("creator_id", &self.settings.creator_id)
            .field("state", &self.state())
            .field("players", &self.player_count())
            .finish()
    }
}

impl GameSession {
    /// `settings` are expected to be normalized already.
    pub fn new(id: u64, settings: GameSettings, listener: Arc<dyn PlayerUpdateListener>) -> Self {
        let (events, _rx) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);
        let seats = SeatTable::new(settings.max_players);
        Self {
            id,
            settings,
            created_at: Utc::now(),
            inner: Mutex::new(SessionInner {
                state: SessionState::Created,
                seats,
            }),
            events,
            listener,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn creator_id(&self) -> &str {
        &self.settings.creator_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == SessionState::Stopped
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn start(&self) {
        let mut inner = self.inner.lock();
        let state = inner.state;
        match state {
            SessionState::Created => {
                inner.state = SessionState::Running;
                drop(inner);
                audit::log_session_event(self.id, self.creator_id(), "started");
                let _ = self.events.send(SessionEvent::Started);
            }
            SessionState::Running => {}
            SessionState::Stopped => {
                tracing::warn!("Ignoring start of stopped table {}", self.id);
            }
        }
    }

    /// Halt the table and disband its seats. Stopping twice is a no-op.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Stopped {
            return;
        }
        inner.state = SessionState::Stopped;
        inner.seats.clear();
        drop(inner);

        audit::log_session_event(self.id, self.creator_id(), "stopped");
        let _ = self.events.send(SessionEvent::Stopped);
    }

    pub fn add_player(&self, player: Player) -> GameResult<usize> {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Stopped {
            return Err(GameError::SessionStopped { session_id: self.id });
        }
        let user_id = player.user_id.clone();
        let seat = inner.seats.add_player(player)?;
        drop(inner);

        audit::log_seat_change(self.id, &user_id, "joined", Some(seat));
        let _ = self.events.send(SessionEvent::PlayerJoined { user_id, seat });
        Ok(seat)
    }

    pub fn remove_player(&self, user_id: &str) -> Option<Player> {
        let removed = self.inner.lock().seats.remove_player(user_id)?;

        audit::log_seat_change(self.id, user_id, "left", Some(removed.seat));
        let _ = self.events.send(SessionEvent::PlayerLeft {
            user_id: user_id.to_string(),
        });
        Some(removed)
    }

    pub fn contains_player(&self, user_id: &str) -> bool {
        self.inner.lock().seats.contains_player(user_id)
    }

    pub fn player_count(&self) -> usize {
        self.inner.lock().seats.size()
    }

    /// Run `f` with exclusive access to the seats. This is how the game engine drives turns.
    pub fn with_seats<R>(&self, f: impl FnOnce(&mut SeatTable) -> R) -> R {
        f(&mut self.inner.lock().seats)
    }

    /// Apply a chip delta (clamped at zero) and forward the player to the listener.
    ///
    /// Returns the new stack, or `None` if the player is not seated here.
    pub fn update_chips(&self, user_id: &str, delta: i64) -> Option<i64> {
        let player = {
            let mut inner = self.inner.lock();
            let player = inner.seats.player_by_id_mut(user_id)?;
            player.chips = player.chips.saturating_add(delta).max(0);
            player.clone()
        };

        audit::log_chip_change(self.id, user_id, delta, player.chips);
        self.listener.on_player_updated(self.id, &player);
        let _ = self.events.send(SessionEvent::PlayerUpdated {
            user_id: player.user_id.clone(),
            chips: player.chips,
        });
        Some(player.chips)
    }
}
