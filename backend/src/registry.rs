//! Registry of live tables, indexed by table id, creator and player.
//!
//! The three indices are independent concurrent maps; there is no lock across
//! them. "One table per creator" is kept exact by swapping the creator entry
//! atomically. "One table per player" is eventually consistent: a stale
//! player entry is repaired the next time it is read (`find_by_player`,
//! `leave_game`) or by a `reconcile` sweep.
//!
//! Map guards are never held across calls into another map or into a session.

use crate::{
    audit,
    config::Config,
    game::{GameResult, GameSession, GameSettings, Player, PlayerUpdateListener},
};
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

pub struct SessionRegistry {
    config: Config,
    next_id: AtomicU64,
    sessions: DashMap<u64, Arc<GameSession>>,
    by_creator: DashMap<String, Arc<GameSession>>,
    by_player: DashMap<String, Arc<GameSession>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SessionRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
            sessions: DashMap::new(),
            by_creator: DashMap::new(),
            by_player: DashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a new table. A creator owns at most one table, so any table they
    /// already own is stopped.
    pub fn create_game(
        &self,
        settings: GameSettings,
        listener: Arc<dyn PlayerUpdateListener>,
    ) -> Arc<GameSession> {
        let settings = settings.normalized(&self.config);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Arc::new(GameSession::new(id, settings, listener));

        self.sessions.insert(id, Arc::clone(&session));
        audit::log_session_event(id, session.creator_id(), "created");

        let displaced = self
            .by_creator
            .insert(session.creator_id().to_string(), Arc::clone(&session));
        if let Some(previous) = displaced.filter(|previous| previous.id() != id) {
            tracing::info!(
                "Creator {} opened table {}, closing their table {}",
                session.creator_id(),
                id,
                previous.id()
            );
            self.stop_game(previous.id());
        }

        session
    }

    pub fn find_by_id(&self, id: u64) -> Option<Arc<GameSession>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn find_by_creator(&self, creator_id: &str) -> Option<Arc<GameSession>> {
        self.by_creator
            .get(creator_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// The table a player sits at. A mapping that no longer matches the
    /// table's seats is evicted on the spot and reported as absent.
    pub fn find_by_player(&self, user_id: &str) -> Option<Arc<GameSession>> {
        let session = self
            .by_player
            .get(user_id)
            .map(|entry| Arc::clone(entry.value()))?;

        if self.is_registered(&session) && session.contains_player(user_id) {
            return Some(session);
        }

        tracing::warn!(
            "Player {} mapped to table {} but not seated there, evicting",
            user_id,
            session.id()
        );
        self.evict_stale_mapping(user_id, &session);
        None
    }

    /// Snapshot of all live tables, safe to iterate while the registry changes.
    pub fn find_all(&self) -> Vec<Arc<GameSession>> {
        self.sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn start_game(&self, id: u64) {
        if let Some(session) = self.find_by_id(id) {
            session.start();
        }
    }

    /// Stop and forget a table. Unknown ids are ignored.
    pub fn stop_game(&self, id: u64) {
        let Some((_, session)) = self.sessions.remove(&id) else {
            return;
        };

        // A newer table by the same creator keeps its entry.
        self.by_creator
            .remove_if(session.creator_id(), |_, owned| owned.id() == id);

        let seated = session.with_seats(|seats| seats.players());
        for player in &seated {
            self.by_player
                .remove_if(&player.user_id, |_, mapped| mapped.id() == id);
        }

        session.stop();
        tracing::info!("Table {} stopped ({} players unseated)", id, seated.len());
    }

    /// Seat a player at a table, then release any other table they sat at.
    ///
    /// Returns the assigned seat, or `None` when the table does not exist. A
    /// rejected join leaves the player where they were.
    pub fn join_game(&self, id: u64, player: Player) -> GameResult<Option<usize>> {
        let Some(session) = self.find_by_id(id) else {
            return Ok(None);
        };

        let user_id = player.user_id.clone();
        let seat = session.add_player(player)?;

        let elsewhere = self
            .by_player
            .get(&user_id)
            .map(|entry| entry.value().id())
            .filter(|&other| other != id);
        if let Some(other) = elsewhere {
            tracing::debug!("Player {} moves from table {} to {}", user_id, other, id);
            self.leave_game(other, &user_id);
        }

        self.by_player.insert(user_id, session);
        Ok(Some(seat))
    }

    /// Unseat a player. When the player index disagrees with `id`, the index
    /// wins. A table left with nobody seated is torn down.
    pub fn leave_game(&self, id: u64, user_id: &str) {
        let Some(mut session) = self.find_by_id(id) else {
            // The table is gone; only the mapping can be stale.
            self.by_player.remove_if(user_id, |_, mapped| {
                mapped.id() == id || !self.sessions.contains_key(&mapped.id())
            });
            return;
        };

        let indexed = self.by_player.remove(user_id).map(|(_, mapped)| mapped);
        if !session.contains_player(user_id) {
            if let Some(indexed) = indexed.filter(|mapped| mapped.id() != id) {
                audit::log_drift_repair(user_id, Some(indexed.id()), id);
                session = indexed;
            }
        }

        session.remove_player(user_id);

        if session.player_count() == 0 {
            self.stop_game(session.id());
        }
    }

    /// Sweep the player index and evict every mapping that no longer matches
    /// a live table's seats. Returns how many were evicted.
    pub fn reconcile(&self) -> usize {
        let entries: Vec<(String, Arc<GameSession>)> = self
            .by_player
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut evicted = 0;
        for (user_id, session) in entries {
            if self.is_registered(&session) && session.contains_player(&user_id) {
                continue;
            }
            let id = session.id();
            if self
                .by_player
                .remove_if(&user_id, |_, mapped| mapped.id() == id)
                .is_some()
            {
                audit::log_stale_mapping_evicted(&user_id, id);
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::info!("Reconciled player index, evicted {} stale entries", evicted);
        }
        evicted
    }

    /// Drop the player's mapping only while it still points at `stale`, then
    /// tear `stale` down if nobody is left there. Returns whether it was evicted.
    fn evict_stale_mapping(&self, user_id: &str, stale: &GameSession) -> bool {
        let stale_id = stale.id();
        if self
            .by_player
            .remove_if(user_id, |_, mapped| mapped.id() == stale_id)
            .is_none()
        {
            return false;
        }

        audit::log_stale_mapping_evicted(user_id, stale_id);
        if self.is_registered(stale) && stale.player_count() == 0 {
            self.stop_game(stale_id);
        }
        true
    }

    fn is_registered(&self, session: &GameSession) -> bool {
        self.sessions.contains_key(&session.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameError, NoopListener, SessionState};

    fn settings(creator: &str) -> GameSettings {
        GameSettings::new(creator, 5, 10, 30_000).with_max_players(6)
    }

    fn player(id: &str) -> Player {
        Player::new(id.to_string(), id.to_string(), 0, 1000)
    }

    fn create(registry: &SessionRegistry, creator: &str) -> Arc<GameSession> {
        registry.create_game(settings(creator), Arc::new(NoopListener))
    }

    #[test]
    fn test_create_game_normalizes_settings() {
        let registry = SessionRegistry::default();
        let session =
            registry.create_game(GameSettings::new("owner", 0, 1, 500), Arc::new(NoopListener));

        let settings = session.settings();
        assert_eq!(settings.small_bet, 1);
        assert_eq!(settings.big_bet, 2);
        assert_eq!(settings.turn_time_ms, 60_000);
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = SessionRegistry::default();
        let a = create(&registry, "a");
        let b = create(&registry, "b");
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_second_table_replaces_creators_first() {
        let registry = SessionRegistry::default();
        let first = create(&registry, "owner");
        let second = create(&registry, "owner");

        assert!(first.is_stopped());
        assert!(registry.find_by_id(first.id()).is_none());
        assert_eq!(registry.find_by_creator("owner").unwrap().id(), second.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stale_stop_keeps_newer_creator_entry() {
        let registry = SessionRegistry::default();
        let first = create(&registry, "owner");
        let second = create(&registry, "owner");

        registry.stop_game(first.id());
        assert_eq!(registry.find_by_creator("owner").unwrap().id(), second.id());
    }

    #[test]
    fn test_start_and_stop_unknown_ids_are_noops() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "owner");

        registry.start_game(999);
        registry.stop_game(999);
        registry.start_game(session.id());

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_join_unknown_table_is_noop() {
        let registry = SessionRegistry::default();
        assert_eq!(registry.join_game(42, player("p")).unwrap(), None);
        assert!(registry.find_by_player("p").is_none());
    }

    #[test]
    fn test_join_moves_player_between_tables() {
        let registry = SessionRegistry::default();
        let first = create(&registry, "a");
        let second = create(&registry, "b");
        registry.join_game(first.id(), player("stay")).unwrap();
        registry.join_game(first.id(), player("p")).unwrap();

        registry.join_game(second.id(), player("p")).unwrap();

        assert!(!first.contains_player("p"));
        assert!(second.contains_player("p"));
        assert_eq!(registry.find_by_player("p").unwrap().id(), second.id());
    }

    #[test]
    fn test_rejoining_same_table_is_rejected() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "a");
        registry.join_game(session.id(), player("p")).unwrap();

        let err = registry.join_game(session.id(), player("p")).unwrap_err();
        assert!(matches!(err, GameError::PlayerAlreadySeated { .. }));
        assert_eq!(registry.find_by_player("p").unwrap().id(), session.id());
    }

    #[test]
    fn test_find_by_player_heals_stale_mapping() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "a");
        registry.join_game(session.id(), player("stay")).unwrap();
        registry.join_game(session.id(), player("p")).unwrap();

        // the engine unseats a broke player behind the registry's back
        session.remove_player("p");

        assert!(registry.find_by_player("p").is_none());
        assert!(!registry.by_player.contains_key("p"));
        assert!(registry.find_by_id(session.id()).is_some());
    }

    #[test]
    fn test_find_by_player_tears_down_emptied_table() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "a");
        registry.join_game(session.id(), player("p")).unwrap();
        session.remove_player("p");

        assert!(registry.find_by_player("p").is_none());
        assert!(registry.find_by_id(session.id()).is_none());
    }

    #[test]
    fn test_eviction_keeps_mapping_repointed_elsewhere() {
        let registry = SessionRegistry::default();
        let stale = create(&registry, "a");
        let fresh = create(&registry, "b");
        registry.join_game(stale.id(), player("stay")).unwrap();
        registry.join_game(fresh.id(), player("p")).unwrap();

        // a reader still holds the old table while the mapping moved on
        assert!(!registry.evict_stale_mapping("p", &stale));
        assert!(fresh.contains_player("p"));
        assert_eq!(registry.find_by_player("p").unwrap().id(), fresh.id());
    }

    #[test]
    fn test_rejected_join_keeps_player_at_current_table() {
        let registry = SessionRegistry::default();
        let home = registry.create_game(
            GameSettings::new("home", 5, 10, 30_000).with_max_players(4),
            Arc::new(NoopListener),
        );
        let full = registry.create_game(
            GameSettings::new("full", 5, 10, 30_000).with_max_players(1),
            Arc::new(NoopListener),
        );
        registry.join_game(home.id(), player("p")).unwrap();
        registry.join_game(full.id(), player("q")).unwrap();

        let err = registry.join_game(full.id(), player("p")).unwrap_err();
        assert_eq!(err, GameError::TableFull { capacity: 1 });
        assert!(registry.find_by_id(home.id()).is_some());
        assert!(home.contains_player("p"));
        assert_eq!(registry.find_by_player("p").unwrap().id(), home.id());

        registry.stop_game(full.id());
        assert_eq!(registry.join_game(full.id(), player("p")), Ok(None));
        assert!(home.contains_player("p"));
    }

    #[test]
    fn test_leave_trusts_player_index_over_requested_id() {
        let registry = SessionRegistry::default();
        let first = create(&registry, "a");
        let second = create(&registry, "b");
        registry.join_game(first.id(), player("x")).unwrap();
        registry.join_game(second.id(), player("y")).unwrap();
        registry.join_game(second.id(), player("p")).unwrap();

        registry.leave_game(first.id(), "p");

        assert!(!second.contains_player("p"));
        assert!(registry.find_by_player("p").is_none());
        assert!(first.contains_player("x"));
    }

    #[test]
    fn test_leaving_last_seat_tears_down_table() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "owner");
        registry.join_game(session.id(), player("p")).unwrap();

        registry.leave_game(session.id(), "p");

        assert!(registry.find_by_id(session.id()).is_none());
        assert!(registry.find_by_creator("owner").is_none());
        assert!(session.is_stopped());
    }

    #[test]
    fn test_leave_unknown_table_clears_only_stale_mapping() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "owner");
        registry.join_game(session.id(), player("p")).unwrap();

        registry.leave_game(999, "p");
        assert_eq!(registry.find_by_player("p").unwrap().id(), session.id());

        let gone = create(&registry, "other");
        registry.stop_game(gone.id());
        registry.by_player.insert("ghost".to_string(), gone);
        registry.leave_game(999, "ghost");
        assert!(!registry.by_player.contains_key("ghost"));
    }

    #[test]
    fn test_stop_unmaps_seated_players() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "owner");
        registry.join_game(session.id(), player("p")).unwrap();

        registry.stop_game(session.id());
        assert!(!registry.by_player.contains_key("p"));
        assert!(registry.find_by_player("p").is_none());
    }

    #[test]
    fn test_reconcile_evicts_drifted_entries() {
        let registry = SessionRegistry::default();
        let session = create(&registry, "owner");
        registry.join_game(session.id(), player("keep")).unwrap();
        registry.join_game(session.id(), player("drift")).unwrap();
        session.remove_player("drift");

        assert_eq!(registry.reconcile(), 1);
        assert_eq!(registry.reconcile(), 0);
        assert!(registry.by_player.contains_key("keep"));
        assert!(registry.find_by_id(session.id()).is_some());
    }

    #[test]
    fn test_find_all_is_a_snapshot() {
        let registry = SessionRegistry::default();
        create(&registry, "a");
        create(&registry, "b");

        let snapshot = registry.find_all();
        for session in &snapshot {
            registry.stop_game(session.id());
        }
        assert_eq!(snapshot.len(), 2);
        assert!(registry.is_empty());
    }
}
