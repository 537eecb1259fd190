//! Structured audit logging for table lifecycle and seating events.
//!
//! Everything goes through the `audit` tracing target with structured fields,
//! so it can be filtered and shipped separately from debug output.

/// Log a table lifecycle event (created, started, stopped)
pub fn log_session_event(session_id: u64, creator_id: &str, event: &str) {
    tracing::info!(
        target: "audit",
        event = "session",
        session_id = session_id,
        creator_id = creator_id,
        session_event = event,
        "Table {}: {} (creator {})",
        session_id,
        event,
        creator_id
    );
}

/// Log a player taking or leaving a seat
pub fn log_seat_change(session_id: u64, user_id: &str, action: &str, seat: Option<usize>) {
    tracing::info!(
        target: "audit",
        event = "seat_change",
        session_id = session_id,
        user_id = user_id,
        action = action,
        seat = seat.map(|s| s as i64).unwrap_or(-1),
        "Seat change: {} {} at table {}",
        user_id,
        action,
        session_id
    );
}

/// Log a chip stack change forwarded for persistence
pub fn log_chip_change(session_id: u64, user_id: &str, delta: i64, new_chips: i64) {
    tracing::info!(
        target: "audit",
        event = "chip_change",
        session_id = session_id,
        user_id = user_id,
        delta = delta,
        new_chips = new_chips,
        "Chip change: {} for {} at table {}",
        delta,
        user_id,
        session_id
    );
}

/// Log a repaired player→table mapping
pub fn log_drift_repair(user_id: &str, indexed_session: Option<u64>, requested_session: u64) {
    tracing::warn!(
        target: "audit",
        event = "drift_repair",
        user_id = user_id,
        indexed_session = indexed_session.map(|s| s as i64).unwrap_or(-1),
        requested_session = requested_session,
        "Player index for {} disagreed with table {}, reconciled",
        user_id,
        requested_session
    );
}

/// Log a player→table mapping dropped because the table no longer seats them
pub fn log_stale_mapping_evicted(user_id: &str, session_id: u64) {
    tracing::warn!(
        target: "audit",
        event = "stale_mapping_evicted",
        user_id = user_id,
        session_id = session_id,
        "Player index for {} pointed at table {} without a seat there, evicted",
        user_id,
        session_id
    );
}
