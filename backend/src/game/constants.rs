//! Table and session defaults
//!
//! Centralizing these values makes it easier to:
//! - Keep settings normalization and config defaults in agreement
//! - Adjust for testing

/// Default number of seats at a table when settings do not name one
pub const DEFAULT_MAX_SEATS: usize = 7;

/// Blind floors applied when a table is created with nonsensical values
pub const MIN_SMALL_BET: i64 = 1;
pub const MIN_BIG_BET: i64 = 2;

/// Timing constants (in milliseconds)
/// Turn clocks at or below this are replaced with the default.
pub const MIN_TURN_TIME_MS: u64 = 3_000;
pub const DEFAULT_TURN_TIME_MS: u64 = 60_000;

/// How often the binary sweeps the player index for stale mappings
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 30;

/// Broadcast channel capacity for per-session events
pub const BROADCAST_CHANNEL_CAPACITY: usize = 100;
