use crate::game::constants::{
    DEFAULT_MAX_SEATS, DEFAULT_RECONCILE_INTERVAL_SECS, DEFAULT_TURN_TIME_MS, MIN_TURN_TIME_MS,
};
use std::{env, str::FromStr};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub default_seats: usize,
    pub default_turn_time_ms: u64,
    pub reconcile_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_seats: DEFAULT_MAX_SEATS,
            default_turn_time_ms: DEFAULT_TURN_TIME_MS,
            reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            default_seats: parse_var("POKER_DEFAULT_SEATS", defaults.default_seats).max(1),
            default_turn_time_ms: turn_time_or_default(parse_var(
                "POKER_DEFAULT_TURN_MS",
                defaults.default_turn_time_ms,
            )),
            reconcile_interval_secs: parse_var(
                "POKER_RECONCILE_INTERVAL_SECS",
                defaults.reconcile_interval_secs,
            )
            .max(1),
        }
    }
}

/// The configured turn clock replaces short ones, so it must clear the floor itself.
fn turn_time_or_default(turn_time_ms: u64) -> u64 {
    if turn_time_ms <= MIN_TURN_TIME_MS {
        tracing::warn!(
            "POKER_DEFAULT_TURN_MS must exceed {}ms, got {}; using {}",
            MIN_TURN_TIME_MS,
            turn_time_ms,
            DEFAULT_TURN_TIME_MS
        );
        return DEFAULT_TURN_TIME_MS;
    }
    turn_time_ms
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{} must be a number, got {:?}; using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
