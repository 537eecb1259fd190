//! Poker Table Library
//!
//! Seat and turn rotation for individual tables, and the registry that tracks
//! which tables are live and who owns or sits at them.

pub mod audit;
pub mod config;
pub mod game;
pub mod registry;

pub use registry::SessionRegistry;
