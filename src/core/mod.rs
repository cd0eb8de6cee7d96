//! Core engine types: players, RNG, rule configuration and errors.
//!
//! Nothing in here knows about phases or roles beyond what validation needs.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{PlayerId, PlayerMap, Roster, MIN_PLAYERS, MAX_PLAYERS};
pub use rng::{GameRng, GameRngState};
pub use config::{is_rule_name, Configuration, Rule};
pub use error::{GameError, PartyError, SnapshotError, Violations};
