//! # hidden-quest
//!
//! Rules engine for a hidden-role social deduction game in the style of
//! Avalon: a good team tries to complete quests while a secret evil team
//! sabotages them.
//!
//! ## Design Principles
//!
//! 1. **Transport-Agnostic**: Players are named strings. The engine returns
//!    events and private reveals; delivering them is the caller's job.
//!
//! 2. **Phase-Checked**: Every operation is validated against the session
//!    phase. Illegal calls return an error and change nothing.
//!
//! 3. **Reproducible**: All randomness flows through a seeded `GameRng`, so
//!    a seed replays a game exactly. Sessions snapshot with `bincode`.
//!
//! ## Modules
//!
//! - `core`: Players, roster, RNG, optional-rule configuration, errors
//! - `roles`: Alignments, special roles, assignment and visibility
//! - `rules`: Party sizes, fail thresholds, vote and quest tallies
//! - `session`: The game phase machine and its events

pub mod core;
pub mod roles;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Configuration, GameError, GameRng, PartyError, PlayerId, PlayerMap, Roster, Rule,
    SnapshotError, MAX_PLAYERS, MIN_PLAYERS,
};

pub use crate::roles::{Alignment, Insight, Role, RoleAssignment};

pub use crate::rules::{QuestOutcome, VoteOutcome};

pub use crate::session::{
    Event, GameSession, InspectionReport, PhaseKind, QuestRecord, RoleReveal, SessionBuilder,
    StartReveal, Status, WinReason,
};
