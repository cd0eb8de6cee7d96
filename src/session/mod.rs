//! Game sessions: the phase machine, its events and quest history.
//!
//! A `GameSession` is the unit of play. Every operation is validated against
//! the current phase and either applies completely or returns an error with
//! the session unchanged.

pub mod phase;
pub mod event;
pub mod record;
pub mod game;

pub use phase::{Ballot, Party, Phase, PhaseKind, Round, WinReason};
pub use event::{Event, InspectionReport, RoleReveal, StartReveal, Status};
pub use record::QuestRecord;
pub use game::{GameSession, SessionBuilder};
