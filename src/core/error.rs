//! Error types for session operations.
//!
//! Every failure is a typed, recoverable result returned to the caller.
//! Nothing here is retried by the engine; the transport layer decides
//! whether to re-issue a command.

use std::fmt;

use thiserror::Error;

use crate::core::config::Rule;
use crate::session::PhaseKind;

/// Session error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    // === Capacity ===
    /// The roster already holds the maximum number of players.
    #[error("there are already {max} players in this game")]
    RosterFull { max: usize },

    /// Not enough players for the requested transition or rule.
    #[error("{what} requires at least {required} players (have {actual})")]
    InsufficientPlayers {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    // === Membership ===
    /// The player has already joined.
    #[error("{0} has already joined this game")]
    AlreadyJoined(String),

    /// The name does not belong to the rule vocabulary.
    #[error("there is no rule named '{0}'")]
    UnknownRule(String),

    /// Strict enable of a rule that is already on.
    #[error("{0} is already enabled")]
    AlreadyEnabled(Rule),

    /// The name is not on the roster.
    #[error("{0} is not playing in this game")]
    UnknownPlayer(String),

    /// The player has already voted on this nomination.
    #[error("{0} has already voted")]
    AlreadyVoted(String),

    /// A quest action from someone outside the party.
    #[error("{0} is not on the quest party")]
    NotInParty(String),

    // === Constraint ===
    /// Too many evil specials for the roster's evil count.
    #[error("{enabled} evil specials leave no evil player for the hunter (only {evil_count} evils)")]
    TooManyEvilSpecials { enabled: usize, evil_count: usize },

    /// Several configuration violations detected at once.
    #[error("{0}")]
    InvalidConfiguration(Violations),

    // === Phase ===
    /// The action is not allowed in the current phase.
    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: PhaseKind,
    },

    // === Shape ===
    /// The nominated party is malformed.
    #[error("invalid party: {0}")]
    InvalidParty(#[from] PartyError),

    // === Actions ===
    /// The hunter named someone who is not a Good-aligned player.
    #[error("{0} is not a valid assassination target")]
    InvalidTarget(String),

    /// The inspection token cannot be used right now.
    #[error("the inspection token cannot be used: {0}")]
    InspectionUnavailable(&'static str),

    /// The inspection target is the holder or a previous holder.
    #[error("{0} cannot be inspected")]
    InvalidInspectionTarget(String),
}

/// Reasons a nominated party is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("quest needs {expected} members, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    #[error("{0} is not playing in this game")]
    UnknownMember(String),

    #[error("{0} is listed more than once")]
    DuplicateMember(String),
}

/// Aggregated configuration violations.
///
/// Displays as the individual messages joined with `"; "`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<GameError>);

impl Violations {
    /// Collapse into a result: none is `Ok`, one is that error, more is
    /// `InvalidConfiguration`.
    pub fn into_result(mut self) -> Result<(), GameError> {
        match self.0.len() {
            0 => Ok(()),
            1 => Err(self.0.remove(0)),
            _ => Err(GameError::InvalidConfiguration(self)),
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Failure to encode or decode a session snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("snapshot decoding failed: {0}")]
    Decode(#[source] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violations_single_collapses() {
        let v = Violations(vec![GameError::RosterFull { max: 10 }]);
        assert_eq!(v.into_result(), Err(GameError::RosterFull { max: 10 }));
        assert_eq!(Violations::default().into_result(), Ok(()));
    }

    #[test]
    fn test_violations_join_messages() {
        let v = Violations(vec![
            GameError::InsufficientPlayers {
                what: "inspection",
                required: 7,
                actual: 5,
            },
            GameError::TooManyEvilSpecials {
                enabled: 2,
                evil_count: 2,
            },
        ]);

        let err = v.into_result().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, GameError::InvalidConfiguration(_)));
        assert!(msg.contains("inspection requires at least 7 players"));
        assert!(msg.contains("; "));
        assert!(msg.contains("only 2 evils"));
    }

    #[test]
    fn test_party_error_converts() {
        let err: GameError = PartyError::WrongSize { expected: 3, actual: 2 }.into();
        assert_eq!(err.to_string(), "invalid party: quest needs 3 members, got 2");
    }
}
