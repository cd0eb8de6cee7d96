//! Session phases.
//!
//! `Phase` is a tagged state: each variant carries only the data that is
//! meaningful in that state. The current round (quest index, leader, vote
//! track) exists only while nominating, voting or questing.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::player::{PlayerId, PlayerMap};
use crate::roles::Alignment;

/// Party membership. Parties never exceed five players.
pub type Party = SmallVec<[PlayerId; 5]>;

/// State shared by the nominate, vote and quest phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Quest index, 1-5.
    pub quest: u8,
    /// Player currently proposing parties.
    pub leader: PlayerId,
    /// Consecutive rejected nominations this quest.
    pub vote_track: u8,
}

impl Round {
    /// First round of a quest.
    #[must_use]
    pub fn start(quest: u8, leader: PlayerId) -> Self {
        Self {
            quest,
            leader,
            vote_track: 0,
        }
    }
}

/// A proposed party and the choices cast on it so far.
///
/// During voting every roster member fills their slot; during the quest only
/// party members do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub party: Party,
    choices: PlayerMap<Option<bool>>,
}

impl Ballot {
    /// An empty ballot for a roster of `roster_size`.
    #[must_use]
    pub fn new(party: Party, roster_size: usize) -> Self {
        Self {
            party,
            choices: PlayerMap::with_default(roster_size),
        }
    }

    /// Record a choice. Returns false if the player already chose.
    pub fn cast(&mut self, player: PlayerId, choice: bool) -> bool {
        let slot = &mut self.choices[player];
        if slot.is_some() {
            return false;
        }
        *slot = Some(choice);
        true
    }

    /// Whether the player has already chosen.
    #[must_use]
    pub fn has_cast(&self, player: PlayerId) -> bool {
        self.choices[player].is_some()
    }

    /// Number of choices cast.
    #[must_use]
    pub fn cast_count(&self) -> usize {
        self.choices.iter().filter(|(_, c)| c.is_some()).count()
    }

    /// Cast choices in roster order.
    pub fn choices(&self) -> impl Iterator<Item = (PlayerId, bool)> + '_ {
        self.choices.iter().filter_map(|(p, c)| c.map(|c| (p, c)))
    }
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// Three quests failed.
    QuestsFailed,
    /// Five nominations in a row were rejected.
    VoteTrackExhausted,
    /// The hunter named the seer.
    SeerFound,
    /// The hunter named someone other than the seer.
    SeerSurvived,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WinReason::QuestsFailed => "three quests failed",
            WinReason::VoteTrackExhausted => "five nominations in a row were rejected",
            WinReason::SeerFound => "the hunter found the seer",
            WinReason::SeerSurvived => "the hunter missed the seer",
        };
        f.write_str(text)
    }
}

/// Full session phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    WaitingForPlayers,
    Configuration,
    Nominate(Round),
    Vote { round: Round, ballot: Ballot },
    Quest { round: Round, ballot: Ballot },
    Assassination,
    End { winner: Alignment, reason: WinReason },
}

impl Phase {
    /// The phase without its data.
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::WaitingForPlayers => PhaseKind::WaitingForPlayers,
            Phase::Configuration => PhaseKind::Configuration,
            Phase::Nominate(_) => PhaseKind::Nominate,
            Phase::Vote { .. } => PhaseKind::Vote,
            Phase::Quest { .. } => PhaseKind::Quest,
            Phase::Assassination => PhaseKind::Assassination,
            Phase::End { .. } => PhaseKind::End,
        }
    }

    /// The current round, if a quest is underway.
    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        match self {
            Phase::Nominate(round) | Phase::Vote { round, .. } | Phase::Quest { round, .. } => {
                Some(round)
            }
            _ => None,
        }
    }

    /// The proposed or approved party, if any.
    #[must_use]
    pub fn party(&self) -> Option<&Party> {
        match self {
            Phase::Vote { ballot, .. } | Phase::Quest { ballot, .. } => Some(&ballot.party),
            _ => None,
        }
    }
}

/// Phase discriminant, used in errors and status reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    WaitingForPlayers,
    Configuration,
    Nominate,
    Vote,
    Quest,
    Assassination,
    End,
}

impl PhaseKind {
    /// Human-readable status line.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            PhaseKind::WaitingForPlayers => "Waiting for players to join.",
            PhaseKind::Configuration => "Waiting for the game to be configured.",
            PhaseKind::Nominate => "Waiting for the quest leader to nominate a party.",
            PhaseKind::Vote => "Waiting for players to vote on the nominated party.",
            PhaseKind::Quest => "The party is going on a quest.",
            PhaseKind::Assassination => "The hunter is trying to find the seer.",
            PhaseKind::End => "The game is over.",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PhaseKind::WaitingForPlayers => "waiting for players",
            PhaseKind::Configuration => "configuring the game",
            PhaseKind::Nominate => "a party is being nominated",
            PhaseKind::Vote => "a party is being voted on",
            PhaseKind::Quest => "a quest is underway",
            PhaseKind::Assassination => "the hunter is choosing a target",
            PhaseKind::End => "the game is over",
        };
        f.write_str(text)
    }
}
