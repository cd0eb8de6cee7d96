//! Payloads handed back to the transport layer.
//!
//! Events are public announcements. Private information (role reveals and
//! inspection results) travels in dedicated structs so the caller cannot
//! broadcast it by accident.

use serde::{Deserialize, Serialize};

use super::phase::{PhaseKind, WinReason};
use super::record::QuestRecord;
use crate::core::config::Rule;
use crate::core::player::PlayerId;
use crate::roles::{Alignment, Insight, Role};
use crate::rules::VoteOutcome;

/// A public announcement produced by a session operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A player joined the lobby. `ready` once the lobby can be closed.
    PlayerJoined {
        player: PlayerId,
        roster_size: usize,
        ready: bool,
    },
    /// The lobby closed and configuration began.
    LobbyClosed { roster_size: usize },
    /// A leader must nominate a party.
    LeaderUp {
        quest: u8,
        leader: PlayerId,
        party_size: usize,
        vote_track: u8,
    },
    /// The leader proposed a party.
    PartyNominated { leader: PlayerId, party: Vec<PlayerId> },
    /// A vote was recorded; `remaining` voters still to go.
    VoteCast { voter: PlayerId, remaining: usize },
    /// Every vote is in. Votes are public once resolved.
    NominationResolved {
        outcome: VoteOutcome,
        votes: Vec<(PlayerId, bool)>,
        vote_track: u8,
    },
    /// A party member acted; the choice itself stays secret.
    QuestActionCast { member: PlayerId, remaining: usize },
    /// The quest finished.
    QuestResolved(QuestRecord),
    /// Good completed three quests; the hunter gets one guess.
    AssassinationBegins,
    /// The inspection token changed hands.
    InspectionUsed { holder: PlayerId, target: PlayerId },
    /// The game ended.
    GameOver {
        winner: Alignment,
        reason: WinReason,
        seer: PlayerId,
    },
}

/// Everything a single player privately learns at game start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleReveal {
    pub player: PlayerId,
    pub alignment: Alignment,
    pub role: Option<Role>,
    pub knowledge: Vec<Insight>,
}

/// Result of starting the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartReveal {
    /// One private reveal per player, in roster order.
    pub reveals: Vec<RoleReveal>,
    /// Knowledge announced to the whole roster.
    pub public: Vec<Insight>,
    /// Rules in play.
    pub rules: Vec<Rule>,
    /// The first leader's announcement.
    pub opening: Event,
}

impl StartReveal {
    /// The reveal for one player.
    #[must_use]
    pub fn for_player(&self, player: PlayerId) -> Option<&RoleReveal> {
        self.reveals.iter().find(|r| r.player == player)
    }
}

/// Result of using the inspection token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionReport {
    /// Private to the previous holder.
    pub alignment: Alignment,
    /// Public.
    pub event: Event,
}

/// Read-only snapshot of where the session stands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub phase: PhaseKind,
    pub description: String,
}
