//! Who learns what about whom at the start of the game.
//!
//! - Every evil player except the loner sees the evil team minus the loner.
//! - The seer sees the evil team minus the shadow.
//! - The confidant sees the seer and the mimic, in a freshly randomized order
//!   on every resolution.
//! - The inspection token holder is public.
//!
//! No other knowledge crosses alignments.

use serde::{Deserialize, Serialize};

use super::role::{Role, RoleAssignment};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;

/// A single piece of knowledge handed to a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Insight {
    /// Fellow evils, as seen by an evil player.
    EvilAllies(Vec<PlayerId>),
    /// Evil players, as seen by the seer.
    EvilSighted(Vec<PlayerId>),
    /// The seer and the mimic, order randomized.
    SeerCandidates([PlayerId; 2]),
    /// The current inspection token holder.
    InspectionHolder(PlayerId),
}

/// Private knowledge per player plus knowledge shared with the whole roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    private: PlayerMap<Vec<Insight>>,
    public: Vec<Insight>,
}

impl KnowledgeMap {
    /// What a single player privately learns.
    #[must_use]
    pub fn private(&self, player: PlayerId) -> &[Insight] {
        &self.private[player]
    }

    /// What everybody learns.
    #[must_use]
    pub fn public(&self) -> &[Insight] {
        &self.public
    }
}

/// Resolve knowledge for a finished assignment.
///
/// `inspector` is the current token holder, if the rule is in play.
#[must_use]
pub fn resolve(
    roles: &RoleAssignment,
    inspector: Option<PlayerId>,
    roster_size: usize,
    rng: &mut GameRng,
) -> KnowledgeMap {
    let mut private: PlayerMap<Vec<Insight>> = PlayerMap::with_default(roster_size);

    let excluding = |hidden: Option<PlayerId>| -> Vec<PlayerId> {
        roles
            .evil()
            .iter()
            .copied()
            .filter(|&p| Some(p) != hidden)
            .collect()
    };

    let loner = roles.holder(Role::Loner);
    let allies = excluding(loner);
    for &evil in &allies {
        private[evil].push(Insight::EvilAllies(allies.clone()));
    }

    private[roles.seer()].push(Insight::EvilSighted(excluding(roles.holder(Role::Shadow))));

    if let (Some(confidant), Some(mimic)) = (roles.holder(Role::Confidant), roles.holder(Role::Mimic)) {
        let mut pair = [roles.seer(), mimic];
        if rng.gen_bool(0.5) {
            pair.swap(0, 1);
        }
        private[confidant].push(Insight::SeerCandidates(pair));
    }

    let public = inspector.map(Insight::InspectionHolder).into_iter().collect();

    KnowledgeMap { private, public }
}
