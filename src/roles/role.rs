//! Alignments, special roles, and the immutable role assignment.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::Rule;
use crate::core::player::PlayerId;
use crate::rules::evil_count;

/// One of the two hidden teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Good,
    Evil,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Good => f.write_str("Good"),
            Alignment::Evil => f.write_str("Evil"),
        }
    }
}

/// A special role held by exactly one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Mandatory. Sees the evil team, except the shadow.
    Seer,
    /// Sees the seer and the mimic without knowing which is which.
    Confidant,
    /// Mandatory. Names the seer once the good team wins three quests.
    Hunter,
    /// Hidden from the seer.
    Shadow,
    /// Appears to the confidant as a possible seer.
    Mimic,
    /// Neither knows nor is known by the other evils.
    Loner,
}

impl Role {
    /// Every role, good first.
    pub const ALL: [Role; 6] = [
        Role::Seer,
        Role::Confidant,
        Role::Hunter,
        Role::Shadow,
        Role::Mimic,
        Role::Loner,
    ];

    /// The alignment a holder of this role must have.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Role::Seer | Role::Confidant => Alignment::Good,
            Role::Hunter | Role::Shadow | Role::Mimic | Role::Loner => Alignment::Evil,
        }
    }

    /// The rule that puts this role into play; `None` for mandatory roles.
    #[must_use]
    pub const fn rule(self) -> Option<Rule> {
        match self {
            Role::Seer | Role::Hunter => None,
            Role::Confidant | Role::Mimic => Some(Rule::Mimic),
            Role::Shadow => Some(Rule::Shadow),
            Role::Loner => Some(Rule::Loner),
        }
    }

    /// The evil role a given evil-special rule adds.
    #[must_use]
    pub const fn for_evil_rule(rule: Rule) -> Option<Role> {
        match rule {
            Rule::Shadow => Some(Role::Shadow),
            Rule::Mimic => Some(Role::Mimic),
            Rule::Loner => Some(Role::Loner),
            Rule::Inspection => None,
        }
    }

    /// One-line summary of what the role knows and does.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Role::Seer => "You see the evil team, except the shadow. Keep yourself hidden from the hunter.",
            Role::Confidant => "You see the seer and the mimic, but not which is which.",
            Role::Hunter => "If the good team completes three quests, you get one chance to name the seer.",
            Role::Shadow => "You remain unknown to the seer.",
            Role::Mimic => "You appear as the seer to the confidant.",
            Role::Loner => "You are unknown to the other evils and you do not know them.",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Seer => "Seer",
            Role::Confidant => "Confidant",
            Role::Hunter => "Hunter",
            Role::Shadow => "Shadow",
            Role::Mimic => "Mimic",
            Role::Loner => "Loner",
        };
        f.write_str(name)
    }
}

/// Who is on which team and who holds which special role.
///
/// Created once when the game starts and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    good: Vec<PlayerId>,
    evil: Vec<PlayerId>,
    specials: FxHashMap<Role, PlayerId>,
}

impl RoleAssignment {
    /// Build an assignment, aborting if it breaks any assignment invariant.
    #[must_use]
    pub fn new(
        roster_size: usize,
        good: Vec<PlayerId>,
        evil: Vec<PlayerId>,
        specials: FxHashMap<Role, PlayerId>,
    ) -> Self {
        let assignment = Self { good, evil, specials };
        assignment.assert_invariants(roster_size);
        assignment
    }

    /// Good-aligned players.
    #[must_use]
    pub fn good(&self) -> &[PlayerId] {
        &self.good
    }

    /// Evil-aligned players.
    #[must_use]
    pub fn evil(&self) -> &[PlayerId] {
        &self.evil
    }

    /// A player's alignment.
    ///
    /// Panics if the player is not part of the assignment.
    #[must_use]
    pub fn alignment(&self, player: PlayerId) -> Alignment {
        if self.good.contains(&player) {
            Alignment::Good
        } else if self.evil.contains(&player) {
            Alignment::Evil
        } else {
            panic!("{} has no alignment", player)
        }
    }

    /// The holder of a role, if the role is in play.
    #[must_use]
    pub fn holder(&self, role: Role) -> Option<PlayerId> {
        self.specials.get(&role).copied()
    }

    /// A player's special role, if any.
    #[must_use]
    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        self.specials
            .iter()
            .find(|(_, &p)| p == player)
            .map(|(&role, _)| role)
    }

    /// Roles in play, in `Role::ALL` order.
    pub fn roles(&self) -> impl Iterator<Item = (Role, PlayerId)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.holder(role).map(|p| (role, p)))
    }

    /// The seer. Always assigned.
    #[must_use]
    pub fn seer(&self) -> PlayerId {
        self.specials[&Role::Seer]
    }

    /// The hunter. Always assigned.
    #[must_use]
    pub fn hunter(&self) -> PlayerId {
        self.specials[&Role::Hunter]
    }

    /// Panic on any broken assignment invariant.
    ///
    /// A failure here is an engine defect, never a user error.
    pub fn assert_invariants(&self, roster_size: usize) {
        assert_eq!(
            self.good.len() + self.evil.len(),
            roster_size,
            "alignment partition does not cover the roster"
        );
        assert_eq!(self.evil.len(), evil_count(roster_size), "wrong evil count");

        let mut seen = vec![false; roster_size];
        for &p in self.good.iter().chain(&self.evil) {
            assert!(p.index() < roster_size, "{} is not on the roster", p);
            assert!(!seen[p.index()], "{} is assigned twice", p);
            seen[p.index()] = true;
        }

        assert!(self.specials.contains_key(&Role::Seer), "no seer assigned");
        assert!(self.specials.contains_key(&Role::Hunter), "no hunter assigned");

        let mut holders: Vec<_> = self.specials.values().copied().collect();
        holders.sort_unstable();
        holders.dedup();
        assert_eq!(holders.len(), self.specials.len(), "a player holds two special roles");

        for (&role, &p) in &self.specials {
            let side = match role.alignment() {
                Alignment::Good => &self.good,
                Alignment::Evil => &self.evil,
            };
            assert!(side.contains(&p), "{} held by wrong alignment", role);
        }
    }
}
