//! Random role assignment.
//!
//! Every selection without replacement draws a uniform permutation of the
//! candidates and consumes its prefix:
//!
//! 1. Permute the roster; the first `good_count` players are Good, the rest Evil.
//! 2. Permute the Good team; first is the seer, second the confidant (if `mimic`).
//! 3. Permute the Evil team; first is the hunter, then each enabled evil special
//!    in priority order (shadow, mimic, loner) takes the next player.
//! 4. Permute the roster once more; first is the leader, second the first
//!    token holder (if `inspection`).

use rustc_hash::FxHashMap;

use super::role::{Role, RoleAssignment};
use crate::core::config::{Configuration, Rule};
use crate::core::player::{PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::core::rng::GameRng;
use crate::rules::good_count;

/// Everything decided at game start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub roles: RoleAssignment,
    pub leader: PlayerId,
    /// First inspection token holder, when the rule is enabled.
    pub inspector: Option<PlayerId>,
}

/// Assign alignments, special roles, the first leader and the first token holder.
///
/// The configuration must already be validated for `roster_size`; a roster
/// outside 5-10 players is a programming error.
#[must_use]
pub fn assign(roster_size: usize, config: &Configuration, rng: &mut GameRng) -> Assignment {
    assert!(
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&roster_size),
        "cannot assign roles for {} players",
        roster_size
    );

    let goods = good_count(roster_size);
    let order: Vec<PlayerId> = rng
        .permutation(roster_size)
        .into_iter()
        .map(|i| PlayerId::new(i as u8))
        .collect();
    let (good, evil) = order.split_at(goods);

    let mut specials = FxHashMap::default();

    let good_order = rng.permutation(good.len());
    specials.insert(Role::Seer, good[good_order[0]]);
    if config.is_enabled(Rule::Mimic) {
        specials.insert(Role::Confidant, good[good_order[1]]);
    }

    assert!(
        config.evil_special_count() < evil.len(),
        "configuration leaves no evil player for the hunter"
    );
    let evil_order = rng.permutation(evil.len());
    specials.insert(Role::Hunter, evil[evil_order[0]]);
    let enabled_evil = Rule::EVIL_SPECIALS
        .into_iter()
        .filter(|&rule| config.is_enabled(rule))
        .filter_map(Role::for_evil_rule);
    for (role, &slot) in enabled_evil.zip(&evil_order[1..]) {
        specials.insert(role, evil[slot]);
    }

    let roles = RoleAssignment::new(roster_size, good.to_vec(), evil.to_vec(), specials);

    // Leader and first token holder are the first two of one permutation.
    let seats = rng.permutation(roster_size);
    let leader = PlayerId::new(seats[0] as u8);
    let inspector = config
        .is_enabled(Rule::Inspection)
        .then(|| PlayerId::new(seats[1] as u8));

    Assignment {
        roles,
        leader,
        inspector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Alignment;

    fn config_with(rules: &[Rule], roster_size: usize) -> Configuration {
        let mut config = Configuration::new();
        for &rule in rules {
            config.enable(rule, roster_size).unwrap();
        }
        config
    }

    #[test]
    fn test_five_players_no_rules() {
        let mut rng = GameRng::new(42);
        let a = assign(5, &Configuration::new(), &mut rng);

        assert_eq!(a.roles.good().len(), 3);
        assert_eq!(a.roles.evil().len(), 2);
        assert_eq!(a.roles.alignment(a.roles.seer()), Alignment::Good);
        assert_eq!(a.roles.alignment(a.roles.hunter()), Alignment::Evil);
        assert_eq!(a.roles.roles().count(), 2);
        assert_eq!(a.inspector, None);
        assert!(a.leader.index() < 5);
    }

    #[test]
    fn test_ten_players_all_rules() {
        let config = config_with(&Rule::ALL, 10);

        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let a = assign(10, &config, &mut rng);

            assert_eq!(a.roles.roles().count(), 6);
            let inspector = a.inspector.expect("inspection enabled");
            assert_ne!(inspector, a.leader);
        }
    }

    #[test]
    fn test_evil_specials_fill_in_priority_order() {
        // 10 players, 4 evils: hunter plus shadow and loner, mimic skipped.
        let config = config_with(&[Rule::Shadow, Rule::Loner], 10);
        let mut rng = GameRng::new(3);
        let a = assign(10, &config, &mut rng);

        assert!(a.roles.holder(Role::Shadow).is_some());
        assert!(a.roles.holder(Role::Loner).is_some());
        assert!(a.roles.holder(Role::Mimic).is_none());
        assert!(a.roles.holder(Role::Confidant).is_none());
    }

    #[test]
    fn test_assignment_varies_between_calls() {
        let config = Configuration::new();
        let mut rng = GameRng::new(11);

        let first = assign(7, &config, &mut rng);
        let differs = (0..20).any(|_| assign(7, &config, &mut rng) != first);
        assert!(differs);
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let config = config_with(&[Rule::Mimic], 6);
        let a = assign(6, &config, &mut GameRng::new(8));
        let b = assign(6, &config, &mut GameRng::new(8));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "cannot assign roles for 4 players")]
    fn test_rejects_small_roster() {
        let _ = assign(4, &Configuration::new(), &mut GameRng::new(1));
    }
}
