//! Role assignment and visibility properties across every roster size.
//!
//! Assignments are checked for partitioning, alignment of special roles and
//! the knowledge each player is handed.

use proptest::prelude::*;

use hidden_quest::core::{Configuration, GameRng, PlayerId, Rule};
use hidden_quest::roles::{assign, resolve, Alignment, Insight, Role};
use hidden_quest::rules::evil_count;

/// Strategy: a roster size within 5-10.
fn roster_strategy() -> impl Strategy<Value = usize> {
    5..=10usize
}

/// Strategy: a subset of the optional rules, as names.
fn rules_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(vec!["inspection", "shadow", "mimic", "loner"], 0..=4)
}

fn configured(roster_size: usize, names: &[&str]) -> Configuration {
    let mut config = Configuration::new();
    config.enable_many(names, roster_size);
    config
}

proptest! {
    // Good and evil partition the roster with the tabled evil count.
    #[test]
    fn assignment_partitions_roster(
        n in roster_strategy(),
        names in rules_strategy(),
        seed in any::<u64>(),
    ) {
        let config = configured(n, &names);
        prop_assert!(config.validate(n).is_ok());

        let a = assign(n, &config, &mut GameRng::new(seed));
        let roles = &a.roles;
        prop_assert_eq!(roles.evil().len(), evil_count(n));
        prop_assert_eq!(roles.good().len() + roles.evil().len(), n);

        let mut all: Vec<PlayerId> = roles.good().iter().chain(roles.evil()).copied().collect();
        all.sort();
        prop_assert_eq!(all, PlayerId::all(n).collect::<Vec<_>>());
    }

    // Every special role sits on the right alignment, one role per player.
    #[test]
    fn special_roles_well_placed(
        n in roster_strategy(),
        names in rules_strategy(),
        seed in any::<u64>(),
    ) {
        let config = configured(n, &names);
        let a = assign(n, &config, &mut GameRng::new(seed));
        let roles = &a.roles;

        prop_assert_eq!(roles.alignment(roles.seer()), Alignment::Good);
        prop_assert_eq!(roles.alignment(roles.hunter()), Alignment::Evil);

        let mut holders = Vec::new();
        for (role, player) in roles.roles() {
            prop_assert_eq!(roles.alignment(player), role.alignment(), "{} misplaced", role);
            holders.push(player);
        }
        let count = holders.len();
        holders.sort();
        holders.dedup();
        prop_assert_eq!(holders.len(), count);

        for role in [Role::Shadow, Role::Mimic, Role::Loner] {
            let expected = role.rule().map_or(false, |r| config.is_enabled(r));
            prop_assert_eq!(roles.holder(role).is_some(), expected);
        }
        prop_assert_eq!(roles.holder(Role::Confidant).is_some(), config.is_enabled(Rule::Mimic));
    }

    // The first token holder is never the first leader.
    #[test]
    fn inspector_differs_from_leader(n in 7..=10usize, seed in any::<u64>()) {
        let config = configured(n, &["inspection"]);
        let a = assign(n, &config, &mut GameRng::new(seed));

        let inspector = a.inspector.unwrap();
        prop_assert_ne!(inspector, a.leader);
        prop_assert!(inspector.index() < n);
    }

    // Knowledge never leaks beyond what each role is entitled to.
    #[test]
    fn knowledge_is_bounded(
        n in roster_strategy(),
        names in rules_strategy(),
        seed in any::<u64>(),
    ) {
        let config = configured(n, &names);
        let mut rng = GameRng::new(seed);
        let a = assign(n, &config, &mut rng);
        let k = resolve(&a.roles, a.inspector, n, &mut rng);
        let roles = &a.roles;

        for player in PlayerId::all(n) {
            for insight in k.private(player) {
                match insight {
                    Insight::EvilAllies(allies) => {
                        prop_assert_eq!(roles.alignment(player), Alignment::Evil);
                        prop_assert!(allies.iter().all(|&p| roles.alignment(p) == Alignment::Evil));
                        prop_assert!(!allies.iter().any(|&p| Some(p) == roles.holder(Role::Loner)));
                    }
                    Insight::EvilSighted(seen) => {
                        prop_assert_eq!(player, roles.seer());
                        prop_assert!(seen.iter().all(|&p| roles.alignment(p) == Alignment::Evil));
                        prop_assert!(!seen.iter().any(|&p| Some(p) == roles.holder(Role::Shadow)));
                    }
                    Insight::SeerCandidates(pair) => {
                        prop_assert_eq!(Some(player), roles.holder(Role::Confidant));
                        prop_assert!(pair.contains(&roles.seer()));
                    }
                    Insight::InspectionHolder(_) => prop_assert!(false, "inspection holder is public"),
                }
            }
        }

        if let Some(loner) = roles.holder(Role::Loner) {
            prop_assert!(k.private(loner).is_empty());
        }
    }
}

/// Five players, no rules: two evil, three good, only seer and hunter.
#[test]
fn test_scenario_five_players_plain() {
    let mut rng = GameRng::new(2024);
    let a = assign(5, &Configuration::new(), &mut rng);

    assert_eq!(a.roles.evil().len(), 2);
    assert_eq!(a.roles.good().len(), 3);
    assert_eq!(a.roles.alignment(a.roles.seer()), Alignment::Good);
    assert_eq!(a.roles.alignment(a.roles.hunter()), Alignment::Evil);

    let specials: Vec<Role> = a.roles.roles().map(|(role, _)| role).collect();
    assert_eq!(specials, vec![Role::Seer, Role::Hunter]);
    assert_eq!(a.inspector, None);
}

/// Ten players with every rule: all six roles on distinct players.
#[test]
fn test_scenario_ten_players_all_rules() {
    let mut config = Configuration::new();
    let enabled = config.enable_many(&["inspection", "shadow", "mimic", "loner"], 10);
    assert_eq!(enabled.len(), 4);
    config.validate(10).unwrap();

    for seed in 0..50 {
        let a = assign(10, &config, &mut GameRng::new(seed));
        let holders: Vec<PlayerId> = a.roles.roles().map(|(_, p)| p).collect();
        assert_eq!(holders.len(), 6);

        let mut distinct = holders.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 6);

        assert_ne!(a.inspector, Some(a.leader));
        assert!(a.inspector.is_some());
    }
}

/// The confidant's pair order varies between resolutions.
#[test]
fn test_confidant_pair_order_varies() {
    let mut config = Configuration::new();
    config.enable(Rule::Mimic, 5).unwrap();
    let mut rng = GameRng::new(77);
    let a = assign(5, &config, &mut rng);
    let confidant = a.roles.holder(Role::Confidant).unwrap();

    let mut seer_first = 0;
    for _ in 0..200 {
        let k = resolve(&a.roles, a.inspector, 5, &mut rng);
        match k.private(confidant) {
            [Insight::SeerCandidates(pair)] => {
                if pair[0] == a.roles.seer() {
                    seer_first += 1;
                }
            }
            other => panic!("unexpected confidant knowledge {:?}", other),
        }
    }
    assert!(seer_first > 50 && seer_first < 150, "seer first {} of 200", seer_first);
}

/// Every player is seer at roughly the same rate.
#[test]
fn test_seer_distribution_roughly_uniform() {
    let mut rng = GameRng::new(5);
    let mut counts = [0usize; 5];
    for _ in 0..5000 {
        let a = assign(5, &Configuration::new(), &mut rng);
        counts[a.roles.seer().index()] += 1;
    }
    for count in counts {
        assert!((800..1200).contains(&count), "seer counts {:?}", counts);
    }
}

/// Same seed, same assignment.
#[test]
fn test_assignment_reproducible() {
    let config = configured(8, &["shadow", "mimic", "inspection"]);
    let a = assign(8, &config, &mut GameRng::new(99));
    let b = assign(8, &config, &mut GameRng::new(99));
    assert_eq!(a, b);
}

/// A roster outside 5-10 is a programming error.
#[test]
#[should_panic(expected = "cannot assign roles for 4 players")]
fn test_assign_rejects_small_roster() {
    let _ = assign(4, &Configuration::new(), &mut GameRng::new(1));
}
