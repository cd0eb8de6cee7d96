//! End-to-end game session tests.
//!
//! These drive whole games through the public API: lobby, start, nomination
//! votes, quests, assassination and snapshots.

use hidden_quest::core::{GameError, PlayerId};
use hidden_quest::roles::{Alignment, Insight, Role};
use hidden_quest::rules::{required_party_size, QuestOutcome};
use hidden_quest::session::{Event, GameSession, PhaseKind, SessionBuilder, WinReason};

const NAMES: [&str; 10] = ["ann", "bob", "cat", "dan", "eve", "fay", "gus", "hal", "ivy", "jon"];

fn start(n: usize, rules: &[&str], seed: u64) -> GameSession {
    let mut session = SessionBuilder::new()
        .seed(seed)
        .players(NAMES[..n].iter().copied())
        .rules(rules.iter().copied())
        .build()
        .unwrap();
    session.request_config_close().unwrap();
    session.request_start().unwrap();
    session
}

fn name_of(session: &GameSession, player: PlayerId) -> String {
    session.roster().name(player).to_string()
}

/// Nominate a party of the required size with `evil_members` evil players in it.
fn nominate_with(session: &mut GameSession, evil_members: usize) -> Vec<String> {
    let roles = session.roles().unwrap().clone();
    let size = required_party_size(session.roster().len(), session.current_quest().unwrap());
    let goods = size - evil_members;

    let party: Vec<String> = roles.evil()[..evil_members]
        .iter()
        .chain(&roles.good()[..goods])
        .map(|&p| name_of(session, p))
        .collect();
    session.nominate(&party).unwrap();
    party
}

fn vote_all(session: &mut GameSession, approve: bool) -> Vec<Event> {
    let names = session.list_roster().to_vec();
    let mut events = Vec::new();
    for n in &names {
        events = session.cast_vote(n, approve).unwrap();
    }
    events
}

/// Run a quest where every evil member of the party fails it.
fn play_quest(session: &mut GameSession, evil_members: usize) -> Vec<Event> {
    let party = nominate_with(session, evil_members);
    vote_all(session, true);

    let roles = session.roles().unwrap().clone();
    let mut events = Vec::new();
    for n in &party {
        let player = session.roster().find(n).unwrap();
        let succeed = roles.alignment(player) == Alignment::Good;
        events = session.cast_quest_action(n, succeed).unwrap();
    }
    events
}

/// Good wins three quests, then the hunter misses.
#[test]
fn test_good_victory() {
    let mut session = start(5, &[], 101);
    for quest in 1..=3 {
        assert_eq!(session.current_quest(), Some(quest));
        play_quest(&mut session, 0);
    }
    assert_eq!(session.phase_kind(), PhaseKind::Assassination);

    let roles = session.roles().unwrap().clone();
    let decoy = roles.good().iter().copied().find(|&p| p != roles.seer()).unwrap();
    let event = session.cast_assassination(&name_of(&session, decoy)).unwrap();

    assert_eq!(
        event,
        Event::GameOver {
            winner: Alignment::Good,
            reason: WinReason::SeerSurvived,
            seer: roles.seer(),
        }
    );
    assert_eq!(session.phase_kind(), PhaseKind::End);
    assert_eq!(session.current_quest(), None);
}

/// Good wins three quests, but the hunter finds the seer.
#[test]
fn test_hunter_finds_seer() {
    let mut session = start(6, &["mimic"], 102);
    play_quest(&mut session, 0);
    play_quest(&mut session, 1);
    play_quest(&mut session, 0);
    play_quest(&mut session, 0);
    assert_eq!(session.successes(), 3);
    assert_eq!(session.failures(), 1);

    let seer = session.roles().unwrap().seer();
    session.cast_assassination(&name_of(&session, seer)).unwrap();
    assert_eq!(session.winner(), Some(Alignment::Evil));
}

/// Three failed quests end the game for Evil without an assassination.
#[test]
fn test_evil_sabotage_victory() {
    let mut session = start(7, &[], 103);
    for _ in 0..2 {
        play_quest(&mut session, 1);
    }
    play_quest(&mut session, 0);
    let events = play_quest(&mut session, 2);

    assert_eq!(session.failures(), 3);
    assert!(matches!(
        events.last(),
        Some(Event::GameOver {
            winner: Alignment::Evil,
            reason: WinReason::QuestsFailed,
            ..
        })
    ));
    assert!(matches!(
        session.cast_assassination("ann"),
        Err(GameError::WrongPhase { .. })
    ));
}

/// With seven or more players, one fail is not enough on quest four.
#[test]
fn test_quest_four_needs_two_fails() {
    let mut session = start(7, &[], 104);
    play_quest(&mut session, 0);
    play_quest(&mut session, 1);
    play_quest(&mut session, 0);
    assert_eq!(session.current_quest(), Some(4));

    play_quest(&mut session, 1);
    let record = session.history().last().unwrap().clone();
    assert_eq!(record.quest, 4);
    assert_eq!(record.fails, 1);
    assert_eq!(record.outcome, QuestOutcome::Succeeded);
    assert_eq!(session.phase_kind(), PhaseKind::Assassination);
}

/// Below seven players, a single fail still sinks quest four.
#[test]
fn test_quest_four_single_fail_small_roster() {
    let mut session = start(6, &[], 105);
    play_quest(&mut session, 0);
    play_quest(&mut session, 1);
    play_quest(&mut session, 1);
    play_quest(&mut session, 1);

    assert_eq!(session.history()[3].outcome, QuestOutcome::Failed);
    assert_eq!(session.winner(), Some(Alignment::Evil));
}

/// Five rejections in a row hand Evil the game, on any quest.
#[test]
fn test_vote_track_exhaustion_mid_game() {
    let mut session = start(8, &[], 106);
    play_quest(&mut session, 0);
    play_quest(&mut session, 0);
    assert_eq!(session.current_quest(), Some(3));

    for track in 1..=4u8 {
        nominate_with(&mut session, 0);
        vote_all(&mut session, false);
        assert_eq!(session.vote_track(), track);
        assert_eq!(session.current_quest(), Some(3));
    }
    nominate_with(&mut session, 0);
    let events = vote_all(&mut session, false);

    assert_eq!(session.winner(), Some(Alignment::Evil));
    assert!(matches!(
        events.last(),
        Some(Event::GameOver {
            reason: WinReason::VoteTrackExhausted,
            ..
        })
    ));
}

/// A tie is a rejection.
#[test]
fn test_tied_vote_rejects() {
    let mut session = start(6, &[], 107);
    nominate_with(&mut session, 0);

    let names = session.list_roster().to_vec();
    let mut events = Vec::new();
    for (i, n) in names.iter().enumerate() {
        events = session.cast_vote(n, i % 2 == 0).unwrap();
    }

    match &events[1] {
        Event::NominationResolved { votes, vote_track, .. } => {
            assert_eq!(votes.len(), 6);
            assert_eq!(*vote_track, 1);
        }
        other => panic!("expected nomination result, got {:?}", other),
    }
    assert_eq!(session.phase_kind(), PhaseKind::Nominate);
}

/// The leader moves on after each rejection and each quest, wrapping around.
#[test]
fn test_leader_rotation_wraps() {
    let mut session = start(5, &[], 108);
    let first = session.leader().unwrap();

    let mut expected = first;
    for _ in 0..3 {
        nominate_with(&mut session, 0);
        vote_all(&mut session, false);
        expected = expected.next(5);
        assert_eq!(session.leader(), Some(expected));
    }
    play_quest(&mut session, 0);
    play_quest(&mut session, 0);
    assert_eq!(session.leader(), Some(first));
}

/// Revealing is private and matches the role assignment.
#[test]
fn test_start_reveal_matches_roles() {
    let mut session = SessionBuilder::new()
        .seed(109)
        .players(NAMES)
        .rules(["inspection", "shadow", "mimic", "loner"])
        .build()
        .unwrap();
    session.request_config_close().unwrap();
    let reveal = session.request_start().unwrap();
    let roles = session.roles().unwrap();

    assert_eq!(reveal.reveals.len(), 10);
    assert_eq!(reveal.public, vec![Insight::InspectionHolder(session.inspector().unwrap())]);
    for r in &reveal.reveals {
        assert_eq!(r.alignment, roles.alignment(r.player));
        assert_eq!(r.role, roles.role_of(r.player));
    }

    let loner = roles.holder(Role::Loner).unwrap();
    assert!(reveal.for_player(loner).unwrap().knowledge.is_empty());
    let hunter = reveal.for_player(roles.hunter()).unwrap();
    assert_eq!(hunter.knowledge.len(), 1);
}

/// A restored snapshot behaves exactly like the original from then on.
#[test]
fn test_snapshot_replays_identically() {
    let mut original = start(7, &["inspection", "mimic"], 110);
    play_quest(&mut original, 1);
    nominate_with(&mut original, 0);
    vote_all(&mut original, false);

    let bytes = original.snapshot().unwrap();
    let mut restored = GameSession::restore(&bytes).unwrap();
    assert_eq!(restored.status(), original.status());

    let confidant = original.roles().unwrap().holder(Role::Confidant).unwrap();
    let confidant = name_of(&original, confidant);
    for _ in 0..5 {
        assert_eq!(
            restored.reveal_to(&confidant).unwrap(),
            original.reveal_to(&confidant).unwrap()
        );
    }

    let a = play_quest(&mut original, 1);
    let b = play_quest(&mut restored, 1);
    assert_eq!(a, b);
    assert_eq!(restored.history(), original.history());
    assert_eq!(restored.leader(), original.leader());
}

/// The whole roster is listed in join order, and queries never mutate.
#[test]
fn test_queries() {
    let mut session = GameSession::with_seed(111);
    assert_eq!(session.vote_track(), 0);
    assert_eq!(session.current_quest(), None);
    assert!(session.list_roster().is_empty());

    for n in &NAMES[..5] {
        session.add_player(n).unwrap();
    }
    assert_eq!(session.list_roster(), &NAMES[..5]);

    for n in &NAMES[5..] {
        session.add_player(n).unwrap();
    }
    assert_eq!(
        session.add_player("kim"),
        Err(GameError::RosterFull { max: 10 })
    );
    assert_eq!(session.status().phase, PhaseKind::WaitingForPlayers);
}
