//! Quest tables and tallies.
//!
//! | Players | Evils | Q1 | Q2 | Q3 | Q4 | Q5 |
//! |---------|-------|----|----|----|----|----|
//! |       5 |     2 |  2 |  3 |  2 |  3 |  3 |
//! |       6 |     2 |  2 |  3 |  4 |  3 |  4 |
//! |       7 |     3 |  2 |  3 |  3 |  4 |  4 |
//! |       8 |     3 |  3 |  4 |  4 |  5 |  5 |
//! |       9 |     3 |  3 |  4 |  4 |  5 |  5 |
//! |      10 |     4 |  3 |  4 |  4 |  5 |  5 |
//!
//! With 7+ players, quest 4 needs two fails to fail.

use serde::{Deserialize, Serialize};

use crate::core::player::{MAX_PLAYERS, MIN_PLAYERS};

/// Number of quests in a game.
pub const QUEST_COUNT: u8 = 5;

/// Successes (or failures) needed to decide the quest stage.
pub const QUESTS_TO_WIN: usize = 3;

/// Consecutive rejected nominations that hand the game to Evil.
pub const VOTE_TRACK_LIMIT: u8 = 5;

const EVIL_COUNTS: [usize; MAX_PLAYERS - MIN_PLAYERS + 1] = [2, 2, 3, 3, 3, 4];

const PARTY_SIZES: [[usize; QUEST_COUNT as usize]; MAX_PLAYERS - MIN_PLAYERS + 1] = [
    [2, 3, 2, 3, 3],
    [2, 3, 4, 3, 4],
    [2, 3, 3, 4, 4],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
];

/// Number of evil players for a roster size, or 0 outside 5-10.
#[must_use]
pub fn evil_count(roster_size: usize) -> usize {
    roster_size
        .checked_sub(MIN_PLAYERS)
        .and_then(|i| EVIL_COUNTS.get(i))
        .copied()
        .unwrap_or(0)
}

/// Number of good players for a roster size.
#[must_use]
pub fn good_count(roster_size: usize) -> usize {
    roster_size - evil_count(roster_size)
}

/// Party size for a quest (1-based index).
///
/// Panics outside 5-10 players or quests 1-5; callers gate both.
#[must_use]
pub fn required_party_size(roster_size: usize, quest: u8) -> usize {
    assert!(
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&roster_size),
        "roster size {} outside 5-10",
        roster_size
    );
    assert!((1..=QUEST_COUNT).contains(&quest), "quest {} outside 1-5", quest);

    PARTY_SIZES[roster_size - MIN_PLAYERS][quest as usize - 1]
}

/// Fail cards needed to fail a quest.
#[must_use]
pub fn required_fails(roster_size: usize, quest: u8) -> usize {
    if quest == 4 && roster_size >= 7 {
        2
    } else {
        1
    }
}

/// Result of a nomination vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    Approved,
    Rejected,
}

/// Result of a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestOutcome {
    Succeeded,
    Failed,
}

impl QuestOutcome {
    #[must_use]
    pub fn succeeded(self) -> bool {
        self == QuestOutcome::Succeeded
    }
}

/// Tally a full roster's votes: strictly more approvals than half the roster
/// approves, ties reject.
#[must_use]
pub fn tally_votes(votes: &[bool]) -> VoteOutcome {
    let approvals = votes.iter().filter(|&&v| v).count();
    if approvals > votes.len() / 2 {
        VoteOutcome::Approved
    } else {
        VoteOutcome::Rejected
    }
}

/// Tally quest actions (`true` = success): fails at `required_fails` fail cards.
#[must_use]
pub fn tally_quest(actions: &[bool], required_fails: usize) -> QuestOutcome {
    let fails = actions.iter().filter(|&&succeed| !succeed).count();
    if fails >= required_fails {
        QuestOutcome::Failed
    } else {
        QuestOutcome::Succeeded
    }
}
