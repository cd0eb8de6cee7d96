//! Quest resolution rules.
//!
//! Pure functions over roster size and quest index:
//! - Party size and evil count tables
//! - Fail threshold (the quest-4 two-fail rule)
//! - Nomination vote and quest action tallies
//!
//! The session calls into these but owns all state.

pub mod quest;

pub use quest::{
    evil_count, good_count, required_fails, required_party_size, tally_quest, tally_votes,
    QuestOutcome, VoteOutcome, QUESTS_TO_WIN, QUEST_COUNT, VOTE_TRACK_LIMIT,
};
