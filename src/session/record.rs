//! Completed quest records.

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;
use crate::rules::QuestOutcome;

/// One resolved quest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    /// Quest index, 1-5.
    pub quest: u8,
    /// Party size the quest required.
    pub party_size: usize,
    /// Leader whose nomination was approved.
    pub leader: PlayerId,
    /// Members who went on the quest.
    pub party: Vec<PlayerId>,
    /// Fail cards played.
    pub fails: usize,
    pub outcome: QuestOutcome,
}

impl QuestRecord {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome.succeeded()
    }
}
