use serde::{Deserialize, Serialize};

use super::{Score, UserId};

/// One (member, score) pair read from the ranked store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMember {
    pub user_id: UserId,
    pub score: Score,
}

/// Display projection rebuilt on every poll, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub participant_id: UserId,
    pub identity: String,
    pub score: Score,
}
