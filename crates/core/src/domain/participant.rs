use serde::{Deserialize, Serialize};

use super::{ContestId, Score, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Participating,
    Disqualified,
}

/// Per-(user, contest) record. `score` mirrors the submission's score so
/// ranking never has to read the answer map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub contest_id: ContestId,
    pub user_id: UserId,
    pub status: ParticipantStatus,
    pub score: Score,
}

impl Participant {
    pub fn register(contest_id: ContestId, user_id: UserId) -> Self {
        Self {
            contest_id,
            user_id,
            status: ParticipantStatus::Registered,
            score: Score::ZERO,
        }
    }

    pub fn is_disqualified(&self) -> bool {
        self.status == ParticipantStatus::Disqualified
    }
}
