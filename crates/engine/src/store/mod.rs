mod memory;

use std::collections::HashMap;

use anyhow::Result;
use arena_core::domain::{ContestId, Participant, Question, QuestionId, Score, Submission, UserId};
use async_trait::async_trait;

pub use memory::MemoryContestStore;

/// Persistent source of truth for questions, submissions and participants.
#[async_trait]
pub trait ContestStore: Send + Sync {
    async fn find_question(&self, question_id: QuestionId) -> Result<Option<Question>>;

    async fn find_submission(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> Result<Option<Submission>>;

    /// Inserts or replaces the submission for its (contest, user) pair.
    async fn save_submission(&self, submission: &Submission) -> Result<()>;

    async fn find_participant(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> Result<Option<Participant>>;

    /// Inserts or replaces the participant record.
    async fn save_participant(&self, participant: &Participant) -> Result<()>;

    /// Mirrors the submission score onto the participant record. Returns
    /// `false` when no participant row exists.
    async fn update_participant_score(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        score: Score,
    ) -> Result<bool>;

    async fn list_participants(&self, contest_id: ContestId) -> Result<Vec<Participant>>;

    /// Display names for the given users. Unknown users are left out.
    async fn display_names(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, String>>;
}
