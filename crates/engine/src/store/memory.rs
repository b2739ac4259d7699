use std::collections::HashMap;

use anyhow::Result;
use arena_core::domain::{ContestId, Participant, Question, QuestionId, Score, Submission, UserId};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ContestStore;

type ParticipantKey = (ContestId, UserId);

/// In-process store used when no database is configured, and by tests.
#[derive(Debug, Default)]
pub struct MemoryContestStore {
    questions: RwLock<HashMap<QuestionId, Question>>,
    submissions: RwLock<HashMap<ParticipantKey, Submission>>,
    participants: RwLock<HashMap<ParticipantKey, Participant>>,
    users: RwLock<HashMap<UserId, String>>,
}

impl MemoryContestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_question(&self, question: Question) {
        self.questions.write().await.insert(question.id, question);
    }

    pub async fn insert_user(&self, user_id: UserId, display_name: impl Into<String>) {
        self.users.write().await.insert(user_id, display_name.into());
    }

    /// Registers `user_id` for `contest_id` and returns the new record.
    pub async fn register(&self, contest_id: ContestId, user_id: UserId) -> Participant {
        let participant = Participant::register(contest_id, user_id);
        self.participants
            .write()
            .await
            .insert((contest_id, user_id), participant.clone());
        participant
    }

    pub async fn remove_participant(&self, contest_id: ContestId, user_id: UserId) {
        self.participants
            .write()
            .await
            .remove(&(contest_id, user_id));
    }
}

#[async_trait]
impl ContestStore for MemoryContestStore {
    async fn find_question(&self, question_id: QuestionId) -> Result<Option<Question>> {
        Ok(self.questions.read().await.get(&question_id).cloned())
    }

    async fn find_submission(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> Result<Option<Submission>> {
        Ok(self
            .submissions
            .read()
            .await
            .get(&(contest_id, user_id))
            .cloned())
    }

    async fn save_submission(&self, submission: &Submission) -> Result<()> {
        self.submissions.write().await.insert(
            (submission.contest_id, submission.user_id),
            submission.clone(),
        );
        Ok(())
    }

    async fn find_participant(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> Result<Option<Participant>> {
        Ok(self
            .participants
            .read()
            .await
            .get(&(contest_id, user_id))
            .cloned())
    }

    async fn save_participant(&self, participant: &Participant) -> Result<()> {
        self.participants.write().await.insert(
            (participant.contest_id, participant.user_id),
            participant.clone(),
        );
        Ok(())
    }

    async fn update_participant_score(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        score: Score,
    ) -> Result<bool> {
        let mut participants = self.participants.write().await;
        match participants.get_mut(&(contest_id, user_id)) {
            Some(participant) => {
                participant.score = score;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_participants(&self, contest_id: ContestId) -> Result<Vec<Participant>> {
        let mut participants: Vec<Participant> = self
            .participants
            .read()
            .await
            .values()
            .filter(|participant| participant.contest_id == contest_id)
            .cloned()
            .collect();
        participants.sort_by_key(|participant| participant.user_id);
        Ok(participants)
    }

    async fn display_names(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, String>> {
        let users = self.users.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|user_id| users.get(user_id).map(|name| (*user_id, name.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn participant_score_mirror_reports_missing_rows() {
        let store = MemoryContestStore::new();
        let contest_id = ContestId::new();
        let user_id = UserId::new();
        let score = Score::new(30).unwrap();

        assert!(
            !store
                .update_participant_score(contest_id, user_id, score)
                .await
                .unwrap()
        );

        store.register(contest_id, user_id).await;
        assert!(
            store
                .update_participant_score(contest_id, user_id, score)
                .await
                .unwrap()
        );
        let participant = store
            .find_participant(contest_id, user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(participant.score, score);
    }

    #[tokio::test]
    async fn display_names_skip_unknown_users() {
        let store = MemoryContestStore::new();
        let (known, unknown) = (UserId::new(), UserId::new());
        store.insert_user(known, "ada").await;

        let names = store.display_names(&[known, unknown]).await.unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names[&known], "ada");
    }

    #[tokio::test]
    async fn submissions_are_keyed_by_contest_and_user() {
        let store = MemoryContestStore::new();
        let user_id = UserId::new();
        let (first, second) = (ContestId::new(), ContestId::new());

        store
            .save_submission(&Submission::start(first, user_id))
            .await
            .unwrap();

        assert!(store.find_submission(first, user_id).await.unwrap().is_some());
        assert!(store.find_submission(second, user_id).await.unwrap().is_none());
    }
}
