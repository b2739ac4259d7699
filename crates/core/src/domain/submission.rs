use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContestId, OptionId, QuestionId, Score, SubmissionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerValue {
    #[serde(rename_all = "camelCase")]
    Choice { option_id: OptionId },
    #[serde(rename_all = "camelCase")]
    Code { source: String, language_id: i32 },
}

/// The unit of idempotency: presence plus `is_correct` decide whether a
/// question has already been credited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub value: AnswerValue,
    pub is_correct: bool,
    pub points_awarded: Score,
}

impl AnswerEntry {
    pub fn credited_points(&self) -> Score {
        if self.is_correct {
            self.points_awarded
        } else {
            Score::ZERO
        }
    }

    pub fn language_id(&self) -> Option<i32> {
        match self.value {
            AnswerValue::Code { language_id, .. } => Some(language_id),
            AnswerValue::Choice { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub contest_id: ContestId,
    pub user_id: UserId,
    pub status: SubmissionStatus,
    pub answers: BTreeMap<QuestionId, AnswerEntry>,
    pub score: Score,
}

impl Submission {
    pub fn start(contest_id: ContestId, user_id: UserId) -> Self {
        Self {
            id: SubmissionId::new(),
            contest_id,
            user_id,
            status: SubmissionStatus::Pending,
            answers: BTreeMap::new(),
            score: Score::ZERO,
        }
    }

    pub fn answer(&self, question_id: QuestionId) -> Option<&AnswerEntry> {
        self.answers.get(&question_id)
    }

    pub fn was_correct(&self, question_id: QuestionId) -> bool {
        self.answer(question_id).is_some_and(|entry| entry.is_correct)
    }

    pub fn is_completed(&self) -> bool {
        self.status == SubmissionStatus::Completed
    }

    /// Sum of awarded points over correct entries. The stored score must
    /// always equal this.
    pub fn recompute_score(&self) -> Score {
        self.answers.values().map(AnswerEntry::credited_points).sum()
    }

    /// Replaces the entry for `question_id` and re-derives the score from the
    /// whole answer map. Returns the new score.
    pub fn upsert_answer(&mut self, question_id: QuestionId, entry: AnswerEntry) -> Score {
        self.answers.insert(question_id, entry);
        self.score = self.recompute_score();
        self.score
    }

    pub fn complete(&mut self) {
        self.score = self.recompute_score();
        self.status = SubmissionStatus::Completed;
    }
}
