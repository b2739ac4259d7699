//! Scoring Reconciler: the only writer of submission scores.
//!
//! Every mutation of a participant's submission happens under that
//! participant's lock, re-derives the score from the answer map and then
//! mirrors it onto the participant record and the leaderboard.

mod locks;

use std::sync::Arc;

use arena_core::domain::{
    AnswerValue, ContestId, ParticipantStatus, Question, QuestionId, QuestionKind, RunResult,
    Score, Submission, UserId,
};
use arena_core::scoring::{self, ScoreChange};
use tracing::{info, instrument, warn};

pub use locks::SubmissionLocks;

use crate::error::{EngineError, Result};
use crate::events::{EventBroadcaster, ScoreEvent};
use crate::grader::{Grader, TestScope};
use crate::leaderboard::LeaderboardStore;
use crate::store::ContestStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOutcome {
    pub question_id: QuestionId,
    pub score: Score,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub result: RunResult,
    pub change: ScoreChange,
    pub score: Score,
}

pub struct ScoringReconciler {
    store: Arc<dyn ContestStore>,
    leaderboard: Arc<dyn LeaderboardStore>,
    grader: Grader,
    events: Arc<EventBroadcaster>,
    locks: SubmissionLocks,
}

impl ScoringReconciler {
    pub fn new(
        store: Arc<dyn ContestStore>,
        leaderboard: Arc<dyn LeaderboardStore>,
        grader: Grader,
        events: Arc<EventBroadcaster>,
    ) -> Self {
        Self {
            store,
            leaderboard,
            grader,
            events,
            locks: SubmissionLocks::new(),
        }
    }

    /// Opens the participant's submission. Starting twice returns the
    /// existing submission unchanged.
    #[instrument(skip(self))]
    pub async fn start(&self, contest_id: ContestId, user_id: UserId) -> Result<Submission> {
        let _guard = self.locks.acquire(contest_id, user_id).await;

        let mut participant = self
            .store
            .find_participant(contest_id, user_id)
            .await?
            .ok_or_else(|| EngineError::not_found("participant", user_id))?;
        if participant.is_disqualified() {
            return Err(EngineError::validation("participant is disqualified"));
        }

        if let Some(existing) = self.store.find_submission(contest_id, user_id).await? {
            return Ok(existing);
        }

        let submission = Submission::start(contest_id, user_id);
        self.store.save_submission(&submission).await?;

        participant.status = ParticipantStatus::Participating;
        participant.score = submission.score;
        self.store.save_participant(&participant).await?;

        info!(submission_id = %submission.id, "participant started contest");
        self.publish(contest_id, user_id, submission.score).await;
        Ok(submission)
    }

    /// Records an answer. MCQ answers are graded inline; code answers keep
    /// whatever credit the last full grading established.
    #[instrument(skip(self, answer))]
    pub async fn save_progress(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        question_id: QuestionId,
        answer: AnswerValue,
    ) -> Result<ProgressOutcome> {
        let question = self.question(question_id).await?;
        let _guard = self.locks.acquire(contest_id, user_id).await;
        let mut submission = self.open_submission(contest_id, user_id).await?;

        let entry = match (answer, question.kind()) {
            (AnswerValue::Choice { option_id }, QuestionKind::Mcq) => {
                scoring::grade_choice(&question, option_id)
            }
            (
                AnswerValue::Code {
                    source,
                    language_id,
                },
                QuestionKind::Code,
            ) => scoring::save_code_draft(submission.answer(question_id), source, language_id),
            _ => {
                return Err(EngineError::validation(
                    "answer kind does not match question",
                ));
            }
        };

        let score = submission.upsert_answer(question_id, entry);
        self.store.save_submission(&submission).await?;
        self.publish(contest_id, user_id, score).await;

        Ok(ProgressOutcome { question_id, score })
    }

    /// Practice run against visible test cases. Never touches scores.
    #[instrument(skip(self, source))]
    pub async fn run_code(
        &self,
        question_id: QuestionId,
        source: &str,
        language_id: i32,
    ) -> Result<RunResult> {
        let question = self.question(question_id).await?;
        let graded = self
            .grader
            .grade(&question, source, language_id, TestScope::Visible)
            .await?;
        Ok(graded.run)
    }

    /// Grades against every test case and applies the award/retract rule.
    /// Sandbox failures return their diagnostic and leave the score alone.
    #[instrument(skip(self, source))]
    pub async fn submit_code(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        question_id: QuestionId,
        source: String,
        language_id: i32,
    ) -> Result<SubmitOutcome> {
        let question = self.question(question_id).await?;
        if question.kind() != QuestionKind::Code {
            return Err(EngineError::validation("question is not a coding question"));
        }
        self.open_submission(contest_id, user_id).await?;

        let graded = self
            .grader
            .grade(&question, &source, language_id, TestScope::All)
            .await?;

        let _guard = self.locks.acquire(contest_id, user_id).await;
        let mut submission = self.open_submission(contest_id, user_id).await?;

        if !graded.affects_score() {
            warn!(
                diagnostic = graded.run.compilation_error.as_deref().unwrap_or_default(),
                "grading did not complete, score unchanged"
            );
            return Ok(SubmitOutcome {
                result: graded.run,
                change: ScoreChange::Unchanged,
                score: submission.score,
            });
        }

        let all_passed = graded.run.is_all_passed();
        let previous = submission.answer(question_id);
        let change = scoring::code_submit_change(previous, all_passed, question.points);
        let awarded = match (change, previous) {
            (ScoreChange::Unchanged, Some(entry)) if all_passed => entry.points_awarded,
            _ => question.points,
        };

        let entry = scoring::graded_code(source, language_id, all_passed, awarded);
        let score = submission.upsert_answer(question_id, entry);
        self.store.save_submission(&submission).await?;

        info!(
            passed = graded.run.passed,
            total = graded.run.total,
            change = ?change,
            score = score.value(),
            "code submission graded"
        );
        self.publish(contest_id, user_id, score).await;

        Ok(SubmitOutcome {
            result: graded.run,
            change,
            score,
        })
    }

    /// Closes the submission. Finishing twice is a no-op.
    #[instrument(skip(self))]
    pub async fn finish(&self, contest_id: ContestId, user_id: UserId) -> Result<Submission> {
        let _guard = self.locks.acquire(contest_id, user_id).await;
        let mut submission = self
            .store
            .find_submission(contest_id, user_id)
            .await?
            .ok_or_else(|| EngineError::not_found("submission", user_id))?;
        if submission.is_completed() {
            return Ok(submission);
        }

        submission.complete();
        self.store.save_submission(&submission).await?;
        info!(score = submission.score.value(), "submission completed");
        self.publish(contest_id, user_id, submission.score).await;
        Ok(submission)
    }

    /// Repopulates the contest leaderboard from submission scores, repairing
    /// participant mirrors on the way. Returns the number of ranked members.
    #[instrument(skip(self))]
    pub async fn rebuild_leaderboard(&self, contest_id: ContestId) -> Result<usize> {
        let participants = self.store.list_participants(contest_id).await?;
        self.leaderboard.remove(contest_id).await?;

        let mut ranked = 0;
        for participant in participants {
            if participant.is_disqualified() {
                continue;
            }
            let user_id = participant.user_id;
            let _guard = self.locks.acquire(contest_id, user_id).await;

            let score = match self.store.find_submission(contest_id, user_id).await? {
                Some(submission) => submission.recompute_score(),
                None => participant.score,
            };
            if score != participant.score {
                warn!(%user_id, "participant score drifted from submission, repairing");
                self.store
                    .update_participant_score(contest_id, user_id, score)
                    .await?;
            }
            self.leaderboard.set_score(contest_id, user_id, score).await?;
            ranked += 1;
        }

        info!(ranked, "leaderboard rebuilt");
        self.events.emit(ScoreEvent::LeaderboardReset { contest_id });
        Ok(ranked)
    }

    /// Drops the contest's leaderboard. Submissions are left untouched.
    #[instrument(skip(self))]
    pub async fn remove_contest(&self, contest_id: ContestId) -> Result<()> {
        self.leaderboard.remove(contest_id).await?;
        self.locks.forget_contest(contest_id).await;
        info!("leaderboard removed");
        self.events.emit(ScoreEvent::LeaderboardReset { contest_id });
        Ok(())
    }

    async fn question(&self, question_id: QuestionId) -> Result<Question> {
        self.store
            .find_question(question_id)
            .await?
            .ok_or_else(|| EngineError::not_found("question", question_id))
    }

    async fn open_submission(&self, contest_id: ContestId, user_id: UserId) -> Result<Submission> {
        if let Some(participant) = self.store.find_participant(contest_id, user_id).await? {
            if participant.is_disqualified() {
                return Err(EngineError::validation("participant is disqualified"));
            }
        }

        let submission = self
            .store
            .find_submission(contest_id, user_id)
            .await?
            .ok_or_else(|| EngineError::not_found("submission", user_id))?;
        if submission.is_completed() {
            return Err(EngineError::validation("submission is already completed"));
        }
        Ok(submission)
    }

    /// Mirror and leaderboard failures are logged, never surfaced: the
    /// submission row is already authoritative.
    async fn publish(&self, contest_id: ContestId, user_id: UserId, score: Score) {
        match self
            .store
            .update_participant_score(contest_id, user_id, score)
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!(%contest_id, %user_id, "no participant record to mirror score onto"),
            Err(err) => {
                warn!(%contest_id, %user_id, error = %err, "failed to mirror participant score")
            }
        }

        if let Err(err) = self.leaderboard.set_score(contest_id, user_id, score).await {
            warn!(%contest_id, %user_id, error = %err, "leaderboard write failed");
        }

        self.events.emit(ScoreEvent::ScoreChanged {
            contest_id,
            user_id,
            score,
        });
    }
}
