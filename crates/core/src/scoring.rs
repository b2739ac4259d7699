//! Pure scoring rules shared by the progress-save and code-submit paths.

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerEntry, AnswerValue, OptionId, Question, Score};

/// Effect of one code submission on the stored score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum ScoreChange {
    Award(Score),
    Retract(Score),
    Unchanged,
}

impl ScoreChange {
    pub fn apply(self, score: Score) -> Score {
        match self {
            ScoreChange::Award(points) => score.saturating_add(points),
            ScoreChange::Retract(points) => score.saturating_sub(points),
            ScoreChange::Unchanged => score,
        }
    }
}

/// Delta rule for a full grading call:
/// newly passing awards the question's points, newly failing retracts what
/// was previously awarded, anything else leaves the score alone.
pub fn code_submit_change(
    previous: Option<&AnswerEntry>,
    all_passed: bool,
    question_points: Score,
) -> ScoreChange {
    let was_correct = previous.is_some_and(|entry| entry.is_correct);
    match (all_passed, was_correct) {
        (true, false) => ScoreChange::Award(question_points),
        (false, true) => ScoreChange::Retract(previous.map_or(Score::ZERO, |e| e.points_awarded)),
        _ => ScoreChange::Unchanged,
    }
}

/// MCQ answers are graded inline by looking up the selected option.
pub fn grade_choice(question: &Question, option_id: OptionId) -> AnswerEntry {
    let is_correct = question
        .option(option_id)
        .is_some_and(|option| option.is_correct);

    AnswerEntry {
        value: AnswerValue::Choice { option_id },
        is_correct,
        points_awarded: if is_correct {
            question.points
        } else {
            Score::ZERO
        },
    }
}

/// A progress save of code keeps the credit established by the last grading
/// call and only replaces the stored source and language.
pub fn save_code_draft(
    previous: Option<&AnswerEntry>,
    source: String,
    language_id: i32,
) -> AnswerEntry {
    AnswerEntry {
        value: AnswerValue::Code {
            source,
            language_id,
        },
        is_correct: previous.is_some_and(|entry| entry.is_correct),
        points_awarded: previous.map_or(Score::ZERO, |entry| entry.points_awarded),
    }
}

/// Entry recorded after a full grading call.
pub fn graded_code(
    source: String,
    language_id: i32,
    all_passed: bool,
    question_points: Score,
) -> AnswerEntry {
    AnswerEntry {
        value: AnswerValue::Code {
            source,
            language_id,
        },
        is_correct: all_passed,
        points_awarded: if all_passed {
            question_points
        } else {
            Score::ZERO
        },
    }
}
