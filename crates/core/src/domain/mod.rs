mod error;
mod execution;
mod ids;
mod language;
mod leaderboard;
mod participant;
mod question;
mod run_result;
mod score;
mod submission;

pub use error::DomainError;
pub use execution::{
    ExecutionClient, ExecutionError, ExecutionRequest, ExecutionResponse, ExecutionStatus,
};
pub use ids::{ContestId, OptionId, QuestionId, SubmissionId, TestCaseId, UserId};
pub use language::Language;
pub use leaderboard::{LeaderboardEntry, RankedMember};
pub use participant::{Participant, ParticipantStatus};
pub use question::{McqOption, Question, QuestionBody, QuestionKind, TestCase, is_identifier};
pub use run_result::{CaseResult, RunResult};
pub use score::Score;
pub use submission::{AnswerEntry, AnswerValue, Submission, SubmissionStatus};
