use std::collections::HashMap;
use std::str::FromStr;

use crate::entity::{participant, question, submission, user};
use anyhow::{Result, anyhow};
use arena_core::domain::{
    AnswerEntry, ContestId, Participant, ParticipantStatus, Question, QuestionBody, QuestionId,
    Score, Submission, SubmissionId, SubmissionStatus, UserId,
};
use arena_engine::ContestStore;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

#[derive(Clone)]
pub struct SeaOrmContestStore {
    db: DatabaseConnection,
}

impl SeaOrmContestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert_user(&self, user_id: UserId, display_name: &str) -> Result<()> {
        let active_model = user::ActiveModel {
            id: Set(user_id.to_string()),
            display_name: Set(display_name.to_string()),
            created_at: Set(now()),
        };
        user::Entity::insert(active_model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn insert_question(&self, question: &Question) -> Result<()> {
        let active_model = question::ActiveModel {
            id: Set(question.id.to_string()),
            points: Set(score_column(question.points)?),
            body: Set(serde_json::to_string(&question.body)?),
            created_at: Set(now()),
            updated_at: Set(now()),
        };
        question::Entity::insert(active_model).exec(&self.db).await?;
        Ok(())
    }

    fn map_question(model: question::Model) -> Result<Question> {
        let id = parse_id::<QuestionId>("question.id", &model.id)?;
        let body: QuestionBody = serde_json::from_str(&model.body)
            .map_err(|e| anyhow!("invalid question.body for '{}': {e}", model.id))?;

        Ok(Question {
            id,
            points: score_from_column("question.points", model.points)?,
            body,
        })
    }

    fn map_submission(model: submission::Model) -> Result<Submission> {
        let answers: std::collections::BTreeMap<QuestionId, AnswerEntry> =
            serde_json::from_str(&model.answers)
                .map_err(|e| anyhow!("invalid submission.answers for '{}': {e}", model.id))?;

        Ok(Submission {
            id: parse_id::<SubmissionId>("submission.id", &model.id)?,
            contest_id: parse_id("submission.contest_id", &model.contest_id)?,
            user_id: parse_id("submission.user_id", &model.user_id)?,
            status: Self::map_submission_status(model.status)?,
            answers,
            score: score_from_column("submission.score", model.score)?,
        })
    }

    fn map_participant(model: participant::Model) -> Result<Participant> {
        Ok(Participant {
            contest_id: parse_id("participant.contest_id", &model.contest_id)?,
            user_id: parse_id("participant.user_id", &model.user_id)?,
            status: Self::map_participant_status(model.status)?,
            score: score_from_column("participant.score", model.score)?,
        })
    }

    fn map_submission_status(code: i16) -> Result<SubmissionStatus> {
        match code {
            0 => Ok(SubmissionStatus::Pending),
            1 => Ok(SubmissionStatus::Completed),
            _ => Err(anyhow!("invalid submission.status code from database: {code}")),
        }
    }

    fn map_submission_status_code(status: SubmissionStatus) -> i16 {
        match status {
            SubmissionStatus::Pending => 0,
            SubmissionStatus::Completed => 1,
        }
    }

    fn map_participant_status(code: i16) -> Result<ParticipantStatus> {
        match code {
            0 => Ok(ParticipantStatus::Registered),
            1 => Ok(ParticipantStatus::Participating),
            2 => Ok(ParticipantStatus::Disqualified),
            _ => Err(anyhow!("invalid participant.status code from database: {code}")),
        }
    }

    fn map_participant_status_code(status: ParticipantStatus) -> i16 {
        match status {
            ParticipantStatus::Registered => 0,
            ParticipantStatus::Participating => 1,
            ParticipantStatus::Disqualified => 2,
        }
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn parse_id<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|e| anyhow!("invalid {column} '{value}' from database: {e}"))
}

fn score_column(score: Score) -> Result<i32> {
    i32::try_from(score.value()).map_err(|_| anyhow!("score {} does not fit a column", score.value()))
}

fn score_from_column(column: &str, value: i32) -> Result<Score> {
    Score::try_from(i64::from(value)).map_err(|e| anyhow!("invalid {column} from database: {e}"))
}

#[async_trait]
impl ContestStore for SeaOrmContestStore {
    async fn find_question(&self, question_id: QuestionId) -> Result<Option<Question>> {
        let model = question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_question).transpose()
    }

    async fn find_submission(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> Result<Option<Submission>> {
        let model = submission::Entity::find()
            .filter(submission::Column::ContestId.eq(contest_id.to_string()))
            .filter(submission::Column::UserId.eq(user_id.to_string()))
            .one(&self.db)
            .await?;

        model.map(Self::map_submission).transpose()
    }

    async fn save_submission(&self, record: &Submission) -> Result<()> {
        let timestamp = now();
        let active_model = submission::ActiveModel {
            id: Set(record.id.to_string()),
            contest_id: Set(record.contest_id.to_string()),
            user_id: Set(record.user_id.to_string()),
            status: Set(Self::map_submission_status_code(record.status)),
            score: Set(score_column(record.score)?),
            answers: Set(serde_json::to_string(&record.answers)?),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        submission::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(submission::Column::Id)
                    .update_columns([
                        submission::Column::Status,
                        submission::Column::Score,
                        submission::Column::Answers,
                        submission::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find_participant(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> Result<Option<Participant>> {
        let model = participant::Entity::find_by_id((contest_id.to_string(), user_id.to_string()))
            .one(&self.db)
            .await?;

        model.map(Self::map_participant).transpose()
    }

    async fn save_participant(&self, record: &Participant) -> Result<()> {
        let active_model = participant::ActiveModel {
            contest_id: Set(record.contest_id.to_string()),
            user_id: Set(record.user_id.to_string()),
            status: Set(Self::map_participant_status_code(record.status)),
            score: Set(score_column(record.score)?),
            updated_at: Set(now()),
        };

        participant::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([participant::Column::ContestId, participant::Column::UserId])
                    .update_columns([
                        participant::Column::Status,
                        participant::Column::Score,
                        participant::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn update_participant_score(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        score: Score,
    ) -> Result<bool> {
        let result = participant::Entity::update_many()
            .col_expr(participant::Column::Score, Expr::value(score_column(score)?))
            .col_expr(participant::Column::UpdatedAt, Expr::value(now()))
            .filter(participant::Column::ContestId.eq(contest_id.to_string()))
            .filter(participant::Column::UserId.eq(user_id.to_string()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_participants(&self, contest_id: ContestId) -> Result<Vec<Participant>> {
        let models = participant::Entity::find()
            .filter(participant::Column::ContestId.eq(contest_id.to_string()))
            .order_by_asc(participant::Column::UserId)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_participant).collect()
    }

    async fn display_names(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids.iter().map(ToString::to_string)))
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|model| Ok((parse_id("user.id", &model.id)?, model.display_name)))
            .collect()
    }
}
