use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 36).primary_key())
                    .col(string_len(User::DisplayName, 100))
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(string_len(Question::Id, 36).primary_key())
                    .col(integer(Question::Points).check(Expr::col(Question::Points).gte(0)))
                    // Question body (options or entry point + test cases) as JSON text.
                    .col(text(Question::Body))
                    .col(timestamp(Question::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Question::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Participant::Table)
                    .if_not_exists()
                    .col(string_len(Participant::ContestId, 36))
                    .col(string_len(Participant::UserId, 36))
                    // 0=registered, 1=participating, 2=disqualified
                    .col(
                        small_integer(Participant::Status)
                            .default(0)
                            .check(Expr::col(Participant::Status).gte(0))
                            .check(Expr::col(Participant::Status).lte(2)),
                    )
                    .col(
                        integer(Participant::Score)
                            .default(0)
                            .check(Expr::col(Participant::Score).gte(0)),
                    )
                    .col(timestamp(Participant::UpdatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .col(Participant::ContestId)
                            .col(Participant::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participants-user_id")
                            .from(Participant::Table, Participant::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(string_len(Submission::Id, 36).primary_key())
                    .col(string_len(Submission::ContestId, 36))
                    .col(string_len(Submission::UserId, 36))
                    // 0=pending, 1=completed
                    .col(
                        small_integer(Submission::Status)
                            .default(0)
                            .check(Expr::col(Submission::Status).gte(0))
                            .check(Expr::col(Submission::Status).lte(1)),
                    )
                    .col(
                        integer(Submission::Score)
                            .default(0)
                            .check(Expr::col(Submission::Score).gte(0)),
                    )
                    // Answer map keyed by question id, JSON text.
                    .col(text(Submission::Answers))
                    .col(timestamp(Submission::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Submission::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submissions-user_id")
                            .from(Submission::Table, Submission::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_contest_user")
                    .table(Submission::Table)
                    .col(Submission::ContestId)
                    .col(Submission::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_contest_score")
                    .table(Participant::Table)
                    .col(Participant::ContestId)
                    .col(Participant::Score)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Participant::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    DisplayName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    Points,
    Body,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Participant {
    Table,
    ContestId,
    UserId,
    Status,
    Score,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    ContestId,
    UserId,
    Status,
    Score,
    Answers,
    CreatedAt,
    UpdatedAt,
}
