use sea_orm_migration::{prelude::*, schema::*};

use super::m20261001_000002_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduledPost::Table)
                    .if_not_exists()
                    .col(pk_auto(ScheduledPost::Id))
                    .col(integer(ScheduledPost::UserId))
                    .col(text(ScheduledPost::Content))
                    .col(string(ScheduledPost::Visibility))
                    .col(timestamp_with_time_zone(ScheduledPost::ScheduledFor))
                    .col(string(ScheduledPost::Status))
                    .col(integer(ScheduledPost::Attempts).default(0))
                    .col(text_null(ScheduledPost::LastError))
                    .col(string_null(ScheduledPost::LinkedinPostId))
                    .col(integer_null(ScheduledPost::CreditTransactionId))
                    .col(
                        timestamp_with_time_zone(ScheduledPost::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(ScheduledPost::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scheduled_post_user_id")
                            .from(ScheduledPost::Table, ScheduledPost::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scheduled_post_status_time")
                    .table(ScheduledPost::Table)
                    .col(ScheduledPost::Status)
                    .col(ScheduledPost::ScheduledFor)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledPost::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ScheduledPost {
    Table,
    Id,
    UserId,
    Content,
    Visibility,
    ScheduledFor,
    Status,
    Attempts,
    LastError,
    LinkedinPostId,
    CreditTransactionId,
    CreatedAt,
    UpdatedAt,
}
