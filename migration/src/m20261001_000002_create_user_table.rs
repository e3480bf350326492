use sea_orm_migration::{prelude::*, schema::*};

use super::m20261001_000001_create_plan_table::Plan;

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
                    .col(pk_auto(User::Id))
                    .col(string_uniq(User::Email))
                    .col(string(User::Name))
                    .col(boolean(User::Admin).default(false))
                    .col(big_integer(User::TopUpCredits).default(0))
                    .col(big_integer(User::MonthlyCredits).default(0))
                    .col(timestamp_with_time_zone_null(User::MonthlyCreditsResetAt))
                    .col(timestamp_with_time_zone(User::TrialStartedAt))
                    .col(integer(User::TrialDays))
                    .col(integer_null(User::PlanId))
                    .col(string_null(User::LinkedinUrn))
                    .col(text_null(User::LinkedinAccessToken))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_plan_id")
                            .from(User::Table, User::PlanId)
                            .to(Plan::Table, Plan::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Email,
    Name,
    Admin,
    TopUpCredits,
    MonthlyCredits,
    MonthlyCreditsResetAt,
    TrialStartedAt,
    TrialDays,
    PlanId,
    LinkedinUrn,
    LinkedinAccessToken,
    CreatedAt,
}
