use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20261001_000001_create_plan_table::Plan, m20261001_000002_create_user_table::User,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscription::Id))
                    .col(integer(Subscription::UserId))
                    .col(integer(Subscription::PlanId))
                    .col(string(Subscription::Status))
                    .col(timestamp_with_time_zone(Subscription::CurrentPeriodStart))
                    .col(timestamp_with_time_zone(Subscription::CurrentPeriodEnd))
                    .col(
                        timestamp_with_time_zone(Subscription::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_user_id")
                            .from(Subscription::Table, Subscription::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_plan_id")
                            .from(Subscription::Table, Subscription::PlanId)
                            .to(Plan::Table, Plan::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Subscription {
    Table,
    Id,
    UserId,
    PlanId,
    Status,
    CurrentPeriodStart,
    CurrentPeriodEnd,
    CreatedAt,
}
