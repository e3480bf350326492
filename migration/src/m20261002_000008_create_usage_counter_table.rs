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
                    .table(UsageCounter::Table)
                    .if_not_exists()
                    .col(integer(UsageCounter::UserId))
                    .col(string(UsageCounter::Month))
                    .col(string(UsageCounter::Action))
                    .col(big_integer(UsageCounter::Count).default(0))
                    .primary_key(
                        Index::create()
                            .col(UsageCounter::UserId)
                            .col(UsageCounter::Month)
                            .col(UsageCounter::Action),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_counter_user_id")
                            .from(UsageCounter::Table, UsageCounter::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsageCounter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UsageCounter {
    Table,
    UserId,
    Month,
    Action,
    Count,
}
