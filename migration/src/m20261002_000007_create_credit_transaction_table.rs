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
                    .table(CreditTransaction::Table)
                    .if_not_exists()
                    .col(pk_auto(CreditTransaction::Id))
                    .col(integer(CreditTransaction::UserId))
                    .col(string(CreditTransaction::Action))
                    .col(big_integer(CreditTransaction::Delta))
                    .col(big_integer(CreditTransaction::MonthlyDelta))
                    .col(big_integer(CreditTransaction::TopUpDelta))
                    .col(big_integer(CreditTransaction::MonthlyAfter))
                    .col(big_integer(CreditTransaction::TopUpAfter))
                    .col(big_integer(CreditTransaction::BalanceAfter))
                    .col(string_null(CreditTransaction::IdempotencyKey).unique_key())
                    .col(integer_null(CreditTransaction::ReversesId).unique_key())
                    .col(
                        timestamp_with_time_zone(CreditTransaction::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_transaction_user_id")
                            .from(CreditTransaction::Table, CreditTransaction::UserId)
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
                    .name("idx_credit_transaction_user_created")
                    .table(CreditTransaction::Table)
                    .col(CreditTransaction::UserId)
                    .col(CreditTransaction::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditTransaction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CreditTransaction {
    Table,
    Id,
    UserId,
    Action,
    Delta,
    MonthlyDelta,
    TopUpDelta,
    MonthlyAfter,
    TopUpAfter,
    BalanceAfter,
    IdempotencyKey,
    ReversesId,
    CreatedAt,
}
