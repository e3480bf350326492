use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20261001_000002_create_user_table::User, m20261001_000004_create_order_table::Order,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::Id))
                    .col(integer_uniq(Payment::OrderId))
                    .col(integer(Payment::UserId))
                    .col(string_uniq(Payment::GatewayPaymentId))
                    .col(big_integer(Payment::AmountCents))
                    .col(string(Payment::Currency))
                    .col(
                        timestamp_with_time_zone(Payment::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order_id")
                            .from(Payment::Table, Payment::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_user_id")
                            .from(Payment::Table, Payment::UserId)
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
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Payment {
    Table,
    Id,
    OrderId,
    UserId,
    GatewayPaymentId,
    AmountCents,
    Currency,
    CreatedAt,
}
