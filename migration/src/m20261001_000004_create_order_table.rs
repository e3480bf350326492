use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20261001_000001_create_plan_table::Plan, m20261001_000002_create_user_table::User,
    m20261001_000003_create_coupon_table::Coupon,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(pk_auto(Order::Id))
                    .col(integer(Order::UserId))
                    .col(integer(Order::PlanId))
                    .col(integer_null(Order::CouponId))
                    .col(big_integer(Order::AmountCents))
                    .col(big_integer(Order::DiscountCents).default(0))
                    .col(string(Order::Currency))
                    .col(string_uniq(Order::GatewayOrderId))
                    .col(string(Order::Status))
                    .col(
                        timestamp_with_time_zone(Order::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(Order::CompletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user_id")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_plan_id")
                            .from(Order::Table, Order::PlanId)
                            .to(Plan::Table, Plan::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_coupon_id")
                            .from(Order::Table, Order::CouponId)
                            .to(Coupon::Table, Coupon::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Order {
    Table,
    Id,
    UserId,
    PlanId,
    CouponId,
    AmountCents,
    DiscountCents,
    Currency,
    GatewayOrderId,
    Status,
    CreatedAt,
    CompletedAt,
}
