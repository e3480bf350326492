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
                    .table(Coupon::Table)
                    .if_not_exists()
                    .col(pk_auto(Coupon::Id))
                    .col(string_uniq(Coupon::Code))
                    .col(string(Coupon::DiscountKind))
                    .col(big_integer(Coupon::DiscountValue))
                    .col(integer_null(Coupon::MaxRedemptions))
                    .col(integer(Coupon::RedemptionCount).default(0))
                    .col(timestamp_with_time_zone_null(Coupon::ExpiresAt))
                    .col(integer_null(Coupon::PlanId))
                    .col(boolean(Coupon::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Coupon::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coupon_plan_id")
                            .from(Coupon::Table, Coupon::PlanId)
                            .to(Plan::Table, Plan::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coupon::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Coupon {
    Table,
    Id,
    Code,
    DiscountKind,
    DiscountValue,
    MaxRedemptions,
    RedemptionCount,
    ExpiresAt,
    PlanId,
    Active,
    CreatedAt,
}
