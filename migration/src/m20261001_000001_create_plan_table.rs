use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plan::Table)
                    .if_not_exists()
                    .col(pk_auto(Plan::Id))
                    .col(string_uniq(Plan::Slug))
                    .col(string(Plan::Name))
                    .col(string(Plan::Kind))
                    .col(big_integer(Plan::PriceCents))
                    .col(string(Plan::Currency))
                    .col(big_integer(Plan::Credits))
                    .col(boolean(Plan::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Plan::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Plan::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Plan {
    Table,
    Id,
    Slug,
    Name,
    Kind,
    PriceCents,
    Currency,
    Credits,
    Active,
    CreatedAt,
}
