pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_plan_table;
mod m20261001_000002_create_user_table;
mod m20261001_000003_create_coupon_table;
mod m20261001_000004_create_order_table;
mod m20261001_000005_create_payment_table;
mod m20261001_000006_create_subscription_table;
mod m20261002_000007_create_credit_transaction_table;
mod m20261002_000008_create_usage_counter_table;
mod m20261003_000009_create_scheduled_post_table;
mod m20261003_000010_create_draft_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_plan_table::Migration),
            Box::new(m20261001_000002_create_user_table::Migration),
            Box::new(m20261001_000003_create_coupon_table::Migration),
            Box::new(m20261001_000004_create_order_table::Migration),
            Box::new(m20261001_000005_create_payment_table::Migration),
            Box::new(m20261001_000006_create_subscription_table::Migration),
            Box::new(m20261002_000007_create_credit_transaction_table::Migration),
            Box::new(m20261002_000008_create_usage_counter_table::Migration),
            Box::new(m20261003_000009_create_scheduled_post_table::Migration),
            Box::new(m20261003_000010_create_draft_table::Migration),
        ]
    }
}
