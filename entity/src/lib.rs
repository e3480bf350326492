//! SeaORM entity definitions for the LinkzUp schema.
//!
//! Each module mirrors one table created by the `migration` crate.

pub mod prelude;

pub mod coupon;
pub mod credit_transaction;
pub mod draft;
pub mod order;
pub mod payment;
pub mod plan;
pub mod scheduled_post;
pub mod subscription;
pub mod usage_counter;
pub mod user;
