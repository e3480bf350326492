//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models to keep the data layer separate from business logic.
//!
//! Every repository is generic over `ConnectionTrait` so the same queries run against the
//! pooled connection or inside a `DatabaseTransaction`. Multi-step ledger operations rely on
//! this to keep the balance update and its ledger row atomic.

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

use sea_orm::{DbErr, SqlErr};

/// Whether a database error was caused by a unique constraint.
///
/// Used to detect concurrent inserts of the same idempotency key, refund or
/// gateway id, which the schema rejects.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod test;
