//! Server-side domain models and parameter types.
//!
//! This module contains domain models used throughout the service layer, representing
//! business entities and operation parameters. Domain models are converted from entity
//! models at the repository boundary and transformed to DTOs at the controller boundary.
//! Pure business rules (credit splitting, coupon discounts, trial windows) live on these
//! types so every call site shares a single implementation.

pub mod coupon;
pub mod credit;
pub mod draft;
pub mod order;
pub mod plan;
pub mod post;
pub mod scheduled_post;
pub mod subscription;
pub mod user;
