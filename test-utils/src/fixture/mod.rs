//! Test fixtures providing reusable test data without database insertion.
//!
//! Unlike factories, fixtures do NOT insert data into the database. Use them for
//! unit testing domain conversions and pure business rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! let user = fixture::user::entity();
//! let coupon = fixture::coupon::entity_builder().fixed(5000).build();
//! ```

pub mod coupon;
pub mod plan;
pub mod user;
