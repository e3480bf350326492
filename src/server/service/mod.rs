//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating multiple repository calls and external services
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//! - **Transaction Management**: Keeping balance changes, ledger rows and order
//!   completion atomic
//!
//! External systems are reached through the `PaymentGateway` and `SocialPublisher`
//! traits so tests can substitute stubs.

pub mod coupon;
pub mod credit;
pub mod draft;
pub mod gateway;
pub mod linkedin;
pub mod payment;
pub mod plan;
pub mod posting;
pub mod scheduled_post;
pub mod user;

#[cfg(test)]
mod test;
