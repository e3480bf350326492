use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{User, CreditTransaction};
///
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(CreditTransaction)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables should be added in dependency order (tables with foreign
    /// keys after the tables they reference).
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the tables the credit ledger touches.
    ///
    /// Adds, in dependency order:
    /// - Plan
    /// - User
    /// - Subscription
    /// - CreditTransaction
    /// - UsageCounter
    pub fn with_credit_tables(self) -> Self {
        self.with_table(Plan)
            .with_table(User)
            .with_table(Subscription)
            .with_table(CreditTransaction)
            .with_table(UsageCounter)
    }

    /// Adds every table required for checkout and payment completion.
    ///
    /// Equivalent to `with_credit_tables()` plus Coupon, Order and Payment.
    pub fn with_billing_tables(self) -> Self {
        self.with_credit_tables()
            .with_table(Coupon)
            .with_table(Order)
            .with_table(Payment)
    }

    /// Adds every table required for publishing and scheduling posts.
    ///
    /// Equivalent to `with_credit_tables()` plus ScheduledPost.
    pub fn with_posting_tables(self) -> Self {
        self.with_credit_tables().with_table(ScheduledPost)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// Creates an in-memory SQLite database connection and executes all CREATE TABLE
    /// statements that were added via `with_table()`.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
