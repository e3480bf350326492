//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with a `Factory`
//! struct for customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let user = factory::create_user(&db).await?;
//!     let plan = factory::create_plan(&db).await?;
//!
//!     let (plan, user, subscription) = factory::helpers::create_subscriber(&db, 30).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let user = factory::user::UserFactory::new(&db)
//!     .top_up_credits(5)
//!     .trial_expired()
//!     .with_linkedin()
//!     .build()
//!     .await?;
//! ```

pub mod coupon;
pub mod helpers;
pub mod order;
pub mod plan;
pub mod scheduled_post;
pub mod subscription;
pub mod user;

pub use coupon::create_coupon;
pub use order::create_order;
pub use plan::create_plan;
pub use scheduled_post::create_due_post;
pub use subscription::create_subscription;
pub use user::{create_user, create_user_with_credits};
