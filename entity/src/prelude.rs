pub use super::coupon::Entity as Coupon;
pub use super::credit_transaction::Entity as CreditTransaction;
pub use super::draft::Entity as Draft;
pub use super::order::Entity as Order;
pub use super::payment::Entity as Payment;
pub use super::plan::Entity as Plan;
pub use super::scheduled_post::Entity as ScheduledPost;
pub use super::subscription::Entity as Subscription;
pub use super::usage_counter::Entity as UsageCounter;
pub use super::user::Entity as User;
