//! User fixtures for creating in-memory test data.

use chrono::{TimeZone, Utc};
use entity::user;

/// Default test email.
pub const DEFAULT_EMAIL: &str = "writer@example.com";

/// Default trial length in days.
pub const DEFAULT_TRIAL_DAYS: i32 = 7;

/// Creates a user entity model with default values.
///
/// # Default Values
/// - id: `1`
/// - email: `"writer@example.com"`
/// - credits: `0` top-up, `0` monthly
/// - trial: started 2026-01-01, 7 days
/// - no plan and no LinkedIn account
pub fn entity() -> user::Model {
    let started = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    user::Model {
        id: 1,
        email: DEFAULT_EMAIL.to_string(),
        name: "Writer".to_string(),
        admin: false,
        top_up_credits: 0,
        monthly_credits: 0,
        monthly_credits_reset_at: None,
        trial_started_at: started,
        trial_days: DEFAULT_TRIAL_DAYS,
        plan_id: None,
        linkedin_urn: None,
        linkedin_access_token: None,
        created_at: started,
    }
}
