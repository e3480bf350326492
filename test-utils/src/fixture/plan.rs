//! Plan fixtures for creating in-memory test data.

use chrono::{TimeZone, Utc};
use entity::plan;

/// Creates a top-up plan entity: 50 credits for 49900 INR paise.
pub fn top_up() -> plan::Model {
    plan::Model {
        id: 1,
        slug: "starter-pack".to_string(),
        name: "Starter Pack".to_string(),
        kind: "top_up".to_string(),
        price_cents: 49900,
        currency: "INR".to_string(),
        credits: 50,
        active: true,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Creates a subscription plan entity: 100 credits a month for 99900 INR paise.
pub fn subscription() -> plan::Model {
    plan::Model {
        id: 2,
        slug: "pro-monthly".to_string(),
        name: "Pro".to_string(),
        kind: "subscription".to_string(),
        price_cents: 99900,
        currency: "INR".to_string(),
        credits: 100,
        active: true,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}
