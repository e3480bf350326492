use chrono::{DateTime, Months, Utc};

use crate::server::error::{internal::InternalError, AppError};

/// Usage counter key for the calendar month containing `at`, e.g. `2026-10`.
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Whether `value` is a valid `YYYY-MM` month key.
pub fn is_month_key(value: &str) -> bool {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok()
        && value.len() == 7
}

/// `anchor` plus `months` calendar months, clamping to the end of shorter months.
///
/// Always computed from the anchor, so a day lost to a short month comes back in the
/// next long one.
pub fn months_after(anchor: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>, AppError> {
    anchor
        .checked_add_months(Months::new(months))
        .ok_or_else(|| InternalError::InvalidResetDate(anchor.to_rfc3339()).into())
}

/// First monthly anniversary of `anchor` that lies after `after`.
pub fn next_anniversary_after(
    anchor: DateTime<Utc>,
    after: DateTime<Utc>,
) -> Result<DateTime<Utc>, AppError> {
    let mut months = 1;
    loop {
        let next = months_after(anchor, months)?;
        if next > after {
            return Ok(next);
        }
        months += 1;
    }
}
