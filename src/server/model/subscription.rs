use chrono::{DateTime, Utc};

use crate::server::{error::AppError, util::parse::parse_stored};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.current_period_end > now
    }

    pub fn from_entity(entity: entity::subscription::Model) -> Result<Self, AppError> {
        let status = parse_stored(
            "subscription.status",
            &entity.status,
            SubscriptionStatus::parse,
        )?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            status,
            current_period_start: entity.current_period_start,
            current_period_end: entity.current_period_end,
        })
    }
}
