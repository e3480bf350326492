//! User domain models and parameters.
//!
//! Provides the domain model for application users with their credit buckets, trial
//! window and the LinkedIn credentials delivered by the external sign-in flow.

use chrono::{DateTime, Utc};

use crate::{
    model::user::{LinkedInAccountDto, PaginatedUsersDto, UserDto},
    server::model::credit::{CreditBalance, TrialWindow},
};

/// LinkedIn member identity used to publish on the user's behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedInAccount {
    /// Member URN, e.g. `urn:li:person:abc123`.
    pub urn: String,
    pub access_token: String,
}

impl LinkedInAccount {
    pub fn from_dto(dto: LinkedInAccountDto) -> Self {
        Self {
            urn: dto.urn,
            access_token: dto.access_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub balance: CreditBalance,
    /// Next time the monthly bucket is refreshed, `None` without a subscription.
    pub monthly_credits_reset_at: Option<DateTime<Utc>>,
    pub trial: TrialWindow,
    pub plan_id: Option<i32>,
    pub linkedin: Option<LinkedInAccount>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn into_dto(self, now: DateTime<Utc>) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email,
            name: self.name,
            admin: self.admin,
            plan_id: self.plan_id,
            linkedin_connected: self.linkedin.is_some(),
            balance: self.balance.into_dto(self.monthly_credits_reset_at),
            trial: self.trial.into_dto(now),
            created_at: self.created_at,
        }
    }

    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// The LinkedIn account is only present when both the URN and the access token
    /// are stored.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        let linkedin = match (entity.linkedin_urn, entity.linkedin_access_token) {
            (Some(urn), Some(access_token)) => Some(LinkedInAccount { urn, access_token }),
            _ => None,
        };

        Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            admin: entity.admin,
            balance: CreditBalance::new(entity.monthly_credits, entity.top_up_credits),
            monthly_credits_reset_at: entity.monthly_credits_reset_at,
            trial: TrialWindow {
                started_at: entity.trial_started_at,
                days: entity.trial_days,
            },
            plan_id: entity.plan_id,
            linkedin,
            created_at: entity.created_at,
        }
    }
}

/// Parameters for creating a user on first sign-in.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub email: String,
    pub name: String,
    pub trial_days: i32,
}

/// Parameters for retrieving a paginated list of users.
#[derive(Debug, Clone)]
pub struct GetAllUsersParam {
    pub page: u64,
    pub per_page: u64,
}

/// Parameters for granting or revoking admin.
#[derive(Debug, Clone)]
pub struct SetAdminParam {
    pub user_id: i32,
    pub is_admin: bool,
}

/// Paginated collection of users with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl PaginatedUsers {
    pub fn into_dto(self, now: DateTime<Utc>) -> PaginatedUsersDto {
        PaginatedUsersDto {
            users: self.users.into_iter().map(|u| u.into_dto(now)).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
