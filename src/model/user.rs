use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::credit::{CreditBalanceDto, TrialDto};

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub plan_id: Option<i32>,
    pub linkedin_connected: bool,
    pub balance: CreditBalanceDto,
    pub trial: TrialDto,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PaginatedUsersDto {
    pub users: Vec<UserDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Credits an admin adds to a user's top-up bucket.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct GrantCreditsDto {
    pub amount: i64,
}

/// LinkedIn member the auth backend obtained through its OAuth flow.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct LinkedInAccountDto {
    /// Member URN, e.g. `urn:li:person:abc123`.
    pub urn: String,
    pub access_token: String,
}

/// Identity the auth backend vouches for when it opens a session.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SignInDto {
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Replaces the stored LinkedIn link when present.
    #[serde(default)]
    pub linkedin: Option<LinkedInAccountDto>,
}
