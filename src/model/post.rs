use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::credit::CreditBalanceDto;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreatePostDto {
    pub content: String,
    /// `PUBLIC` (default) or `CONNECTIONS`.
    pub visibility: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PublishedPostDto {
    pub linkedin_post_id: String,
    pub credit_transaction_id: i32,
    pub balance: CreditBalanceDto,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreateScheduledPostDto {
    pub content: String,
    pub visibility: Option<String>,
    pub scheduled_for: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ScheduledPostDto {
    pub id: i32,
    pub content: String,
    pub visibility: String,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub linkedin_post_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PaginatedScheduledPostsDto {
    pub posts: Vec<ScheduledPostDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Outcome of one pass over due scheduled posts.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ProcessReportDto {
    pub processed: u32,
    pub posted: u32,
    pub failed: u32,
    pub skipped: u32,
    pub recovered: u32,
}
