//! Posts queued for publishing at a future time.

use chrono::{DateTime, Utc};

use crate::{
    model::post::{PaginatedScheduledPostsDto, ProcessReportDto, ScheduledPostDto},
    server::{
        error::AppError,
        model::{credit::SCHEDULED_POST_KEY_PREFIX, post::Visibility},
        util::parse::parse_stored,
    },
};

/// Furthest a post may be scheduled ahead of now.
pub const MAX_SCHEDULE_DAYS: i64 = 90;

/// A claim older than this without a final status is treated as abandoned.
pub const STALE_CLAIM_MINUTES: i64 = 10;

/// Claims a post may go through before an abandoned claim fails it for good.
pub const MAX_PUBLISH_ATTEMPTS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    Pending,
    /// Claimed by a processing pass; no other pass may touch it.
    Processing,
    Posted,
    Failed,
    Cancelled,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Posted => "posted",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "posted" => Some(Self::Posted),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledPost {
    pub id: i32,
    pub user_id: i32,
    pub content: String,
    pub visibility: Visibility,
    pub scheduled_for: DateTime<Utc>,
    pub status: PostStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub linkedin_post_id: Option<String>,
    pub credit_transaction_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledPost {
    pub fn into_dto(self) -> ScheduledPostDto {
        ScheduledPostDto {
            id: self.id,
            content: self.content,
            visibility: self.visibility.as_str().to_string(),
            scheduled_for: self.scheduled_for,
            status: self.status.as_str().to_string(),
            attempts: self.attempts,
            last_error: self.last_error,
            linkedin_post_id: self.linkedin_post_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn from_entity(entity: entity::scheduled_post::Model) -> Result<Self, AppError> {
        let status = parse_stored("scheduled_post.status", &entity.status, PostStatus::parse)?;
        let visibility = parse_stored(
            "scheduled_post.visibility",
            &entity.visibility,
            Visibility::parse,
        )?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            content: entity.content,
            visibility,
            scheduled_for: entity.scheduled_for,
            status,
            attempts: entity.attempts,
            last_error: entity.last_error,
            linkedin_post_id: entity.linkedin_post_id,
            credit_transaction_id: entity.credit_transaction_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    /// Idempotency key for the credit deduction made when publishing this post.
    pub fn deduction_key(&self) -> String {
        format!("{}{}", SCHEDULED_POST_KEY_PREFIX, self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreateScheduledPostParam {
    pub user_id: i32,
    pub content: String,
    pub visibility: Visibility,
    pub scheduled_for: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedScheduledPosts {
    pub posts: Vec<ScheduledPost>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl PaginatedScheduledPosts {
    pub fn into_dto(self) -> PaginatedScheduledPostsDto {
        PaginatedScheduledPostsDto {
            posts: self.posts.into_iter().map(|p| p.into_dto()).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// Counts from one pass over due posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessReport {
    /// Posts this pass claimed.
    pub processed: u32,
    pub posted: u32,
    pub failed: u32,
    /// Due posts another pass claimed first.
    pub skipped: u32,
    /// Abandoned claims put back in the queue or failed.
    pub recovered: u32,
}

impl ProcessReport {
    pub fn into_dto(self) -> ProcessReportDto {
        ProcessReportDto {
            processed: self.processed,
            posted: self.posted,
            failed: self.failed,
            skipped: self.skipped,
            recovered: self.recovered,
        }
    }
}
