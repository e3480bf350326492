//! Scheduled post service for queueing posts and publishing them when due.
//!
//! Due posts are processed by the in-process cron job and by the external timer
//! endpoint. Both may run at the same time, so each post is claimed with a status
//! swap before anything is charged or published. A claim that never reaches a final
//! status, because the process died or the outcome could not be stored, is picked up
//! again by a later pass once it is stale.

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        credit_transaction::CreditTransactionRepository, scheduled_post::ScheduledPostRepository,
        user::UserRepository,
    },
    error::{credit::CreditError, AppError},
    model::{
        credit::{CreditAction, DeductCreditsParam},
        post::validate_content,
        scheduled_post::{
            CreateScheduledPostParam, PaginatedScheduledPosts, PostStatus, ProcessReport,
            ScheduledPost, MAX_PUBLISH_ATTEMPTS, MAX_SCHEDULE_DAYS, STALE_CLAIM_MINUTES,
        },
    },
    service::{credit::CreditService, linkedin::SocialPublisher},
};

pub struct ScheduledPostService<'a> {
    db: &'a DatabaseConnection,
    publisher: &'a dyn SocialPublisher,
}

impl<'a> ScheduledPostService<'a> {
    pub fn new(db: &'a DatabaseConnection, publisher: &'a dyn SocialPublisher) -> Self {
        Self { db, publisher }
    }

    /// Queues a post for publishing at `scheduled_for`.
    ///
    /// Credits are charged when the post is published, not when it is queued.
    ///
    /// # Returns
    /// - `Ok(ScheduledPost)` - The pending post
    /// - `Err(AppError::BadRequest)` - Invalid content, or the time is in the past or
    ///   more than 90 days ahead
    pub async fn create(&self, param: CreateScheduledPostParam) -> Result<ScheduledPost, AppError> {
        validate_content(&param.content)?;

        let now = Utc::now();
        if param.scheduled_for <= now {
            return Err(AppError::BadRequest(
                "Scheduled time must be in the future".to_string(),
            ));
        }
        if param.scheduled_for > now + Duration::days(MAX_SCHEDULE_DAYS) {
            return Err(AppError::BadRequest(format!(
                "Posts can be scheduled at most {} days ahead",
                MAX_SCHEDULE_DAYS
            )));
        }

        let post = ScheduledPostRepository::new(self.db).create(param).await?;
        tracing::info!(
            user_id = post.user_id,
            post_id = post.id,
            scheduled_for = %post.scheduled_for,
            "Scheduled post"
        );

        Ok(post)
    }

    pub async fn list(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedScheduledPosts, AppError> {
        let (posts, total) = ScheduledPostRepository::new(self.db)
            .get_paginated_by_user(user_id, page, per_page)
            .await?;

        let total_pages = (total as f64 / per_page as f64).ceil() as u64;

        Ok(PaginatedScheduledPosts {
            posts,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Cancels one of the user's pending posts.
    ///
    /// # Returns
    /// - `Ok(ScheduledPost)` - The cancelled post
    /// - `Err(AppError::NotFound)` - No such post for this user
    /// - `Err(AppError::BadRequest)` - Post is no longer pending
    pub async fn cancel(&self, user_id: i32, id: i32) -> Result<ScheduledPost, AppError> {
        let repo = ScheduledPostRepository::new(self.db);

        let cancelled = repo.cancel(id, user_id, Utc::now()).await?;
        let post = repo
            .find_by_id(id)
            .await?
            .filter(|post| post.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Scheduled post {} not found", id)))?;

        if !cancelled {
            return Err(AppError::BadRequest(format!(
                "Scheduled post {} is {} and can no longer be cancelled",
                id,
                post.status.as_str()
            )));
        }

        Ok(post)
    }

    /// Publishes up to `limit` pending posts due at `now`, oldest first.
    ///
    /// Abandoned claims are recovered first, so a requeued post can be published in
    /// the same pass. A failure on one post is recorded on that post and does not stop
    /// the pass.
    pub async fn process_due(&self, now: DateTime<Utc>, limit: u64) -> Result<ProcessReport, AppError> {
        let mut report = ProcessReport {
            recovered: self.recover_stale_claims(now, limit).await?,
            ..Default::default()
        };

        let repo = ScheduledPostRepository::new(self.db);
        let due = repo.get_due(now, limit).await?;

        for post in due {
            if !repo.claim(post.id, Utc::now()).await? {
                report.skipped += 1;
                continue;
            }
            report.processed += 1;

            match self.publish_claimed(&post).await {
                Ok(PostStatus::Posted) => report.posted += 1,
                Ok(_) => report.failed += 1,
                Err(e) => {
                    tracing::error!(post_id = post.id, "Failed to process scheduled post: {}", e);
                    report.failed += 1;
                }
            }
        }

        if report.processed > 0 || report.skipped > 0 || report.recovered > 0 {
            tracing::info!(
                processed = report.processed,
                posted = report.posted,
                failed = report.failed,
                skipped = report.skipped,
                recovered = report.recovered,
                "Processed due scheduled posts"
            );
        }

        Ok(report)
    }

    /// Requeues or fails claims left in `processing` for longer than
    /// `STALE_CLAIM_MINUTES`.
    ///
    /// A post with attempts left goes back to `pending`; its charge is keyed by the
    /// post, so the retry does not charge twice. A post out of attempts is failed and
    /// any charge already taken for it is refunded.
    ///
    /// # Returns
    /// - `Ok(count)` - Claims requeued or failed
    async fn recover_stale_claims(&self, now: DateTime<Utc>, limit: u64) -> Result<u32, AppError> {
        let repo = ScheduledPostRepository::new(self.db);
        let cutoff = now - Duration::minutes(STALE_CLAIM_MINUTES);

        let mut recovered = 0;
        for post in repo.get_stale_claims(cutoff, limit).await? {
            if post.attempts < MAX_PUBLISH_ATTEMPTS {
                if repo.release_stale_claim(post.id, cutoff, now).await? {
                    tracing::warn!(
                        post_id = post.id,
                        attempts = post.attempts,
                        "Requeued abandoned scheduled post"
                    );
                    recovered += 1;
                }
                continue;
            }

            let charge = CreditTransactionRepository::new(self.db)
                .find_by_idempotency_key(post.user_id, &post.deduction_key())
                .await?;
            let charge_id = charge.map(|charge| charge.id);

            if !repo
                .fail_stale_claim(
                    post.id,
                    cutoff,
                    "Publishing did not finish after repeated attempts",
                    charge_id,
                    now,
                )
                .await?
            {
                continue;
            }
            recovered += 1;
            tracing::warn!(post_id = post.id, "Failed abandoned scheduled post");

            if let Some(charge_id) = charge_id {
                match CreditService::new(self.db).refund(charge_id).await {
                    Ok(_) | Err(AppError::CreditErr(CreditError::AlreadyRefunded(_))) => {}
                    Err(e) => tracing::error!(
                        post_id = post.id,
                        transaction_id = charge_id,
                        "Failed to refund abandoned scheduled post: {}",
                        e
                    ),
                }
            }
        }

        Ok(recovered)
    }

    /// Charges for and publishes a post this pass has claimed.
    ///
    /// # Returns
    /// - `Ok(PostStatus::Posted)` - Published
    /// - `Ok(PostStatus::Failed)` - Recorded as failed with the reason
    /// - `Err(AppError)` - The outcome could not be stored
    async fn publish_claimed(&self, post: &ScheduledPost) -> Result<PostStatus, AppError> {
        let repo = ScheduledPostRepository::new(self.db);

        let account = UserRepository::new(self.db)
            .find_by_id(post.user_id)
            .await?
            .and_then(|user| user.linkedin);
        let Some(account) = account else {
            repo.mark_failed(post.id, "LinkedIn account is not connected", None, Utc::now())
                .await?;
            tracing::warn!(post_id = post.id, "Scheduled post owner has no LinkedIn account");
            return Ok(PostStatus::Failed);
        };

        let credits = CreditService::new(self.db);
        let deduction = match credits
            .deduct(DeductCreditsParam {
                user_id: post.user_id,
                action: CreditAction::ScheduledPost,
                idempotency_key: Some(post.deduction_key()),
            })
            .await
        {
            Ok(deduction) => deduction,
            Err(e) => {
                repo.mark_failed(post.id, &e.to_string(), None, Utc::now())
                    .await?;
                tracing::warn!(post_id = post.id, "Could not charge scheduled post: {}", e);
                return Ok(PostStatus::Failed);
            }
        };

        let published = self
            .publisher
            .publish(
                &account.urn,
                &account.access_token,
                &post.content,
                post.visibility,
            )
            .await;

        match published {
            Ok(linkedin_post_id) => {
                repo.mark_posted(post.id, &linkedin_post_id, deduction.transaction.id, Utc::now())
                    .await?;
                Ok(PostStatus::Posted)
            }
            Err(e) => {
                tracing::warn!(post_id = post.id, "Failed to publish scheduled post: {}", e);
                let refund = credits.refund(deduction.transaction.id).await;
                if let Err(refund_err) = &refund {
                    tracing::error!(
                        post_id = post.id,
                        transaction_id = deduction.transaction.id,
                        "Failed to refund scheduled post credit: {}",
                        refund_err
                    );
                }
                repo.mark_failed(
                    post.id,
                    &e.to_string(),
                    Some(deduction.transaction.id),
                    Utc::now(),
                )
                .await?;
                Ok(PostStatus::Failed)
            }
        }
    }
}
