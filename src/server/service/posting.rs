//! Immediate LinkedIn publishing paid for with credits.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::AppError,
    model::{
        credit::{CreditAction, DeductCreditsParam},
        post::{validate_content, PublishPostParam, PublishedPost},
    },
    service::{credit::CreditService, linkedin::SocialPublisher},
};

pub struct PostingService<'a> {
    db: &'a DatabaseConnection,
    publisher: &'a dyn SocialPublisher,
}

impl<'a> PostingService<'a> {
    pub fn new(db: &'a DatabaseConnection, publisher: &'a dyn SocialPublisher) -> Self {
        Self { db, publisher }
    }

    /// Publishes a post to the user's LinkedIn feed now.
    ///
    /// Charges one `LinkedInPost` credit before publishing and refunds it if LinkedIn
    /// rejects the post. Resubmitting with the same idempotency key is rejected rather
    /// than posting twice.
    ///
    /// # Returns
    /// - `Ok(PublishedPost)` - LinkedIn post id, ledger row and remaining balance
    /// - `Err(AppError::BadRequest)` - Invalid content or no LinkedIn account connected
    /// - `Err(AppError::Conflict)` - Idempotency key already used
    /// - `Err(CreditError)` - User cannot pay for the post
    /// - `Err(AppError::Upstream)` - LinkedIn rejected the post; the credit was refunded
    pub async fn post_now(&self, param: PublishPostParam) -> Result<PublishedPost, AppError> {
        validate_content(&param.content)?;

        let user = UserRepository::new(self.db)
            .find_by_id(param.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", param.user_id)))?;
        let account = user.linkedin.ok_or_else(|| {
            AppError::BadRequest("Connect a LinkedIn account before posting".to_string())
        })?;

        let credits = CreditService::new(self.db);
        let deduction = credits
            .deduct(DeductCreditsParam {
                user_id: user.id,
                action: CreditAction::LinkedInPost,
                idempotency_key: param.idempotency_key,
            })
            .await?;
        if deduction.replayed {
            return Err(AppError::Conflict(
                "This post has already been submitted".to_string(),
            ));
        }

        let published = self
            .publisher
            .publish(
                &account.urn,
                &account.access_token,
                &param.content,
                param.visibility,
            )
            .await;

        match published {
            Ok(linkedin_post_id) => {
                tracing::info!(user_id = user.id, %linkedin_post_id, "Published post");
                Ok(PublishedPost {
                    linkedin_post_id,
                    credit_transaction_id: deduction.transaction.id,
                    balance: deduction.transaction.balance_after,
                })
            }
            Err(e) => {
                tracing::warn!(user_id = user.id, "Failed to publish post: {}", e);
                if let Err(refund_err) = credits.refund(deduction.transaction.id).await {
                    tracing::error!(
                        user_id = user.id,
                        transaction_id = deduction.transaction.id,
                        "Failed to refund post credit: {}",
                        refund_err
                    );
                }
                Err(e)
            }
        }
    }
}
