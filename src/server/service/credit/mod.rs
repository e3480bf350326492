//! Credit service for balances, deductions, refunds and grants.
//!
//! This module provides the `CreditService`, the entry point for everything that reads or
//! changes a user's credits. Balance writes are delegated to `Ledger`, which keeps each
//! bucket change and its ledger row atomic. Monthly refreshes are handled by
//! `MonthlyCredits` and happen lazily whenever a balance is read or spent, and eagerly
//! from the hourly scheduler job.

pub mod ledger;
pub mod monthly;

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        credit_transaction::CreditTransactionRepository, is_unique_violation,
        subscription::SubscriptionRepository, usage_counter::UsageCounterRepository,
        user::UserRepository,
    },
    error::{credit::CreditError, AppError},
    model::{
        credit::{
            BalanceSummary, CreditAction, CreditHistory, CreditTransaction, DeductCreditsParam,
            Deduction, GrantCreditsParam, UsageSummary,
        },
        user::User,
    },
    util::time::{is_month_key, month_key},
};

use self::{ledger::Ledger, monthly::MonthlyCredits};

/// Service providing business logic for the credit ledger.
pub struct CreditService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CreditService<'a> {
    /// Creates a new CreditService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Current balance with trial and subscription status.
    ///
    /// Refreshes the monthly bucket first if its reset date has passed.
    ///
    /// # Returns
    /// - `Ok(BalanceSummary)` - Balance after any refresh
    /// - `Err(AppError::NotFound)` - User does not exist
    pub async fn balance(&self, user_id: i32) -> Result<BalanceSummary, AppError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let user = refreshed_user(&txn, user_id, now).await?;
        let has_active_subscription = SubscriptionRepository::new(&txn)
            .find_active_for_user(user_id, now)
            .await?
            .is_some();

        txn.commit().await?;

        Ok(BalanceSummary {
            balance: user.balance,
            monthly_resets_at: user.monthly_credits_reset_at,
            trial: user.trial,
            has_active_subscription,
        })
    }

    /// Refreshes one user's monthly bucket if due at `now`.
    pub async fn refresh_monthly(&self, user_id: i32, now: DateTime<Utc>) -> Result<User, AppError> {
        let txn = self.db.begin().await?;
        let user = refreshed_user(&txn, user_id, now).await?;
        txn.commit().await?;
        Ok(user)
    }

    /// Refreshes every user whose monthly reset is due.
    ///
    /// A failure for one user is logged and does not stop the others.
    ///
    /// # Returns
    /// - `Ok(count)` - Number of users refreshed successfully
    /// - `Err(AppError)` - The due users could not be listed
    pub async fn refresh_all_due(&self, now: DateTime<Utc>) -> Result<u32, AppError> {
        let user_ids = UserRepository::new(self.db)
            .get_ids_due_for_monthly_reset(now)
            .await?;

        let mut refreshed = 0;
        for user_id in user_ids {
            match self.refresh_monthly(user_id, now).await {
                Ok(_) => refreshed += 1,
                Err(e) => {
                    tracing::warn!(user_id, "Failed to refresh monthly credits: {}", e);
                }
            }
        }

        Ok(refreshed)
    }

    /// Deducts the cost of a user action.
    ///
    /// The user may spend credits while their trial is active, while they hold an
    /// active subscription, or while they have any top-up credits. A deduction that
    /// reuses an idempotency key returns the original ledger row unchanged.
    ///
    /// # Returns
    /// - `Ok(Deduction)` - The deduction row and whether it was a replay
    /// - `Err(AppError::BadRequest)` - `action` is not a chargeable action
    /// - `Err(CreditError::TrialExpired)` - User has no way to pay
    /// - `Err(CreditError::InsufficientCredits)` - Balance is short
    /// - `Err(CreditError::Contention)` - Balance kept changing during the swap
    pub async fn deduct(&self, param: DeductCreditsParam) -> Result<Deduction, AppError> {
        let cost = param.action.cost().ok_or_else(|| {
            AppError::BadRequest(format!(
                "{} is not a chargeable action",
                param.action.as_str()
            ))
        })?;
        let now = Utc::now();

        if let Some(existing) = self.find_replay(&param).await? {
            return Ok(existing);
        }

        let txn = self.db.begin().await?;

        let user = refreshed_user(&txn, param.user_id, now).await?;
        let has_active_subscription = SubscriptionRepository::new(&txn)
            .find_active_for_user(user.id, now)
            .await?
            .is_some();

        if !user.trial.is_active(now) && !has_active_subscription && user.balance.top_up <= 0 {
            return Err(CreditError::TrialExpired.into());
        }

        let result = Ledger::new(&txn)
            .debit(user.id, param.action, cost, param.idempotency_key.clone())
            .await;

        let transaction = match result {
            Ok(transaction) => transaction,
            Err(AppError::DbErr(ref e)) if is_unique_violation(e) => {
                txn.rollback().await?;
                return match self.find_replay(&param).await? {
                    Some(existing) => Ok(existing),
                    None => Err(AppError::Conflict(
                        "A deduction with this idempotency key is in progress".to_string(),
                    )),
                };
            }
            Err(e) => return Err(e),
        };

        UsageCounterRepository::new(&txn)
            .increment(user.id, &month_key(now), param.action.as_str())
            .await?;

        txn.commit().await?;

        Ok(Deduction {
            transaction,
            replayed: false,
        })
    }

    /// Refunds a deduction back into the buckets it was taken from.
    ///
    /// # Returns
    /// - `Ok(CreditTransaction)` - The refund row
    /// - `Err(AppError::NotFound)` - No transaction with that id
    /// - `Err(CreditError::NotRefundable)` - Transaction is not a deduction
    /// - `Err(CreditError::AlreadyRefunded)` - Deduction was refunded before
    pub async fn refund(&self, transaction_id: i32) -> Result<CreditTransaction, AppError> {
        let txn = self.db.begin().await?;

        let original = CreditTransactionRepository::new(&txn)
            .find_by_id(transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Credit transaction {} not found", transaction_id))
            })?;

        let refund = Ledger::new(&txn).reverse(&original).await?;
        txn.commit().await?;

        tracing::info!(
            user_id = original.user_id,
            transaction_id,
            credits = refund.delta,
            "Refunded credit deduction"
        );

        Ok(refund)
    }

    /// Adds credits to the user's top-up bucket.
    pub async fn grant_top_up(&self, param: GrantCreditsParam) -> Result<CreditTransaction, AppError> {
        let txn = self.db.begin().await?;
        let transaction = Ledger::new(&txn)
            .add_top_up(param.user_id, param.amount, param.action)
            .await?;
        txn.commit().await?;

        Ok(transaction)
    }

    /// Sets the user's monthly bucket to `amount` and schedules the next refresh.
    pub async fn grant_monthly(
        &self,
        user_id: i32,
        amount: i64,
        reset_at: DateTime<Utc>,
    ) -> Result<CreditTransaction, AppError> {
        let txn = self.db.begin().await?;
        let transaction = Ledger::new(&txn)
            .set_monthly(user_id, amount, CreditAction::SubscriptionGrant)
            .await?;
        UserRepository::new(&txn)
            .set_monthly_reset_at(user_id, Some(reset_at))
            .await?;
        txn.commit().await?;

        Ok(transaction)
    }

    /// Gets a page of the user's ledger, newest first.
    pub async fn history(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<CreditHistory, AppError> {
        let (transactions, total) = CreditTransactionRepository::new(self.db)
            .get_paginated_by_user(user_id, page, per_page)
            .await?;

        let total_pages = (total as f64 / per_page as f64).ceil() as u64;

        Ok(CreditHistory {
            transactions,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Usage counters for `month` (`YYYY-MM`), defaulting to the current month.
    pub async fn usage(&self, user_id: i32, month: Option<String>) -> Result<UsageSummary, AppError> {
        let month = match month {
            Some(month) if is_month_key(&month) => month,
            Some(month) => {
                return Err(AppError::BadRequest(format!(
                    "Invalid month '{}', expected YYYY-MM",
                    month
                )))
            }
            None => month_key(Utc::now()),
        };

        let counters = UsageCounterRepository::new(self.db)
            .get_by_user_month(user_id, &month)
            .await?;

        Ok(UsageSummary { month, counters })
    }

    /// Earlier deduction made with the same idempotency key, if any.
    async fn find_replay(&self, param: &DeductCreditsParam) -> Result<Option<Deduction>, AppError> {
        let Some(key) = param.idempotency_key.as_deref() else {
            return Ok(None);
        };

        let existing = CreditTransactionRepository::new(self.db)
            .find_by_idempotency_key(param.user_id, key)
            .await?;

        Ok(existing.map(|transaction| Deduction {
            transaction,
            replayed: true,
        }))
    }
}

/// Loads a user and applies any due monthly refresh.
async fn refreshed_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let user = UserRepository::new(db)
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    MonthlyCredits::new(db).refresh(user, now).await
}
