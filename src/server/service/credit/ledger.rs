//! Balance mutations paired with their ledger rows.
//!
//! Every change to a user's credit buckets goes through `Ledger`. Each write reads the
//! current balance, computes the new one, swaps it in with a compare-and-swap update and
//! appends a `CreditTransaction` describing the change. Callers run the ledger inside a
//! database transaction so the swap and the row commit together.

use std::time::Duration;

use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        credit_transaction::CreditTransactionRepository, is_unique_violation,
        user::UserRepository,
    },
    error::{credit::CreditError, AppError},
    model::credit::{CreditAction, CreditBalance, CreditSplit, CreditTransaction, NewCreditTransaction},
};

/// Maximum compare-and-swap attempts before a write is reported as contended.
pub const MAX_CREDIT_RETRIES: u32 = 5;

/// Base delay for exponential backoff between attempts (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 50;

/// Ledger row metadata that does not depend on the balance.
struct Entry {
    user_id: i32,
    action: CreditAction,
    idempotency_key: Option<String>,
    reverses_id: Option<i32>,
}

pub struct Ledger<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> Ledger<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Takes `amount` credits, monthly bucket first.
    ///
    /// # Returns
    /// - `Ok(CreditTransaction)` - The deduction row with negative deltas
    /// - `Err(CreditError::InsufficientCredits)` - Combined balance is short
    /// - `Err(AppError::DbErr)` - A unique violation means `idempotency_key` was used
    pub async fn debit(
        &self,
        user_id: i32,
        action: CreditAction,
        amount: i64,
        idempotency_key: Option<String>,
    ) -> Result<CreditTransaction, AppError> {
        let entry = Entry {
            user_id,
            action,
            idempotency_key,
            reverses_id: None,
        };

        self.apply(entry, |balance| {
            let split = CreditSplit::plan(balance, amount)?;
            Ok(split.apply(balance))
        })
        .await
    }

    /// Adds `amount` credits to the top-up bucket.
    pub async fn add_top_up(
        &self,
        user_id: i32,
        amount: i64,
        action: CreditAction,
    ) -> Result<CreditTransaction, AppError> {
        if amount <= 0 {
            return Err(AppError::BadRequest(
                "Credit grant must be a positive amount".to_string(),
            ));
        }

        let entry = Entry {
            user_id,
            action,
            idempotency_key: None,
            reverses_id: None,
        };

        self.apply(entry, |balance| {
            Ok(CreditBalance::new(balance.monthly, balance.top_up + amount))
        })
        .await
    }

    /// Replaces the monthly bucket with `amount`; monthly credits do not roll over.
    ///
    /// The ledger row records the difference from the previous monthly balance.
    pub async fn set_monthly(
        &self,
        user_id: i32,
        amount: i64,
        action: CreditAction,
    ) -> Result<CreditTransaction, AppError> {
        if amount < 0 {
            return Err(AppError::BadRequest(
                "Monthly credits cannot be negative".to_string(),
            ));
        }

        let entry = Entry {
            user_id,
            action,
            idempotency_key: None,
            reverses_id: None,
        };

        self.apply(entry, |balance| Ok(CreditBalance::new(amount, balance.top_up)))
            .await
    }

    /// Returns a deduction's credits to the buckets they were taken from.
    ///
    /// Monthly credits go back to the monthly bucket only while the user still has a
    /// reset date. Once the monthly bucket has expired they land in top-up instead.
    ///
    /// # Returns
    /// - `Ok(CreditTransaction)` - The refund row, with `reverses_id` set
    /// - `Err(CreditError::NotRefundable)` - `original` is not a deduction
    /// - `Err(CreditError::AlreadyRefunded)` - A refund for `original` exists
    pub async fn reverse(&self, original: &CreditTransaction) -> Result<CreditTransaction, AppError> {
        if !original.is_deduction() {
            return Err(CreditError::NotRefundable(original.id).into());
        }

        let tx_repo = CreditTransactionRepository::new(self.db);
        if tx_repo.find_reversal_of(original.id).await?.is_some() {
            return Err(CreditError::AlreadyRefunded(original.id).into());
        }

        let entry = Entry {
            user_id: original.user_id,
            action: CreditAction::Refund,
            idempotency_key: None,
            reverses_id: Some(original.id),
        };
        let user = UserRepository::new(self.db)
            .find_by_id(original.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", original.user_id)))?;

        // Without a reset date nothing would ever expire the monthly bucket again.
        let (monthly_refund, top_up_refund) = if user.monthly_credits_reset_at.is_some() {
            (-original.monthly_delta, -original.top_up_delta)
        } else {
            (0, -original.monthly_delta - original.top_up_delta)
        };

        let result = self
            .apply(entry, |balance| {
                Ok(CreditBalance::new(
                    balance.monthly + monthly_refund,
                    balance.top_up + top_up_refund,
                ))
            })
            .await;

        match result {
            Err(AppError::DbErr(ref err)) if is_unique_violation(err) => {
                Err(CreditError::AlreadyRefunded(original.id).into())
            }
            other => other,
        }
    }

    /// Swaps in the balance produced by `change` and appends the ledger row.
    ///
    /// Re-reads and retries with exponential backoff when another writer changed the
    /// balance between the read and the swap.
    async fn apply<F>(&self, entry: Entry, change: F) -> Result<CreditTransaction, AppError>
    where
        F: Fn(CreditBalance) -> Result<CreditBalance, CreditError>,
    {
        let user_repo = UserRepository::new(self.db);

        for attempt in 0..MAX_CREDIT_RETRIES {
            let user = user_repo
                .find_by_id(entry.user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", entry.user_id)))?;

            let current = user.balance;
            let next = change(current)?;

            if user_repo
                .compare_and_set_credits(entry.user_id, current, next)
                .await?
            {
                let transaction = CreditTransactionRepository::new(self.db)
                    .create(NewCreditTransaction {
                        user_id: entry.user_id,
                        action: entry.action,
                        monthly_delta: next.monthly - current.monthly,
                        top_up_delta: next.top_up - current.top_up,
                        balance_after: next,
                        idempotency_key: entry.idempotency_key,
                        reverses_id: entry.reverses_id,
                    })
                    .await?;

                tracing::debug!(
                    user_id = entry.user_id,
                    action = entry.action.as_str(),
                    delta = transaction.delta,
                    available = next.available(),
                    "Credit balance updated"
                );

                return Ok(transaction);
            }

            tracing::debug!(
                user_id = entry.user_id,
                attempt = attempt + 1,
                "Credit balance changed concurrently, retrying"
            );
            let delay = Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt));
            tokio::time::sleep(delay).await;
        }

        tracing::warn!(
            user_id = entry.user_id,
            retries = MAX_CREDIT_RETRIES,
            action = entry.action.as_str(),
            "Credit update failed after retries"
        );

        Err(CreditError::Contention(entry.user_id).into())
    }
}
