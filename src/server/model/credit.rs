//! Credit ledger domain models.
//!
//! A user's spendable balance is split into two buckets: monthly credits granted by
//! a subscription and top-up credits bought outright. `CreditSplit::plan` is the only
//! place that decides how a debit is divided between them; every deduction path goes
//! through it.

use chrono::{DateTime, Duration, Utc};

use crate::{
    model::credit::{
        BalanceDto, CreditBalanceDto, CreditHistoryDto, CreditTransactionDto, TrialDto,
        UsageCounterDto, UsageDto,
    },
    server::{error::credit::CreditError, error::AppError, util::parse::parse_stored},
};

/// Everything that can move credits, recorded on each ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditAction {
    LinkedInPost,
    ScheduledPost,
    ContentGeneration,
    Refund,
    TrialGrant,
    TopUpPurchase,
    SubscriptionGrant,
    MonthlyExpiry,
    AdminGrant,
}

impl CreditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedInPost => "linkedin_post",
            Self::ScheduledPost => "scheduled_post",
            Self::ContentGeneration => "content_generation",
            Self::Refund => "refund",
            Self::TrialGrant => "trial_grant",
            Self::TopUpPurchase => "top_up_purchase",
            Self::SubscriptionGrant => "subscription_grant",
            Self::MonthlyExpiry => "monthly_expiry",
            Self::AdminGrant => "admin_grant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "linkedin_post" => Some(Self::LinkedInPost),
            "scheduled_post" => Some(Self::ScheduledPost),
            "content_generation" => Some(Self::ContentGeneration),
            "refund" => Some(Self::Refund),
            "trial_grant" => Some(Self::TrialGrant),
            "top_up_purchase" => Some(Self::TopUpPurchase),
            "subscription_grant" => Some(Self::SubscriptionGrant),
            "monthly_expiry" => Some(Self::MonthlyExpiry),
            "admin_grant" => Some(Self::AdminGrant),
            _ => None,
        }
    }

    /// Credits consumed by a user-initiated action, `None` for grants and reversals.
    pub fn cost(&self) -> Option<i64> {
        match self {
            Self::LinkedInPost | Self::ScheduledPost | Self::ContentGeneration => Some(1),
            _ => None,
        }
    }
}

/// Snapshot of both credit buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreditBalance {
    pub monthly: i64,
    pub top_up: i64,
}

impl CreditBalance {
    pub fn new(monthly: i64, top_up: i64) -> Self {
        Self { monthly, top_up }
    }

    pub fn available(&self) -> i64 {
        self.monthly + self.top_up
    }

    pub fn into_dto(self, monthly_resets_at: Option<DateTime<Utc>>) -> CreditBalanceDto {
        CreditBalanceDto {
            monthly: self.monthly,
            top_up: self.top_up,
            available: self.available(),
            monthly_resets_at,
        }
    }
}

/// How a debit is divided between the monthly and top-up buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditSplit {
    pub from_monthly: i64,
    pub from_top_up: i64,
}

impl CreditSplit {
    /// Plans a debit of `amount`, draining monthly credits before top-up credits.
    ///
    /// Negative buckets (which the ledger never produces) are treated as empty.
    ///
    /// # Returns
    /// - `Ok(CreditSplit)` - Amounts to take from each bucket, summing to `amount`
    /// - `Err(CreditError::InsufficientCredits)` - The combined balance is short
    pub fn plan(balance: CreditBalance, amount: i64) -> Result<Self, CreditError> {
        let monthly = balance.monthly.max(0);
        let top_up = balance.top_up.max(0);

        if monthly + top_up < amount {
            return Err(CreditError::InsufficientCredits {
                required: amount,
                available: monthly + top_up,
            });
        }

        let from_monthly = amount.min(monthly);
        Ok(Self {
            from_monthly,
            from_top_up: amount - from_monthly,
        })
    }

    pub fn total(&self) -> i64 {
        self.from_monthly + self.from_top_up
    }

    /// Balance after the debit has been taken.
    pub fn apply(&self, balance: CreditBalance) -> CreditBalance {
        CreditBalance {
            monthly: balance.monthly - self.from_monthly,
            top_up: balance.top_up - self.from_top_up,
        }
    }
}

/// Trial period starting at account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialWindow {
    pub started_at: DateTime<Utc>,
    pub days: i32,
}

impl TrialWindow {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::days(i64::from(self.days))
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at()
    }

    pub fn into_dto(self, now: DateTime<Utc>) -> TrialDto {
        TrialDto {
            started_at: self.started_at,
            ends_at: self.ends_at(),
            active: self.is_active(now),
        }
    }
}

/// Append-only ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditTransaction {
    pub id: i32,
    pub user_id: i32,
    pub action: CreditAction,
    pub delta: i64,
    pub monthly_delta: i64,
    pub top_up_delta: i64,
    pub balance_after: CreditBalance,
    pub idempotency_key: Option<String>,
    pub reverses_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl CreditTransaction {
    /// Whether this row took credits away from the user.
    pub fn is_deduction(&self) -> bool {
        self.delta < 0 && self.reverses_id.is_none()
    }

    pub fn into_dto(self) -> CreditTransactionDto {
        CreditTransactionDto {
            id: self.id,
            action: self.action.as_str().to_string(),
            delta: self.delta,
            monthly_delta: self.monthly_delta,
            top_up_delta: self.top_up_delta,
            balance_after: self.balance_after.into_dto(None),
            idempotency_key: self.idempotency_key,
            reverses_id: self.reverses_id,
            created_at: self.created_at,
        }
    }

    /// Converts an entity model to a ledger domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(CreditTransaction)` - The converted ledger row
    /// - `Err(AppError::InternalErr(UnknownEnumValue))` - Stored action is unknown
    pub fn from_entity(entity: entity::credit_transaction::Model) -> Result<Self, AppError> {
        let action = parse_stored("credit_transaction.action", &entity.action, CreditAction::parse)?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            action,
            delta: entity.delta,
            monthly_delta: entity.monthly_delta,
            top_up_delta: entity.top_up_delta,
            balance_after: CreditBalance::new(entity.monthly_after, entity.top_up_after),
            idempotency_key: entity.idempotency_key,
            reverses_id: entity.reverses_id,
            created_at: entity.created_at,
        })
    }
}

/// Ledger row to insert alongside a balance change.
#[derive(Debug, Clone)]
pub struct NewCreditTransaction {
    pub user_id: i32,
    pub action: CreditAction,
    pub monthly_delta: i64,
    pub top_up_delta: i64,
    pub balance_after: CreditBalance,
    pub idempotency_key: Option<String>,
    pub reverses_id: Option<i32>,
}

/// Prefix of the idempotency keys scheduled posts are charged under.
pub const SCHEDULED_POST_KEY_PREFIX: &str = "scheduled-post:";

/// Normalizes an idempotency key sent by a client.
///
/// Blank keys count as no key. Keys in the scheduled post namespace are refused so a
/// client cannot pre-empt the charge for a queued post.
///
/// # Returns
/// - `Ok(Option<String>)` - The trimmed key, if any
/// - `Err(AppError::BadRequest)` - Key uses a reserved prefix
pub fn client_idempotency_key(key: Option<String>) -> Result<Option<String>, AppError> {
    let Some(key) = key.map(|key| key.trim().to_string()).filter(|key| !key.is_empty()) else {
        return Ok(None);
    };

    if key.starts_with(SCHEDULED_POST_KEY_PREFIX) {
        return Err(AppError::BadRequest(format!(
            "Idempotency keys starting with '{}' are reserved",
            SCHEDULED_POST_KEY_PREFIX
        )));
    }

    Ok(Some(key))
}

/// Parameters for a user-initiated deduction.
#[derive(Debug, Clone)]
pub struct DeductCreditsParam {
    pub user_id: i32,
    pub action: CreditAction,
    pub idempotency_key: Option<String>,
}

/// Result of a deduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub transaction: CreditTransaction,
    /// True when the idempotency key matched an earlier deduction and nothing changed.
    pub replayed: bool,
}

/// Parameters for adding credits to the top-up bucket.
#[derive(Debug, Clone)]
pub struct GrantCreditsParam {
    pub user_id: i32,
    pub amount: i64,
    pub action: CreditAction,
}

/// Balance with the context needed to decide whether the user may spend it.
#[derive(Debug, Clone)]
pub struct BalanceSummary {
    pub balance: CreditBalance,
    pub monthly_resets_at: Option<DateTime<Utc>>,
    pub trial: TrialWindow,
    pub has_active_subscription: bool,
}

impl BalanceSummary {
    pub fn into_dto(self, now: DateTime<Utc>) -> BalanceDto {
        BalanceDto {
            balance: self.balance.into_dto(self.monthly_resets_at),
            trial: self.trial.into_dto(now),
            has_active_subscription: self.has_active_subscription,
        }
    }
}

/// Page of ledger rows, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditHistory {
    pub transactions: Vec<CreditTransaction>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl CreditHistory {
    pub fn into_dto(self) -> CreditHistoryDto {
        CreditHistoryDto {
            transactions: self.transactions.into_iter().map(|t| t.into_dto()).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// Usage counters for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSummary {
    pub month: String,
    pub counters: Vec<(String, i64)>,
}

impl UsageSummary {
    pub fn into_dto(self) -> UsageDto {
        UsageDto {
            month: self.month,
            counters: self
                .counters
                .into_iter()
                .map(|(action, count)| UsageCounterDto { action, count })
                .collect(),
        }
    }
}
