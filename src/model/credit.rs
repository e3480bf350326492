use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct CreditBalanceDto {
    pub monthly: i64,
    pub top_up: i64,
    pub available: i64,
    pub monthly_resets_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct TrialDto {
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct BalanceDto {
    pub balance: CreditBalanceDto,
    pub trial: TrialDto,
    pub has_active_subscription: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct DeductCreditsDto {
    /// One of `linkedin_post`, `scheduled_post` or `content_generation`.
    pub action: String,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreditTransactionDto {
    pub id: i32,
    pub action: String,
    pub delta: i64,
    pub monthly_delta: i64,
    pub top_up_delta: i64,
    pub balance_after: CreditBalanceDto,
    pub idempotency_key: Option<String>,
    pub reverses_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreditHistoryDto {
    pub transactions: Vec<CreditTransactionDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsageQuery {
    /// Month in `YYYY-MM` form, defaults to the current month.
    pub month: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UsageCounterDto {
    pub action: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UsageDto {
    pub month: String,
    pub counters: Vec<UsageCounterDto>,
}
