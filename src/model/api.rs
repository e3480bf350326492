use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

/// Zero-indexed page query shared by every paginated listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParam {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

const MAX_PER_PAGE: u64 = 100;

impl PaginationParam {
    /// Page size clamped to `1..=100`.
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}
