use crate::server::error::{config::ConfigError, AppError};

const RAZORPAY_API_BASE: &str = "https://api.razorpay.com";
const LINKEDIN_API_BASE: &str = "https://api.linkedin.com";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_TRIAL_DAYS: i32 = 7;
const DEFAULT_TRIAL_CREDITS: i64 = 10;

/// Credentials for the payment gateway.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub api_base: String,
}

/// Trial window granted to every new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    pub days: i32,
    pub credits: i64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_TRIAL_DAYS,
            credits: DEFAULT_TRIAL_CREDITS,
        }
    }
}

pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub bind_address: String,
    pub allowed_origins: Vec<String>,

    pub razorpay: RazorpayConfig,
    pub linkedin_api_base: String,

    /// Shared secret of the auth backend that signs users in.
    pub auth_secret: String,
    pub cron_secret: String,
    pub scheduler_enabled: bool,
    pub trial: TrialConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            app_url: required("APP_URL")?,
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            allowed_origins: optional("ALLOWED_ORIGINS")
                .map(|origins| parse_list(&origins))
                .unwrap_or_default(),
            razorpay: RazorpayConfig {
                key_id: required("RAZORPAY_KEY_ID")?,
                key_secret: required("RAZORPAY_KEY_SECRET")?,
                webhook_secret: required("RAZORPAY_WEBHOOK_SECRET")?,
                api_base: RAZORPAY_API_BASE.to_string(),
            },
            linkedin_api_base: LINKEDIN_API_BASE.to_string(),
            auth_secret: required("AUTH_SECRET")?,
            cron_secret: required("CRON_SECRET")?,
            scheduler_enabled: parse_optional("SCHEDULER_ENABLED", parse_bool)?.unwrap_or(true),
            trial: TrialConfig {
                days: parse_optional("TRIAL_DAYS", |v| v.parse::<i32>().ok().filter(|d| *d >= 0))?
                    .unwrap_or(DEFAULT_TRIAL_DAYS),
                credits: parse_optional("TRIAL_CREDITS", |v| {
                    v.parse::<i64>().ok().filter(|c| *c >= 0)
                })?
                .unwrap_or(DEFAULT_TRIAL_CREDITS),
            },
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_optional<T>(
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = optional(name) else {
        return Ok(None);
    };

    match parse(value.trim()) {
        Some(parsed) => Ok(Some(parsed)),
        None => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
