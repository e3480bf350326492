//! Post content rules shared by immediate and scheduled publishing.

use crate::{
    model::post::PublishedPostDto,
    server::{error::AppError, model::credit::CreditBalance},
};

/// LinkedIn's limit on share commentary length.
pub const MAX_POST_CHARS: usize = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Connections,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Connections => "CONNECTIONS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "PUBLIC" => Some(Self::Public),
            "CONNECTIONS" => Some(Self::Connections),
            _ => None,
        }
    }

    /// Parses an optional request field, defaulting to public.
    pub fn from_request(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(Self::default()),
            Some(value) => Self::parse(value).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Unknown visibility '{}', expected PUBLIC or CONNECTIONS",
                    value
                ))
            }),
        }
    }
}

/// Checks that post content is non-empty and within LinkedIn's length limit.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Post content cannot be empty".to_string()));
    }
    let chars = content.chars().count();
    if chars > MAX_POST_CHARS {
        return Err(AppError::BadRequest(format!(
            "Post content is {} characters, the limit is {}",
            chars, MAX_POST_CHARS
        )));
    }
    Ok(())
}

/// Parameters for publishing immediately.
#[derive(Debug, Clone)]
pub struct PublishPostParam {
    pub user_id: i32,
    pub content: String,
    pub visibility: Visibility,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPost {
    pub linkedin_post_id: String,
    pub credit_transaction_id: i32,
    pub balance: CreditBalance,
}

impl PublishedPost {
    pub fn into_dto(self) -> PublishedPostDto {
        PublishedPostDto {
            linkedin_post_id: self.linkedin_post_id,
            credit_transaction_id: self.credit_transaction_id,
            balance: self.balance.into_dto(None),
        }
    }
}
