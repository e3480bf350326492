//! LinkedIn publishing seam.

use async_trait::async_trait;
use reqwest::header::HeaderName;
use serde::Deserialize;
use serde_json::json;

use crate::server::{error::AppError, model::post::Visibility};

const RESTLI_PROTOCOL_VERSION: HeaderName = HeaderName::from_static("x-restli-protocol-version");
const RESTLI_ID: HeaderName = HeaderName::from_static("x-restli-id");

#[async_trait]
pub trait SocialPublisher: Send + Sync {
    /// Publishes a text share as `author_urn` and returns the created post id.
    async fn publish(
        &self,
        author_urn: &str,
        access_token: &str,
        content: &str,
        visibility: Visibility,
    ) -> Result<String, AppError>;
}

/// Client for LinkedIn's UGC posts API.
pub struct LinkedInClient {
    http_client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct UgcPostResponse {
    id: Option<String>,
}

impl LinkedInClient {
    pub fn new(http_client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http_client,
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl SocialPublisher for LinkedInClient {
    async fn publish(
        &self,
        author_urn: &str,
        access_token: &str,
        content: &str,
        visibility: Visibility,
    ) -> Result<String, AppError> {
        let url = format!("{}/v2/ugcPosts", self.api_base.trim_end_matches('/'));
        let body = json!({
            "author": author_urn,
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": content },
                    "shareMediaCategory": "NONE"
                }
            },
            "visibility": {
                "com.linkedin.ugc.MemberNetworkVisibility": visibility.as_str()
            }
        });

        let response = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .header(RESTLI_PROTOCOL_VERSION, "2.0.0")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: "LinkedIn",
                message: format!("post creation returned {}: {}", status, message),
            });
        }

        let header_id = response
            .headers()
            .get(RESTLI_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(id) = header_id {
            return Ok(id);
        }

        let created: UgcPostResponse = response.json().await?;
        created.id.ok_or_else(|| AppError::Upstream {
            service: "LinkedIn",
            message: "post created without an id".to_string(),
        })
    }
}
