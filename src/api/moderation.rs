use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::error::{decode_response, ApiError};
use super::types::{MessageResponse, ModeratedUser, ModerationAction, UserId, UsersResponse};
use crate::app::ApiConfig;
use crate::constants::ADMIN_ID_HEADER;

/// Contract of the user moderation endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationApi: Send + Sync {
    /// All moderatable users, newest first
    async fn list_users(&self, admin_id: UserId) -> Result<Vec<ModeratedUser>, ApiError>;

    /// Apply an action; returns the endpoint's confirmation message
    async fn apply(
        &self,
        admin_id: UserId,
        user_id: UserId,
        action: ModerationAction,
    ) -> Result<String, ApiError>;
}

/// `reqwest` client for the moderation endpoint
pub struct HttpModerationClient {
    client: Client,
    url: String,
}

impl HttpModerationClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            url: config.moderation_url.clone(),
        })
    }
}

#[async_trait]
impl ModerationApi for HttpModerationClient {
    async fn list_users(&self, admin_id: UserId) -> Result<Vec<ModeratedUser>, ApiError> {
        let response = self
            .client
            .get(&self.url)
            .header(ADMIN_ID_HEADER, admin_id.to_string())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let parsed: UsersResponse = decode_response(status, &body)?;
        debug!(count = parsed.users.len(), "loaded moderation list");
        Ok(parsed.users)
    }

    async fn apply(
        &self,
        admin_id: UserId,
        user_id: UserId,
        action: ModerationAction,
    ) -> Result<String, ApiError> {
        debug!(%action, user_id, "moderation request");

        let response = self
            .client
            .post(&self.url)
            .header(ADMIN_ID_HEADER, admin_id.to_string())
            .json(&action.to_body(user_id))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let parsed: MessageResponse = decode_response(status, &body)?;
        Ok(parsed.message)
    }
}
