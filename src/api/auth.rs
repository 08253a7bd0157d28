use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{decode_response, ApiError};
use super::types::{AuthRequest, AuthResponse, UserRecord};
use crate::app::ApiConfig;

/// Contract of the authentication endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Log in or register; returns the user record on success
    async fn authenticate(&self, request: &AuthRequest) -> Result<UserRecord, ApiError>;
}

/// `reqwest` client for the authentication endpoint
pub struct HttpAuthClient {
    client: Client,
    url: String,
}

impl HttpAuthClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            url: config.auth_url.clone(),
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn authenticate(&self, request: &AuthRequest) -> Result<UserRecord, ApiError> {
        debug!(action = ?request.action, email = %request.email, "auth request");

        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        match decode_response::<AuthResponse>(status, &body) {
            Ok(parsed) => Ok(parsed.user),
            Err(e) => {
                warn!(status, error = %e, "auth request rejected");
                Err(e)
            }
        }
    }
}
