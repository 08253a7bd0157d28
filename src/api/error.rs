use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::GENERIC_ERROR_MESSAGE;

/// Failures talking to the remote endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for showing inline next to a form
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turn a status code and body into the expected payload or an `ApiError`
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()));
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

    Err(ApiError::Rejected { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AuthResponse, MessageResponse};

    #[test]
    fn test_success_body_is_decoded() {
        let body = r#"{"message": "Logged in", "user": {"id": 2, "email": "a@b.c", "full_name": "Anna Smirnova", "avatar_initials": "AS"}}"#;
        let response: AuthResponse = decode_response(200, body).unwrap();
        assert_eq!(response.user.id, 2);
        assert_eq!(response.user.avatar_initials, "AS");
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let err = decode_response::<AuthResponse>(401, r#"{"error": "Invalid email or password"}"#)
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let err = decode_response::<MessageResponse>(500, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = decode_response::<MessageResponse>(400, r#"{"error": ""}"#).unwrap_err();
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_malformed_success_is_decode_error() {
        let err = decode_response::<AuthResponse>(201, r#"{"message": "ok"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
