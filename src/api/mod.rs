// Gateway module for the remote endpoints - follows the Train Station Pattern
// All external access must go through this gateway

mod auth;
mod error;
mod moderation;
mod types;

pub use auth::{AuthApi, HttpAuthClient};
pub use error::{decode_response, ApiError};
pub use moderation::{HttpModerationClient, ModerationApi};
pub use types::{
    format_timestamp, AuthAction, AuthRequest, ModeratedUser, ModerationAction, Role, UserId,
    UserRecord,
};

#[cfg(test)]
pub use auth::MockAuthApi;
#[cfg(test)]
pub use moderation::MockModerationApi;
