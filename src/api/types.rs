use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;

pub type UserId = i64;

/// What a user is allowed to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Wire form of a user record. Older payloads carry only `is_admin`;
/// when both keys are present `role` wins.
#[derive(Deserialize)]
struct UserRecordRepr {
    id: UserId,
    email: String,
    full_name: String,
    #[serde(default)]
    avatar_initials: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    is_admin: Option<bool>,
}

impl From<UserRecordRepr> for UserRecord {
    fn from(repr: UserRecordRepr) -> Self {
        let role = match (repr.role, repr.is_admin) {
            (Some(role), _) => role,
            (None, Some(true)) => Role::Admin,
            (None, _) => Role::User,
        };
        Self {
            id: repr.id,
            email: repr.email,
            full_name: repr.full_name,
            avatar_initials: repr.avatar_initials.unwrap_or_default(),
            role,
        }
    }
}

/// Signed-in user as returned by the auth endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecordRepr")]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub avatar_initials: String,
    pub role: Role,
}

impl UserRecord {
    /// May this user open the moderation panel?
    pub fn can_moderate(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Parse the endpoint's timestamps: RFC 3339, naive ISO-8601, or null
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.naive_local()));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// A user as listed by the moderation endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModeratedUser {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar_initials: String,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub blocked_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub muted_until: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_seen: Option<NaiveDateTime>,
}

impl ModeratedUser {
    /// Actions that make sense for the user's current state
    pub fn available_actions(&self) -> Vec<ModerationAction> {
        use crate::constants::{MUTE_LONG_HOURS, MUTE_SHORT_HOURS};

        let mut actions = Vec::with_capacity(4);
        actions.push(if self.is_blocked {
            ModerationAction::Unblock
        } else {
            ModerationAction::Block
        });
        if self.is_muted {
            actions.push(ModerationAction::Unmute);
        } else {
            actions.push(ModerationAction::Mute {
                duration_hours: Some(MUTE_SHORT_HOURS),
            });
            actions.push(ModerationAction::Mute {
                duration_hours: Some(MUTE_LONG_HOURS),
            });
        }
        actions.push(ModerationAction::Delete);
        actions
    }
}

/// Format a timestamp the way the panel shows it (dd.mm.yyyy hh:mm)
pub fn format_timestamp(ts: Option<&NaiveDateTime>) -> String {
    ts.map(|t| t.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}

/// Moderation action accepted by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Block,
    Unblock,
    /// Without a duration the endpoint applies 24 hours
    Mute { duration_hours: Option<u32> },
    Unmute,
    Delete,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Unblock => "unblock",
            Self::Mute { .. } => "mute",
            Self::Unmute => "unmute",
            Self::Delete => "delete",
        }
    }

    /// Request body for the moderation endpoint
    pub fn to_body(&self, user_id: UserId) -> Value {
        let mut body = json!({
            "action": self.as_str(),
            "user_id": user_id,
        });
        if let Self::Mute {
            duration_hours: Some(hours),
        } = self
        {
            body["duration_hours"] = json!(hours);
        }
        body
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Delete)
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mute {
                duration_hours: Some(hours),
            } => write!(f, "mute {hours}h"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Login,
    Register,
}

/// Body of a login or register request
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    pub action: AuthAction,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl AuthRequest {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            action: AuthAction::Login,
            email: email.into(),
            password: password.into(),
            full_name: String::new(),
        }
    }

    pub fn register(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            action: AuthAction::Register,
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("action", &self.action)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    #[serde(default)]
    pub users: Vec<ModeratedUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
