use tracing::{info, warn};

use crate::api::{ApiError, AuthApi, AuthRequest, UserRecord};
use crate::constants::MIN_PASSWORD_LEN;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Which input has focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthField {
    FullName,
    #[default]
    Email,
    Password,
}

/// Login / register form state
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub focus: AuthField,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch between login and register; clears the error
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
        if self.mode == AuthMode::Login && self.focus == AuthField::FullName {
            self.focus = AuthField::Email;
        }
    }

    fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Register => &[AuthField::FullName, AuthField::Email, AuthField::Password],
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + 1) % fields.len()];
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::FullName => &mut self.full_name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    /// Client-side checks run before any request is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Email and password are required".to_string());
        }
        if self.mode == AuthMode::Register && self.full_name.trim().is_empty() {
            return Err("All fields are required".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        Ok(())
    }

    pub fn request(&self) -> AuthRequest {
        match self.mode {
            AuthMode::Login => AuthRequest::login(self.email.trim(), self.password.clone()),
            AuthMode::Register => AuthRequest::register(
                self.email.trim(),
                self.password.clone(),
                self.full_name.trim(),
            ),
        }
    }

    /// Validate and mark the form busy. Returns the request to send, or
    /// `None` with `self.error` set when the input is rejected.
    pub fn begin(&mut self) -> Option<AuthRequest> {
        self.error = None;
        if let Err(message) = self.validate() {
            self.error = Some(message);
            return None;
        }
        self.loading = true;
        Some(self.request())
    }

    /// Apply the endpoint's answer; a success signs the session in
    pub fn finish(
        &mut self,
        result: Result<UserRecord, ApiError>,
        session: &mut SessionStore,
    ) -> Option<UserRecord> {
        self.loading = false;
        match result {
            Ok(user) => {
                info!(user_id = user.id, "signed in as {}", user.email);
                if let Err(e) = session.sign_in(user.clone()) {
                    warn!("Signed in but could not save the session: {:#}", e);
                }
                self.password.clear();
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "authentication failed");
                self.error = Some(e.user_message());
                None
            }
        }
    }

    /// Validate, call the endpoint and sign in on success. Failures end up in
    /// `self.error` and return `None`.
    pub async fn submit(
        &mut self,
        api: &dyn AuthApi,
        session: &mut SessionStore,
    ) -> Option<UserRecord> {
        let request = self.begin()?;
        let result = api.authenticate(&request).await;
        self.finish(result, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthAction, MockAuthApi, Role};
    use tempfile::TempDir;

    fn user() -> UserRecord {
        UserRecord {
            id: 2,
            email: "anna@example.com".into(),
            full_name: "Anna Smirnova".into(),
            avatar_initials: "AS".into(),
            role: Role::User,
        }
    }

    fn filled_login() -> AuthForm {
        AuthForm {
            email: " anna@example.com ".into(),
            password: "secret1".into(),
            ..AuthForm::new()
        }
    }

    #[test]
    fn test_validation_rules() {
        let mut form = AuthForm::new();
        assert!(form.validate().is_err());

        form.email = "a@b.c".into();
        form.password = "12345".into();
        assert!(form.validate().unwrap_err().contains("at least 6"));

        form.password = "123456".into();
        assert!(form.validate().is_ok());

        form.toggle_mode();
        assert_eq!(form.validate().unwrap_err(), "All fields are required");
        form.full_name = "Anna".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_toggle_clears_error_and_focus_cycles() {
        let mut form = AuthForm::new();
        form.error = Some("old".into());
        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::Register);
        assert!(form.error.is_none());

        form.focus = AuthField::FullName;
        form.focus_next();
        assert_eq!(form.focus, AuthField::Email);
        form.focus_next();
        assert_eq!(form.focus, AuthField::Password);
        form.focus_next();
        assert_eq!(form.focus, AuthField::FullName);

        form.toggle_mode();
        assert_eq!(form.focus, AuthField::Email);
    }

    #[tokio::test]
    async fn test_submit_success_signs_in() {
        let dir = TempDir::new().unwrap();
        let mut session = SessionStore::open(dir.path().join("session.toml"));

        let mut api = MockAuthApi::new();
        api.expect_authenticate()
            .withf(|req| req.action == AuthAction::Login && req.email == "anna@example.com")
            .times(1)
            .returning(|_| Ok(user()));

        let mut form = filled_login();
        let signed_in = form.submit(&api, &mut session).await;

        assert_eq!(signed_in, Some(user()));
        assert_eq!(session.user(), Some(&user()));
        assert!(form.error.is_none());
        assert!(form.password.is_empty());
        assert!(!form.loading);
    }

    #[tokio::test]
    async fn test_submit_failure_shows_inline_message() {
        let dir = TempDir::new().unwrap();
        let mut session = SessionStore::open(dir.path().join("session.toml"));

        let mut api = MockAuthApi::new();
        api.expect_authenticate().times(1).returning(|_| {
            Err(ApiError::Rejected {
                status: 403,
                message: "Your account has been blocked by an administrator".into(),
            })
        });

        let mut form = filled_login();
        assert!(form.submit(&api, &mut session).await.is_none());
        assert_eq!(
            form.error.as_deref(),
            Some("Your account has been blocked by an administrator")
        );
        assert!(session.user().is_none());
        assert_eq!(form.password, "secret1");
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_endpoint() {
        let dir = TempDir::new().unwrap();
        let mut session = SessionStore::open(dir.path().join("session.toml"));

        let mut api = MockAuthApi::new();
        api.expect_authenticate().never();

        let mut form = AuthForm::new();
        form.toggle_mode();
        form.email = "new@example.com".into();
        form.password = "secret1".into();

        assert!(form.submit(&api, &mut session).await.is_none());
        assert_eq!(form.error.as_deref(), Some("All fields are required"));
    }

    #[test]
    fn test_form_stays_busy_until_answer_arrives() {
        let dir = TempDir::new().unwrap();
        let mut session = SessionStore::open(dir.path().join("session.toml"));

        let mut form = filled_login();
        let request = form.begin().unwrap();
        assert_eq!(request.email, "anna@example.com");
        assert!(form.loading);

        assert_eq!(form.finish(Ok(user()), &mut session), Some(user()));
        assert!(!form.loading);
        assert_eq!(session.user(), Some(&user()));
    }

    #[test]
    fn test_rejected_input_never_goes_busy() {
        let mut form = AuthForm::new();
        assert!(form.begin().is_none());
        assert!(!form.loading);
        assert!(form.error.is_some());
    }
}
