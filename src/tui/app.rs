use ratatui::layout::Rect;
use std::sync::Arc;
use tracing::warn;

use super::input::PointerMapper;
use crate::admin::AdminPanel;
use crate::api::{
    ApiError, AuthApi, ModeratedUser, ModerationAction, ModerationApi, UserId, UserRecord,
};
use crate::app::Config;
use crate::auth::AuthForm;
use crate::chat::{sample_chats, sample_thread, ChatNavigator, Section};
use crate::gesture::haptics_for;
use crate::session::SessionStore;
use crate::shop::{catalog, Product};

/// Keyboard focus of the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating lists and tabs
    Normal,
    /// Typing a chat message
    Insert,
    /// Waiting for y/n on a destructive admin action
    Confirm,
}

/// Result of a request that ran in the background
#[derive(Debug)]
pub enum ApiEvent {
    Authenticated(Result<UserRecord, ApiError>),
    UsersLoaded(Result<Vec<ModeratedUser>, ApiError>),
    Moderated {
        user_id: UserId,
        action: ModerationAction,
        result: Result<String, ApiError>,
    },
}

/// Application state
pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub auth_api: Arc<dyn AuthApi>,
    pub moderation_api: Arc<dyn ModerationApi>,
    /// Login / register form, shown while signed out
    pub auth_form: AuthForm,
    /// Chat list, active conversation and swipe handling
    pub navigator: ChatNavigator,
    pub pointer: PointerMapper,
    pub section: Section,
    pub mode: InputMode,
    /// Highlighted row of the chat list
    pub list_cursor: usize,
    /// Message being typed
    pub input: String,
    pub products: Vec<Product>,
    pub shop_cursor: usize,
    /// Created on first visit to the Admin tab
    pub admin: Option<AdminPanel>,
    pub admin_needs_refresh: bool,
    /// User awaiting delete confirmation
    pub pending_delete: Option<UserId>,
    pub show_notification: bool,
    pub status_message: Option<String>,
    /// Where the conversation pane was last drawn, for mouse hit-testing
    pub conversation_area: Rect,
    pub running: bool,
}

impl App {
    /// Create a new app instance
    pub fn new(
        config: Config,
        session: SessionStore,
        auth_api: Arc<dyn AuthApi>,
        moderation_api: Arc<dyn ModerationApi>,
    ) -> Self {
        let navigator = ChatNavigator::new(
            sample_chats(),
            sample_thread(),
            &config.gesture,
            haptics_for(config.ui.haptics),
        );
        let pointer = PointerMapper::new(config.gesture.units_per_cell);
        let show_notification = config.ui.show_notifications;

        let mut app = Self {
            config,
            session,
            auth_api,
            moderation_api,
            auth_form: AuthForm::new(),
            navigator,
            pointer,
            section: Section::default(),
            mode: InputMode::Normal,
            list_cursor: 0,
            input: String::new(),
            products: catalog(),
            shop_cursor: 0,
            admin: None,
            admin_needs_refresh: false,
            pending_delete: None,
            show_notification,
            status_message: None,
            conversation_area: Rect::default(),
            running: true,
        };

        if let Some(section) = app.session.last_section() {
            app.switch_section(section);
        }
        app
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.session.user()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.user().is_some()
    }

    /// Open a tab. Tabs the user cannot see fall back to Chats.
    pub fn switch_section(&mut self, section: Section) {
        let Some(user) = self.session.user().cloned() else {
            return;
        };
        let section = if section.is_visible_for(&user) {
            section
        } else {
            Section::Chats
        };

        if section == Section::Admin && self.admin.is_none() {
            match AdminPanel::for_user(&user) {
                Ok(panel) => {
                    self.admin = Some(panel);
                    self.admin_needs_refresh = true;
                }
                Err(e) => {
                    self.set_status(e.to_string());
                    return;
                }
            }
        }

        self.section = section;
        self.mode = InputMode::Normal;
        if let Err(e) = self.session.set_last_section(section) {
            warn!("Could not persist section: {:#}", e);
        }
    }

    pub fn next_section(&mut self) {
        if let Some(user) = self.session.user() {
            let next = self.section.next(user);
            self.switch_section(next);
        }
    }

    pub fn previous_section(&mut self) {
        if let Some(user) = self.session.user() {
            let previous = self.section.previous(user);
            self.switch_section(previous);
        }
    }

    /// Called once the auth form succeeded
    pub fn on_signed_in(&mut self) {
        self.section = Section::default();
        let last = self.session.last_section().unwrap_or_default();
        self.switch_section(last);
        if let Some(user) = self.session.user() {
            let greeting = format!("Signed in as {}", user.full_name);
            self.set_status(greeting);
        }
    }

    /// Drop the session and every piece of per-user state
    pub fn logout(&mut self) {
        if let Err(e) = self.session.sign_out() {
            warn!("Could not remove session: {:#}", e);
        }
        self.admin = None;
        self.admin_needs_refresh = false;
        self.pending_delete = None;
        self.navigator.close();
        self.section = Section::default();
        self.mode = InputMode::Normal;
        self.input.clear();
        self.auth_form = AuthForm::new();
        self.set_status("Signed out");
    }

    pub fn cursor_down(&mut self) {
        match self.section {
            Section::Chats => {
                if self.list_cursor + 1 < self.navigator.chats().len() {
                    self.list_cursor += 1;
                }
            }
            Section::Shop => {
                if self.shop_cursor + 1 < self.products.len() {
                    self.shop_cursor += 1;
                }
            }
            Section::Admin => {
                if let Some(panel) = self.admin.as_mut() {
                    panel.select_next();
                }
            }
            _ => {}
        }
    }

    pub fn cursor_up(&mut self) {
        match self.section {
            Section::Chats => self.list_cursor = self.list_cursor.saturating_sub(1),
            Section::Shop => self.shop_cursor = self.shop_cursor.saturating_sub(1),
            Section::Admin => {
                if let Some(panel) = self.admin.as_mut() {
                    panel.select_previous();
                }
            }
            _ => {}
        }
    }

    /// Open the highlighted chat
    pub fn open_highlighted_chat(&mut self) {
        if let Some(id) = self.navigator.chats().get(self.list_cursor).map(|c| c.id) {
            self.navigator.select(id);
        }
    }

    /// Keep the list highlight on the open chat after swipes
    pub fn sync_cursor_to_active(&mut self) {
        if let Some(index) = self.navigator.active().and_then(|id| self.navigator.position_of(id)) {
            self.list_cursor = index;
        }
    }

    /// Send the typed message into the open chat
    pub fn send_input(&mut self) {
        if self.navigator.send_message(&self.input) {
            self.input.clear();
        }
    }

    /// Apply a finished background request. Answers that arrive after the
    /// screen moved on (sign-out, form reset) are dropped.
    pub fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Authenticated(result) => {
                if self.is_signed_in() || !self.auth_form.loading {
                    return;
                }
                if self.auth_form.finish(result, &mut self.session).is_some() {
                    self.on_signed_in();
                }
            }
            ApiEvent::UsersLoaded(result) => {
                if let Some(panel) = self.admin.as_mut() {
                    panel.finish_refresh(result);
                }
            }
            ApiEvent::Moderated {
                user_id,
                action,
                result,
            } => {
                let Some(panel) = self.admin.as_mut() else {
                    return;
                };
                let status = if panel.finish_apply(user_id, action, result) {
                    self.admin_needs_refresh = true;
                    panel
                        .last_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{action} applied"))
                } else {
                    format!(
                        "Could not {action}: {}",
                        panel.last_error().unwrap_or("unknown error")
                    )
                };
                self.set_status(status);
            }
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockAuthApi, MockModerationApi, Role};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app_with(role: Option<Role>, dir: &TempDir) -> App {
        let mut session = SessionStore::open(dir.path().join("session.toml"));
        if let Some(role) = role {
            session
                .sign_in(UserRecord {
                    id: 9,
                    email: "someone@example.com".into(),
                    full_name: "Someone".into(),
                    avatar_initials: "S".into(),
                    role,
                })
                .unwrap();
        }
        let mut config = Config::default();
        config.ui.haptics = false;
        App::new(
            config,
            session,
            Arc::new(MockAuthApi::new()),
            Arc::new(MockModerationApi::new()),
        )
    }

    #[test]
    fn test_admin_tab_refused_for_regular_user() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Some(Role::User), &dir);
        app.switch_section(Section::Admin);
        assert_eq!(app.section, Section::Chats);
        assert!(app.admin.is_none());
    }

    #[test]
    fn test_admin_tab_creates_panel_for_admin() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Some(Role::Admin), &dir);
        app.switch_section(Section::Admin);
        assert_eq!(app.section, Section::Admin);
        assert!(app.admin.is_some());
        assert!(app.admin_needs_refresh);
    }

    #[test]
    fn test_last_section_restored_on_start() {
        let dir = TempDir::new().unwrap();
        {
            let mut app = app_with(Some(Role::User), &dir);
            app.switch_section(Section::Shop);
        }
        let session = SessionStore::open(dir.path().join("session.toml"));
        let app = App::new(
            Config::default(),
            session,
            Arc::new(MockAuthApi::new()),
            Arc::new(MockModerationApi::new()),
        );
        assert_eq!(app.section, Section::Shop);
    }

    #[test]
    fn test_logout_resets_state() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Some(Role::Admin), &dir);
        app.switch_section(Section::Admin);
        app.navigator.select(2);

        app.logout();
        assert!(!app.is_signed_in());
        assert!(app.admin.is_none());
        assert_eq!(app.navigator.active(), None);
        assert_eq!(app.section, Section::Chats);
    }

    #[test]
    fn test_swipe_keeps_list_cursor_in_sync() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Some(Role::User), &dir);
        app.list_cursor = 2;
        app.open_highlighted_chat();
        assert_eq!(app.navigator.active(), Some(3));

        app.navigator.touch_start(400.0);
        app.navigator.touch_move(300.0);
        app.navigator.touch_end();
        app.sync_cursor_to_active();
        assert_eq!(app.list_cursor, 1);
    }

    #[test]
    fn test_signed_out_app_ignores_section_switch() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(None, &dir);
        app.switch_section(Section::Shop);
        assert_eq!(app.section, Section::Chats);
    }

    fn listed(id: UserId) -> ModeratedUser {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "email": format!("user{id}@example.com"),
            "full_name": format!("User {id}"),
        }))
        .unwrap()
    }

    #[test]
    fn test_sign_in_answer_completes_busy_form() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(None, &dir);
        app.auth_form.email = "someone@example.com".into();
        app.auth_form.password = "secret1".into();
        assert!(app.auth_form.begin().is_some());
        assert!(app.auth_form.loading);

        let user = UserRecord {
            id: 4,
            email: "someone@example.com".into(),
            full_name: "Someone".into(),
            avatar_initials: "S".into(),
            role: Role::User,
        };
        app.handle_api_event(ApiEvent::Authenticated(Ok(user)));
        assert!(app.is_signed_in());
        assert!(!app.auth_form.loading);
    }

    #[test]
    fn test_late_sign_in_answer_is_dropped() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(None, &dir);
        app.handle_api_event(ApiEvent::Authenticated(Err(ApiError::Decode("eof".into()))));
        assert!(app.auth_form.error.is_none());
        assert!(!app.is_signed_in());
    }

    #[test]
    fn test_moderation_answer_schedules_reload() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Some(Role::Admin), &dir);
        app.switch_section(Section::Admin);
        app.admin_needs_refresh = false;
        app.handle_api_event(ApiEvent::UsersLoaded(Ok(vec![listed(2)])));

        let panel = app.admin.as_mut().unwrap();
        assert!(!panel.is_loading());
        assert_eq!(panel.begin_apply(2), Some(9));

        app.handle_api_event(ApiEvent::Moderated {
            user_id: 2,
            action: ModerationAction::Block,
            result: Ok("User blocked".into()),
        });
        assert!(app.admin_needs_refresh);
        assert_eq!(app.admin.as_ref().unwrap().pending(), None);
        assert_eq!(app.status_message.as_deref(), Some("User blocked"));
    }

    #[test]
    fn test_failed_moderation_reports_and_keeps_list() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Some(Role::Admin), &dir);
        app.switch_section(Section::Admin);
        app.admin_needs_refresh = false;
        app.handle_api_event(ApiEvent::UsersLoaded(Ok(vec![listed(2)])));
        app.admin.as_mut().unwrap().begin_apply(2);

        app.handle_api_event(ApiEvent::Moderated {
            user_id: 2,
            action: ModerationAction::Delete,
            result: Err(ApiError::Rejected {
                status: 403,
                message: "Access denied".into(),
            }),
        });
        assert!(!app.admin_needs_refresh);
        assert_eq!(app.admin.as_ref().unwrap().users().len(), 1);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Could not delete: Access denied")
        );
    }
}
