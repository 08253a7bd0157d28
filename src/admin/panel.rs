use tracing::{error, info};

use crate::api::{
    ApiError, ModeratedUser, ModerationAction, ModerationApi, UserId, UserRecord,
};
use crate::utils::MessengerError;

/// Moderation list state for one admin
#[derive(Debug)]
pub struct AdminPanel {
    admin_id: UserId,
    users: Vec<ModeratedUser>,
    loading: bool,
    pending: Option<UserId>,
    cursor: usize,
    last_error: Option<String>,
    last_message: Option<String>,
}

impl AdminPanel {
    /// Only users with the moderation capability get a panel
    pub fn for_user(user: &UserRecord) -> Result<Self, MessengerError> {
        if !user.can_moderate() {
            return Err(MessengerError::PermissionDenied(format!(
                "{} is not an administrator",
                user.email
            )));
        }
        Ok(Self {
            admin_id: user.id,
            users: Vec::new(),
            loading: true,
            pending: None,
            cursor: 0,
            last_error: None,
            last_message: None,
        })
    }

    /// Mark the list as loading; returns the admin id to send
    pub fn begin_refresh(&mut self) -> UserId {
        self.loading = true;
        self.admin_id
    }

    /// Apply a list response. On failure the previous list stays.
    pub fn finish_refresh(&mut self, result: Result<Vec<ModeratedUser>, ApiError>) -> bool {
        self.loading = false;
        match result {
            Ok(users) => {
                self.users = users;
                self.cursor = self.cursor.min(self.users.len().saturating_sub(1));
                self.last_error = None;
                true
            }
            Err(e) => {
                error!(error = %e, "failed to load users");
                self.last_error = Some(e.user_message());
                false
            }
        }
    }

    /// Reload the list
    pub async fn refresh(&mut self, api: &dyn ModerationApi) -> bool {
        let admin_id = self.begin_refresh();
        let result = api.list_users(admin_id).await;
        self.finish_refresh(result)
    }

    /// Mark `user_id` as pending. Returns the admin id to send, or `None`
    /// while another action is still in flight.
    pub fn begin_apply(&mut self, user_id: UserId) -> Option<UserId> {
        if self.pending.is_some() {
            return None;
        }
        self.pending = Some(user_id);
        Some(self.admin_id)
    }

    /// Apply an action response. On failure nothing in the list changes;
    /// on success the caller reloads the list.
    pub fn finish_apply(
        &mut self,
        user_id: UserId,
        action: ModerationAction,
        result: Result<String, ApiError>,
    ) -> bool {
        self.pending = None;
        match result {
            Ok(message) => {
                info!(%action, user_id, "{}", message);
                self.last_message = Some(message);
                self.last_error = None;
                true
            }
            Err(e) => {
                error!(error = %e, %action, user_id, "moderation action failed");
                self.last_error = Some(e.user_message());
                false
            }
        }
    }

    /// Send an action and reload on success
    pub async fn apply(
        &mut self,
        api: &dyn ModerationApi,
        user_id: UserId,
        action: ModerationAction,
    ) -> bool {
        let Some(admin_id) = self.begin_apply(user_id) else {
            return false;
        };
        let result = api.apply(admin_id, user_id, action).await;
        let ok = self.finish_apply(user_id, action, result);
        if ok {
            self.refresh(api).await;
        }
        ok
    }

    pub fn users(&self) -> &[ModeratedUser] {
        &self.users
    }

    pub fn selected(&self) -> Option<&ModeratedUser> {
        self.users.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.users.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending(&self) -> Option<UserId> {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockModerationApi, Role};
    use mockall::Sequence;

    fn admin() -> UserRecord {
        UserRecord {
            id: 1,
            email: "admin".into(),
            full_name: "Administrator".into(),
            avatar_initials: "AD".into(),
            role: Role::Admin,
        }
    }

    fn listed(id: UserId, blocked: bool) -> ModeratedUser {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "email": format!("user{id}@example.com"),
            "full_name": format!("User {id}"),
            "is_blocked": blocked,
        }))
        .unwrap()
    }

    #[test]
    fn test_regular_user_gets_no_panel() {
        let mut user = admin();
        user.role = Role::User;
        assert!(matches!(
            AdminPanel::for_user(&user),
            Err(MessengerError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_loads_users() {
        let mut api = MockModerationApi::new();
        api.expect_list_users()
            .withf(|admin_id| *admin_id == 1)
            .times(1)
            .returning(|_| Ok(vec![listed(2, false), listed(3, true)]));

        let mut panel = AdminPanel::for_user(&admin()).unwrap();
        assert!(panel.is_loading());
        assert!(panel.refresh(&api).await);
        assert!(!panel.is_loading());
        assert_eq!(panel.users().len(), 2);

        panel.select_next();
        panel.select_next();
        assert_eq!(panel.selected().map(|u| u.id), Some(3));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let mut seq = Sequence::new();
        let mut api = MockModerationApi::new();
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![listed(2, false)]));
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ApiError::Decode("eof".into())));

        let mut panel = AdminPanel::for_user(&admin()).unwrap();
        panel.refresh(&api).await;
        assert!(!panel.refresh(&api).await);
        assert_eq!(panel.users().len(), 1);
        assert!(panel.last_error().is_some());
    }

    #[tokio::test]
    async fn test_successful_action_refreshes() {
        let mut seq = Sequence::new();
        let mut api = MockModerationApi::new();
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![listed(2, false)]));
        api.expect_apply()
            .withf(|admin_id, user_id, action| {
                *admin_id == 1 && *user_id == 2 && *action == ModerationAction::Block
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("User blocked".into()));
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![listed(2, true)]));

        let mut panel = AdminPanel::for_user(&admin()).unwrap();
        panel.refresh(&api).await;
        assert!(panel.apply(&api, 2, ModerationAction::Block).await);

        assert!(panel.users()[0].is_blocked);
        assert_eq!(panel.last_message(), Some("User blocked"));
        assert_eq!(panel.pending(), None);
    }

    #[tokio::test]
    async fn test_failed_action_leaves_user_unchanged() {
        let mut api = MockModerationApi::new();
        api.expect_list_users()
            .times(1)
            .returning(|_| Ok(vec![listed(2, false)]));
        api.expect_apply().times(1).returning(|_, _, _| {
            Err(ApiError::Rejected {
                status: 403,
                message: "Access denied".into(),
            })
        });

        let mut panel = AdminPanel::for_user(&admin()).unwrap();
        panel.refresh(&api).await;
        let mute = ModerationAction::Mute {
            duration_hours: Some(24),
        };
        assert!(!panel.apply(&api, 2, mute).await);

        assert!(!panel.users()[0].is_muted);
        assert_eq!(panel.last_error(), Some("Access denied"));
        assert_eq!(panel.pending(), None);
    }

    #[test]
    fn test_one_action_in_flight_at_a_time() {
        let mut panel = AdminPanel::for_user(&admin()).unwrap();
        panel.finish_refresh(Ok(vec![listed(2, false), listed(3, false)]));

        assert_eq!(panel.begin_apply(2), Some(1));
        assert_eq!(panel.pending(), Some(2));
        assert_eq!(panel.begin_apply(3), None);
        assert_eq!(panel.pending(), Some(2));

        assert!(panel.finish_apply(2, ModerationAction::Block, Ok("User blocked".into())));
        assert_eq!(panel.pending(), None);
        assert_eq!(panel.begin_apply(3), Some(1));
    }

    #[test]
    fn test_loading_flag_spans_the_request() {
        let mut panel = AdminPanel::for_user(&admin()).unwrap();
        panel.finish_refresh(Ok(vec![listed(2, false)]));
        assert!(!panel.is_loading());

        assert_eq!(panel.begin_refresh(), 1);
        assert!(panel.is_loading());
        assert!(!panel.finish_refresh(Err(ApiError::Decode("eof".into()))));
        assert!(!panel.is_loading());
        assert_eq!(panel.users().len(), 1);
    }
}
