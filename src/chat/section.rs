use serde::{Deserialize, Serialize};

use crate::api::UserRecord;

/// Tabs of the main screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Home,
    #[default]
    Chats,
    Shop,
    Profile,
    Settings,
    Support,
    Admin,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Self::Home,
        Self::Chats,
        Self::Shop,
        Self::Profile,
        Self::Settings,
        Self::Support,
        Self::Admin,
    ];

    /// Tabs shown to this user; Admin needs the moderation capability
    pub fn visible_for(user: &UserRecord) -> Vec<Section> {
        Self::ALL
            .into_iter()
            .filter(|s| *s != Self::Admin || user.can_moderate())
            .collect()
    }

    pub fn is_visible_for(&self, user: &UserRecord) -> bool {
        *self != Self::Admin || user.can_moderate()
    }

    /// Next visible tab, wrapping around
    pub fn next(&self, user: &UserRecord) -> Self {
        self.step(user, 1)
    }

    /// Previous visible tab, wrapping around
    pub fn previous(&self, user: &UserRecord) -> Self {
        self.step(user, -1)
    }

    fn step(&self, user: &UserRecord, delta: isize) -> Self {
        let visible = Self::visible_for(user);
        let len = visible.len() as isize;
        let current = visible.iter().position(|s| s == self).unwrap_or(0) as isize;
        visible[(current + delta).rem_euclid(len) as usize]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Chats => "Chats",
            Self::Shop => "Shop",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
            Self::Support => "Support",
            Self::Admin => "Admin",
        }
    }

    /// Tagline for the placeholder sections
    pub fn tagline(&self) -> &'static str {
        match self {
            Self::Home => "Welcome to your chat hub",
            Self::Chats => "Pick a chat to start talking",
            Self::Shop => "Goods and services",
            Self::Profile => "Your account",
            Self::Settings => "Tune the app to your liking",
            Self::Support => "We are always ready to help",
            Self::Admin => "User management",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;

    fn user(role: Role) -> UserRecord {
        UserRecord {
            id: 10,
            email: "u@example.com".into(),
            full_name: "U".into(),
            avatar_initials: "U".into(),
            role,
        }
    }

    #[test]
    fn test_admin_tab_is_capability_gated() {
        assert!(!Section::visible_for(&user(Role::User)).contains(&Section::Admin));
        assert!(Section::visible_for(&user(Role::Admin)).contains(&Section::Admin));
        assert!(!Section::Admin.is_visible_for(&user(Role::User)));
    }

    #[test]
    fn test_cycling_wraps_over_visible_tabs() {
        let regular = user(Role::User);
        assert_eq!(Section::Support.next(&regular), Section::Home);
        assert_eq!(Section::Home.previous(&regular), Section::Support);

        let admin = user(Role::Admin);
        assert_eq!(Section::Support.next(&admin), Section::Admin);
        assert_eq!(Section::Admin.next(&admin), Section::Home);
    }
}
