use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::api::UserRecord;
use crate::app::get_config_dir;
use crate::chat::Section;
use crate::constants::SESSION_FILE;

/// Session state that persists between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<UserRecord>,
    pub last_section: Option<Section>,
}

/// Explicitly passed owner of the session, with load/save lifecycle
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
}

impl SessionStore {
    /// Default location of the session file
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join(SESSION_FILE))
    }

    /// Load the session at `path`. A missing or unreadable file gives an empty session.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match Self::read(&path) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {:#}", path.display(), e);
                SessionState::default()
            }
        };
        Self { path, state }
    }

    fn read(path: &Path) -> Result<SessionState> {
        if !path.exists() {
            return Ok(SessionState::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save session state to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.state)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;
        debug!("session saved to {}", self.path.display());
        Ok(())
    }

    /// Remember the signed-in user and persist
    pub fn sign_in(&mut self, user: UserRecord) -> Result<()> {
        self.state.user = Some(user);
        self.save()
    }

    /// Forget the user and remove the session file
    pub fn sign_out(&mut self) -> Result<()> {
        self.state = SessionState::default();
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }

    pub fn set_last_section(&mut self, section: Section) -> Result<()> {
        if self.state.last_section == Some(section) {
            return Ok(());
        }
        self.state.last_section = Some(section);
        self.save()
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.state.user.as_ref()
    }

    pub fn last_section(&self) -> Option<Section> {
        self.state.last_section
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn anna() -> UserRecord {
        UserRecord {
            id: 2,
            email: "anna@example.com".into(),
            full_name: "Anna Smirnova".into(),
            avatar_initials: "AS".into(),
            role: Role::User,
        }
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.toml"));
        assert!(store.user().is_none());
        assert!(store.last_section().is_none());
    }

    #[test]
    fn test_sign_in_persists_across_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        let mut store = SessionStore::open(&path);
        store.sign_in(anna()).unwrap();
        store.set_last_section(Section::Shop).unwrap();

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.user(), Some(&anna()));
        assert_eq!(reopened.last_section(), Some(Section::Shop));
    }

    #[test]
    fn test_sign_out_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");

        let mut store = SessionStore::open(&path);
        store.sign_in(anna()).unwrap();
        assert!(path.exists());

        store.sign_out().unwrap();
        assert!(store.user().is_none());
        assert!(!path.exists());

        // Signing out twice is fine
        store.sign_out().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "user = [[[ not toml").unwrap();

        let store = SessionStore::open(&path);
        assert!(store.user().is_none());
    }
}
