//! Durable storage for the session credential and identity.
//!
//! Two files under the session directory: `credential` holds the raw token,
//! `profile.json` the serialized identity. A session is only restorable when
//! both halves are present and parseable.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use skywatch_api::UserProfile;

const CREDENTIAL_FILE: &str = "credential";
const PROFILE_FILE: &str = "profile.json";

pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Storage rooted at `dir` (created on first write).
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn credential_path(&self) -> PathBuf {
        self.dir.join(CREDENTIAL_FILE)
    }

    fn profile_path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    /// Persist both halves of the session.
    pub fn store(&self, token: &str, profile: &UserProfile) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create session directory")?;

        fs::write(self.credential_path(), token).context("Failed to write credential file")?;

        let json =
            serde_json::to_string_pretty(profile).context("Failed to serialize profile")?;
        fs::write(self.profile_path(), json).context("Failed to write profile file")?;

        tracing::info!("Stored session for user: {}", profile.username);
        Ok(())
    }

    /// Read back a stored session. Returns `None` unless both the credential
    /// and the profile are present and valid.
    pub fn load(&self) -> Option<(String, UserProfile)> {
        let token = match fs::read_to_string(self.credential_path()) {
            Ok(t) if !t.trim().is_empty() => t.trim().to_string(),
            Ok(_) => return None,
            Err(_) => return None,
        };

        let json = fs::read_to_string(self.profile_path()).ok()?;
        let profile: UserProfile = match serde_json::from_str(&json) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Stored profile is unreadable, ignoring session: {}", e);
                return None;
            }
        };

        Some((token, profile))
    }

    /// Remove any stored session. Missing files are not an error.
    pub fn clear(&self) -> Result<()> {
        for path in [self.credential_path(), self.profile_path()] {
            if path.exists() {
                fs::remove_file(&path).context("Failed to delete session file")?;
            }
        }
        tracing::info!("Cleared stored session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            username: "linh".to_string(),
            email: "linh@example.com".to_string(),
            first_name: "Linh".to_string(),
            last_name: "Tran".to_string(),
            favorite_locations: Vec::new(),
            notification_settings: Default::default(),
        }
    }

    #[test]
    fn store_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());

        storage.store("tok-abc", &profile()).unwrap();

        let (token, restored) = storage.load().unwrap();
        assert_eq!(token, "tok-abc");
        assert_eq!(restored, profile());
    }

    #[test]
    fn load_without_any_files_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());
        assert!(storage.load().is_none());
    }

    #[test]
    fn credential_without_profile_is_not_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join(CREDENTIAL_FILE), "orphan-token").unwrap();

        assert!(storage.load().is_none());
    }

    #[test]
    fn corrupt_profile_is_not_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());

        storage.store("tok", &profile()).unwrap();
        fs::write(dir.path().join(PROFILE_FILE), "{not json").unwrap();

        assert!(storage.load().is_none());
    }

    #[test]
    fn clear_removes_both_files_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());

        storage.store("tok", &profile()).unwrap();
        storage.clear().unwrap();
        assert!(storage.load().is_none());

        // Second clear with nothing stored succeeds.
        storage.clear().unwrap();
    }
}
