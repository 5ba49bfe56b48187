//! Session state manager: identity and credential lifecycle.
//!
//! States: `Unauthenticated → Authenticating → Authenticated`, with logout
//! returning to `Unauthenticated`. Identity and credential are set and
//! cleared together under one write lock, so no observer ever sees one
//! without the other in a settled state.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use skywatch_api::{ApiClient, CredentialStore, LoginRequest, RegisterRequest, UserProfile};
use skywatch_core::error::{AuthError, NetworkError};
use skywatch_core::RestorePolicy;

use crate::storage::SessionStorage;

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(UserProfile),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct SessionManager {
    api: Arc<ApiClient>,
    credential: CredentialStore,
    state: RwLock<SessionState>,
    storage: SessionStorage,
    restore_policy: RestorePolicy,
}

impl SessionManager {
    /// `credential` must be the same store the `api` client reads, so a
    /// login is visible to the very next outgoing request.
    pub fn new(
        api: Arc<ApiClient>,
        credential: CredentialStore,
        storage_dir: &Path,
        restore_policy: RestorePolicy,
    ) -> Self {
        Self {
            api,
            credential,
            state: RwLock::new(SessionState::Unauthenticated),
            storage: SessionStorage::new(storage_dir),
            restore_policy,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn identity(&self) -> Option<UserProfile> {
        match &*self.state.read() {
            SessionState::Authenticated(profile) => Some(profile.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Set or clear credential and identity together. Holding the state
    /// write lock across both writes keeps the pair atomic for readers that
    /// go through this manager.
    fn settle(&self, token: Option<String>, profile: Option<UserProfile>) {
        let mut state = self.state.write();
        match (token, profile) {
            (Some(token), Some(profile)) => {
                self.credential.set(token);
                *state = SessionState::Authenticated(profile);
            }
            _ => {
                self.credential.clear();
                *state = SessionState::Unauthenticated;
            }
        }
    }

    /// Log in with username-or-email plus password.
    ///
    /// On success the credential and identity are persisted and the session
    /// becomes `Authenticated`. On failure the session is left
    /// `Unauthenticated` and the typed error is returned for the caller to
    /// render.
    pub async fn login(&self, login: &str, password: &str) -> Result<UserProfile, AuthError> {
        *self.state.write() = SessionState::Authenticating;

        let request = LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        };

        let response = match self.api.login(&request).await {
            Ok(r) => r,
            Err(e) => {
                *self.state.write() = SessionState::Unauthenticated;
                return Err(e);
            }
        };

        if let Err(e) = self.storage.store(&response.token, &response.user) {
            // The live session still works; only restore-after-restart is lost.
            tracing::warn!("Failed to persist session: {}", e);
        }

        self.settle(Some(response.token), Some(response.user.clone()));
        tracing::info!("Logged in as {}", response.user.username);
        Ok(response.user)
    }

    /// Create an account. Success does not log the caller in; a separate
    /// `login` call is required.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        self.api.register(request).await
    }

    /// Clear credential, identity, and durable storage. Never fails and
    /// never makes a network call.
    pub fn logout(&self) {
        self.settle(None, None);
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to clear stored session: {}", e);
        }
        tracing::info!("Logged out");
    }

    /// Restore a stored session at startup.
    ///
    /// `RestorePolicy::Trust` transitions straight to `Authenticated`
    /// without contacting the server; a revoked token then surfaces on the
    /// first rejected request. `RestorePolicy::Validate` confirms the
    /// credential against the profile endpoint once and drops the session
    /// on an explicit rejection; a validation attempt that fails for any
    /// other reason keeps the stored session.
    pub async fn restore(&self) -> bool {
        let Some((token, profile)) = self.storage.load() else {
            return false;
        };

        match self.restore_policy {
            RestorePolicy::Trust => {
                self.settle(Some(token), Some(profile.clone()));
                tracing::info!("Restored session for {}", profile.username);
                true
            }
            RestorePolicy::Validate => {
                self.credential.set(token.clone());
                match self.api.profile().await {
                    Ok(fresh) => {
                        self.settle(Some(token), Some(fresh.clone()));
                        tracing::info!("Restored and validated session for {}", fresh.username);
                        true
                    }
                    // Only an explicit rejection discards the stored
                    // session; outages and decode trouble are not evidence
                    // the credential is bad.
                    Err(NetworkError::ServerError {
                        status: status @ (401 | 403),
                        ..
                    }) => {
                        tracing::warn!(status, "Stored credential rejected, discarding session");
                        self.settle(None, None);
                        if let Err(e) = self.storage.clear() {
                            tracing::warn!("Failed to clear rejected session: {}", e);
                        }
                        false
                    }
                    Err(e) => {
                        tracing::warn!("Could not validate stored session, keeping it: {}", e);
                        self.settle(Some(token), Some(profile.clone()));
                        true
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.state.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unauthenticated() {
        assert_eq!(SessionState::default(), SessionState::Unauthenticated);
        assert!(!SessionState::Unauthenticated.is_authenticated());
        assert!(!SessionState::Authenticating.is_authenticated());
    }

    #[test]
    fn authenticated_state_reports_as_such() {
        let state = SessionState::Authenticated(UserProfile {
            id: 1,
            username: "linh".to_string(),
            email: "linh@example.com".to_string(),
            first_name: "Linh".to_string(),
            last_name: "Tran".to_string(),
            favorite_locations: Vec::new(),
            notification_settings: Default::default(),
        });
        assert!(state.is_authenticated());
    }
}
