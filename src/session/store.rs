//! Session Store
//!
//! Holds the credential/profile/tips triple behind a lock and mirrors every
//! change to client storage: a present value is written, an absent one
//! deletes its slot. The lock is never held across a network call.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{RestoreOutcome, Session, SessionError, SessionResult};
use crate::api::{AuthResponse, HealthApi, LoginRequest, ProfileUpdate, SignupRequest};
use crate::models::{Credential, UserProfile};
use crate::storage::{
    read_json, write_json, ClientStorage, StorageResult, PROFILE_KEY, TIPS_KEY, TOKEN_KEY,
};

#[derive(Debug, Clone, Default)]
struct SessionState {
    credential: Option<Credential>,
    profile: Option<UserProfile>,
    tips: Vec<String>,
}

/// The one owner of credential, profile and education tips
pub struct SessionStore {
    storage: Arc<dyn ClientStorage>,
    api: Arc<dyn HealthApi>,
    state: RwLock<SessionState>,
    restore_attempted: AtomicBool,
}

impl SessionStore {
    /// Create a store hydrated from whatever `storage` currently holds
    ///
    /// Unreadable slots are logged and treated as empty.
    pub fn new(storage: Arc<dyn ClientStorage>, api: Arc<dyn HealthApi>) -> Self {
        let state = hydrate(storage.as_ref());

        tracing::debug!(
            has_credential = state.credential.is_some(),
            has_profile = state.profile.is_some(),
            tips = state.tips.len(),
            "Session hydrated from client storage"
        );

        Self {
            storage,
            api,
            state: RwLock::new(state),
            restore_attempted: AtomicBool::new(false),
        }
    }

    /// Replace the credential; `None` deletes the persisted slot
    pub fn set_credential(&self, credential: Option<Credential>) -> StorageResult<()> {
        self.write_state().credential = credential.clone();
        match credential {
            Some(token) => self.storage.set_item(TOKEN_KEY, token.as_str()),
            None => self.storage.remove_item(TOKEN_KEY),
        }
    }

    /// Replace the profile; `None` deletes the persisted slot
    pub fn set_profile(&self, profile: Option<UserProfile>) -> StorageResult<()> {
        self.write_state().profile = profile.clone();
        match profile {
            Some(profile) => write_json(self.storage.as_ref(), PROFILE_KEY, &profile),
            None => self.storage.remove_item(PROFILE_KEY),
        }
    }

    /// Replace the tips; `None` empties them and deletes the persisted slot
    pub fn set_tips(&self, tips: Option<Vec<String>>) -> StorageResult<()> {
        self.write_state().tips = tips.clone().unwrap_or_default();
        match tips {
            Some(tips) => write_json(self.storage.as_ref(), TIPS_KEY, &tips),
            None => self.storage.remove_item(TIPS_KEY),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Adopt a login/signup response as the whole session
    fn apply_auth(&self, response: AuthResponse) -> StorageResult<()> {
        self.set_credential(Some(response.access_token))?;
        self.set_profile(Some(response.user))?;
        self.set_tips(Some(response.education.unwrap_or_default()))
    }

    /// Clear the triple after the server rejected the stored credential
    fn forget(&self) {
        let cleared = self
            .set_credential(None)
            .and_then(|_| self.set_profile(None))
            .and_then(|_| self.set_tips(None));

        if let Err(e) = cleared {
            tracing::warn!(error = %e, "Failed to erase rejected session from storage");
        }
    }
}

fn hydrate(storage: &dyn ClientStorage) -> SessionState {
    let credential = match storage.get_item(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()).map(Credential::new),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read stored credential");
            None
        }
    };

    let profile = read_json::<UserProfile>(storage, PROFILE_KEY).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable stored profile");
        None
    });

    let tips = read_json::<Vec<String>>(storage, TIPS_KEY)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable stored education tips");
            None
        })
        .unwrap_or_default();

    SessionState {
        credential,
        profile,
        tips,
    }
}

#[async_trait]
impl Session for SessionStore {
    fn credential(&self) -> Option<Credential> {
        self.read_state().credential.clone()
    }

    fn profile(&self) -> Option<UserProfile> {
        self.read_state().profile.clone()
    }

    fn tips(&self) -> Vec<String> {
        self.read_state().tips.clone()
    }

    fn is_authed(&self) -> bool {
        let state = self.read_state();
        state.credential.is_some() && state.profile.is_some()
    }

    async fn restore(&self) -> RestoreOutcome {
        if self.restore_attempted.swap(true, Ordering::SeqCst) {
            return RestoreOutcome::AlreadyAttempted;
        }

        let Some(token) = self.credential() else {
            tracing::debug!("No stored credential, skipping session check");
            return RestoreOutcome::NoCredential;
        };

        match self.api.check_session(&token).await {
            Ok(payload) => {
                if let Err(e) = self.set_profile(Some(payload.profile)) {
                    tracing::warn!(error = %e, "Failed to persist restored profile");
                }
                if let Some(tips) = payload.education {
                    if let Err(e) = self.set_tips(Some(tips)) {
                        tracing::warn!(error = %e, "Failed to persist restored tips");
                    }
                }
                tracing::info!("Session restored");
                RestoreOutcome::Restored
            }
            Err(e) if e.is_transport() => {
                tracing::warn!(error = %e, "Session check failed, keeping stored session");
                RestoreOutcome::TransportFailed
            }
            Err(e) => {
                tracing::info!(
                    status = e.status().unwrap_or_default(),
                    "Stored credential rejected, clearing session"
                );
                self.forget();
                RestoreOutcome::Rejected
            }
        }
    }

    async fn login(&self, request: &LoginRequest) -> SessionResult<()> {
        let response = self.api.login(request).await?;
        self.apply_auth(response)?;
        tracing::info!(email = %request.email, "Logged in");
        Ok(())
    }

    async fn signup(&self, request: &SignupRequest) -> SessionResult<()> {
        let response = self.api.signup(request).await?;
        self.apply_auth(response)?;
        tracing::info!(email = %request.email, "Account created");
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> SessionResult<UserProfile> {
        let token = self.credential().ok_or(SessionError::NotAuthenticated)?;
        let payload = self.api.update_profile(&token, update).await?;

        self.set_profile(Some(payload.profile.clone()))?;
        if let Some(tips) = payload.education {
            self.set_tips(Some(tips))?;
        }

        tracing::info!("Profile updated");
        Ok(payload.profile)
    }

    fn logout(&self) -> SessionResult<()> {
        *self.write_state() = SessionState::default();
        self.storage.clear()?;
        tracing::info!("Logged out, client storage erased");
        Ok(())
    }
}
