//! Session
//!
//! Single source of truth for "who is logged in". The credential, the
//! user profile and the education tips are held together as one triple and
//! mirrored to client storage on every change.
//!
//! Views receive an `Arc<dyn Session>` and never see the concrete store.
//!
//! # Lifecycle
//!
//! ```text
//! startup:  hydrate from storage → restore() once → check_session
//!             ok        → replace profile (+ tips if sent)
//!             rejected  → clear triple
//!             transport → keep everything, log only
//! login/signup:   replace triple
//! update_profile: replace profile (+ tips if sent)
//! logout:         clear triple + erase all client storage
//! ```

mod error;
mod store;

pub use error::{SessionError, SessionResult};
pub use store::SessionStore;

use async_trait::async_trait;

use crate::api::{LoginRequest, ProfileUpdate, SignupRequest};
use crate::models::{Credential, UserProfile};

/// What the one-time session restore did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing persisted; no network call was made
    NoCredential,
    /// The server accepted the credential and returned the profile
    Restored,
    /// The server rejected the credential; the session was cleared
    Rejected,
    /// The server could not be reached; the persisted session was kept
    TransportFailed,
    /// Restore already ran in this process
    AlreadyAttempted,
}

/// Session capability handed to every view
#[async_trait]
pub trait Session: Send + Sync {
    /// Current bearer credential
    fn credential(&self) -> Option<Credential>;

    /// Current user profile
    fn profile(&self) -> Option<UserProfile>;

    /// Current education tips (possibly empty)
    fn tips(&self) -> Vec<String>;

    /// True only when both a credential and a profile are held
    fn is_authed(&self) -> bool;

    /// Validate the persisted credential against the server, once
    async fn restore(&self) -> RestoreOutcome;

    /// Log in and replace the whole session on success
    async fn login(&self, request: &LoginRequest) -> SessionResult<()>;

    /// Create an account and replace the whole session on success
    async fn signup(&self, request: &SignupRequest) -> SessionResult<()>;

    /// Update the profile on the server and adopt the returned one
    async fn update_profile(&self, update: &ProfileUpdate) -> SessionResult<UserProfile>;

    /// Drop the session and erase all client storage
    fn logout(&self) -> SessionResult<()>;
}
