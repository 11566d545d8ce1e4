//! View State
//!
//! One state object per screen. A view owns its list and its status
//! messages, reads the session through [`Session`], and talks to the remote
//! API only through [`HealthApi`]. The authentication calls go through the
//! session, never straight to the API.
//!
//! - **list**: `EntityList`, the owned collection behind list screens
//! - **auth**: login and signup
//! - **dashboard**: profile summary, BMI and education tips
//! - **profile**: profile editing
//! - **readings**, **medications**, **meals**: record screens

mod auth;
mod dashboard;
mod list;
mod meals;
mod medications;
mod profile;
mod readings;

pub use auth::{LoginView, SignupView};
pub use dashboard::{BmiState, DashboardView, NO_TIPS};
pub use list::{EntityList, Identified};
pub use meals::MealsView;
pub use medications::MedicationsView;
pub use profile::ProfileView;
pub use readings::ReadingsView;

use thiserror::Error;

use crate::api::ApiError;
use crate::models::Credential;
use crate::session::{Session, SessionError};
use crate::validation::FieldErrors;

/// Errors returned by view operations
#[derive(Error, Debug)]
pub enum ViewError {
    /// The form did not validate; nothing was sent
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ViewError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ViewError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ViewError {
    fn from(errors: FieldErrors) -> Self {
        ViewError::Validation(errors)
    }
}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// The credential for an authenticated call
pub(crate) fn require_credential(session: &dyn Session) -> ViewResult<Credential> {
    session
        .credential()
        .ok_or(ViewError::Session(SessionError::NotAuthenticated))
}

/// Status text for a failed call: the server's message for a rejection,
/// the operation's fallback for anything else
pub(crate) fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Rejected { message, .. } if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

pub(crate) fn session_failure_message(err: &SessionError, fallback: &str) -> String {
    match err {
        SessionError::Api(e) => failure_message(e, fallback),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message() {
        let rejected = ApiError::Rejected {
            status: 400,
            message: "Reading not found".to_string(),
        };
        assert_eq!(failure_message(&rejected, "Delete failed"), "Reading not found");
        assert_eq!(failure_message(&ApiError::Unavailable, "Delete failed"), "Delete failed");
        assert_eq!(
            session_failure_message(&SessionError::NotAuthenticated, "Update failed"),
            "Not logged in"
        );
    }

    #[test]
    fn test_validation_error_exposes_fields() {
        let mut errors = FieldErrors::new();
        errors.add("name", "Required");
        let err = ViewError::from(errors);
        assert_eq!(err.field_errors().unwrap().get("name"), Some("Required"));
        assert_eq!(err.to_string(), "Invalid input: name: Required");
    }
}
