//! Profile editing screen

use std::sync::Arc;

use super::{session_failure_message, ViewError, ViewResult};
use crate::models::UserProfile;
use crate::session::Session;
use crate::validation::{FieldErrors, ProfileForm};

pub const SAVED: &str = "Saved!";

pub struct ProfileView {
    session: Arc<dyn Session>,
    pub form: ProfileForm,
    pub status: Option<String>,
    pub field_errors: FieldErrors,
}

impl ProfileView {
    /// Open the editor prefilled from the current profile
    pub fn new(session: Arc<dyn Session>) -> Self {
        let form = session
            .profile()
            .map(|p| ProfileForm::from_profile(&p))
            .unwrap_or_default();
        Self {
            session,
            form,
            status: None,
            field_errors: FieldErrors::new(),
        }
    }

    pub async fn submit(&mut self) -> ViewResult<UserProfile> {
        self.status = None;
        let update = self.form.validate().map_err(|errors| {
            self.field_errors = errors.clone();
            ViewError::Validation(errors)
        })?;
        self.field_errors = FieldErrors::new();

        match self.session.update_profile(&update).await {
            Ok(profile) => {
                self.status = Some(SAVED.to_string());
                Ok(profile)
            }
            Err(e) => {
                self.status = Some(session_failure_message(&e, "Update failed"));
                Err(e.into())
            }
        }
    }
}
