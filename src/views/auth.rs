//! Login and signup screens

use std::sync::Arc;

use super::{session_failure_message, ViewError, ViewResult};
use crate::router::Route;
use crate::session::Session;
use crate::validation::{FieldErrors, LoginForm, SignupForm};

pub struct LoginView {
    session: Arc<dyn Session>,
    pub form: LoginForm,
    pub status: Option<String>,
    pub field_errors: FieldErrors,
}

impl LoginView {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            session,
            form: LoginForm::default(),
            status: None,
            field_errors: FieldErrors::new(),
        }
    }

    /// Log in; on success the next screen is the dashboard
    pub async fn submit(&mut self) -> ViewResult<Route> {
        self.status = None;
        let request = self.form.validate().map_err(|errors| {
            self.field_errors = errors.clone();
            ViewError::Validation(errors)
        })?;
        self.field_errors = FieldErrors::new();

        match self.session.login(&request).await {
            Ok(()) => Ok(Route::Dashboard),
            Err(e) => {
                self.status = Some(session_failure_message(&e, "Login failed"));
                Err(e.into())
            }
        }
    }
}

pub struct SignupView {
    session: Arc<dyn Session>,
    pub form: SignupForm,
    pub status: Option<String>,
    pub field_errors: FieldErrors,
}

impl SignupView {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            session,
            form: SignupForm::default(),
            status: None,
            field_errors: FieldErrors::new(),
        }
    }

    pub async fn submit(&mut self) -> ViewResult<Route> {
        self.status = None;
        let request = self.form.validate().map_err(|errors| {
            self.field_errors = errors.clone();
            ViewError::Validation(errors)
        })?;
        self.field_errors = FieldErrors::new();

        match self.session.signup(&request).await {
            Ok(()) => Ok(Route::Dashboard),
            Err(e) => {
                self.status = Some(session_failure_message(&e, "Signup failed"));
                Err(e.into())
            }
        }
    }
}
