//! Dashboard: who is logged in, their BMI and their education tips

use std::sync::Arc;

use super::{failure_message, require_credential, ViewResult};
use crate::api::HealthApi;
use crate::models::{BmiReport, UserProfile};
use crate::session::Session;

/// Shown when the session carries no tips
pub const NO_TIPS: &str = "No tips yet. Set your diabetes type on the profile page.";

#[derive(Debug, Clone, PartialEq)]
pub enum BmiState {
    /// Height or weight missing; nothing was fetched
    NeedsProfile,
    Ready(BmiReport),
    Failed(String),
}

pub struct DashboardView {
    session: Arc<dyn Session>,
    api: Arc<dyn HealthApi>,
    pub bmi: BmiState,
}

impl DashboardView {
    pub fn new(session: Arc<dyn Session>, api: Arc<dyn HealthApi>) -> Self {
        Self {
            session,
            api,
            bmi: BmiState::NeedsProfile,
        }
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.session.profile()
    }

    pub fn diabetes_type_label(&self) -> &'static str {
        self.session
            .profile()
            .map(|p| p.diabetes_type_label())
            .unwrap_or("Not set")
    }

    pub fn tips(&self) -> Vec<String> {
        self.session.tips()
    }

    /// Fetch the BMI, but only when the profile has both body metrics
    pub async fn load(&mut self) -> ViewResult<&BmiState> {
        let token = require_credential(self.session.as_ref())?;

        let ready = self
            .session
            .profile()
            .map(|p| p.has_body_metrics())
            .unwrap_or(false);
        if !ready {
            self.bmi = BmiState::NeedsProfile;
            return Ok(&self.bmi);
        }

        self.bmi = match self.api.bmi(&token).await {
            Ok(report) => BmiState::Ready(report),
            Err(e) => {
                tracing::warn!(error = %e, "BMI fetch failed");
                BmiState::Failed(failure_message(&e, "Could not load BMI"))
            }
        };
        Ok(&self.bmi)
    }
}
