//! Medication tracking screen

use std::sync::Arc;

use super::{failure_message, require_credential, EntityList, ViewError, ViewResult};
use crate::api::HealthApi;
use crate::models::{Medication, MedicationStatus};
use crate::session::Session;
use crate::validation::{FieldErrors, MedicationForm};

pub struct MedicationsView {
    session: Arc<dyn Session>,
    api: Arc<dyn HealthApi>,
    medications: EntityList<Medication>,
    pub error: Option<String>,
    pub status: Option<String>,
    pub field_errors: FieldErrors,
}

impl MedicationsView {
    pub fn new(session: Arc<dyn Session>, api: Arc<dyn HealthApi>) -> Self {
        Self {
            session,
            api,
            medications: EntityList::new(),
            error: None,
            status: None,
            field_errors: FieldErrors::new(),
        }
    }

    pub fn medications(&self) -> &EntityList<Medication> {
        &self.medications
    }

    pub async fn load(&mut self) -> ViewResult<()> {
        let token = require_credential(self.session.as_ref())?;
        self.error = None;

        match self.api.list_medications(&token).await {
            Ok(medications) => {
                self.medications.replace_all(medications);
                Ok(())
            }
            Err(e) => {
                self.error = Some(failure_message(&e, "Failed to load"));
                Err(e.into())
            }
        }
    }

    pub async fn create(&mut self, form: &MedicationForm) -> ViewResult<Medication> {
        self.status = None;
        let draft = form.validate().map_err(|errors| {
            self.field_errors = errors.clone();
            ViewError::Validation(errors)
        })?;
        self.field_errors = FieldErrors::new();

        let token = require_credential(self.session.as_ref())?;
        match self.api.create_medication(&token, &draft).await {
            Ok(medication) => {
                tracing::info!(id = medication.id, name = %medication.name, "Medication added");
                self.medications.append(medication.clone());
                Ok(medication)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Create failed"));
                Err(e.into())
            }
        }
    }

    /// Change the intake status and swap the server's copy into the list
    pub async fn update_status(
        &mut self,
        id: i64,
        status: MedicationStatus,
    ) -> ViewResult<Medication> {
        self.status = None;
        let token = require_credential(self.session.as_ref())?;

        match self.api.update_medication_status(&token, id, status).await {
            Ok(medication) => {
                tracing::info!(id, status = %medication.status, "Medication status updated");
                self.medications.replace_by_id(medication.clone());
                Ok(medication)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Update failed"));
                Err(e.into())
            }
        }
    }
}
