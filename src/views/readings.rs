//! Glucose readings screen

use std::sync::Arc;

use super::{failure_message, require_credential, EntityList, ViewError, ViewResult};
use crate::api::{HealthApi, ReadingPatch};
use crate::classify::{classify, Classification};
use crate::models::Reading;
use crate::session::Session;
use crate::validation::{FieldErrors, ReadingForm};

pub struct ReadingsView {
    session: Arc<dyn Session>,
    api: Arc<dyn HealthApi>,
    readings: EntityList<Reading>,
    /// Set when loading the list fails
    pub error: Option<String>,
    /// Outcome of the last create/update/delete
    pub status: Option<String>,
    pub field_errors: FieldErrors,
}

impl ReadingsView {
    pub fn new(session: Arc<dyn Session>, api: Arc<dyn HealthApi>) -> Self {
        Self {
            session,
            api,
            readings: EntityList::new(),
            error: None,
            status: None,
            field_errors: FieldErrors::new(),
        }
    }

    pub fn readings(&self) -> &EntityList<Reading> {
        &self.readings
    }

    /// Fetch the list, replacing whatever was shown
    pub async fn load(&mut self) -> ViewResult<()> {
        let token = require_credential(self.session.as_ref())?;
        self.error = None;

        match self.api.list_readings(&token).await {
            Ok(readings) => {
                tracing::debug!(count = readings.len(), "Readings loaded");
                self.readings.replace_all(readings);
                Ok(())
            }
            Err(e) => {
                self.error = Some(failure_message(&e, "Failed to load"));
                Err(e.into())
            }
        }
    }

    /// Validate, post and append
    pub async fn create(&mut self, form: &ReadingForm) -> ViewResult<Reading> {
        self.status = None;
        let draft = match form.validate() {
            Ok(draft) => {
                self.field_errors = FieldErrors::new();
                draft
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(ViewError::Validation(errors));
            }
        };

        let token = require_credential(self.session.as_ref())?;
        match self.api.create_reading(&token, &draft).await {
            Ok(reading) => {
                tracing::info!(id = reading.id, value = reading.value, "Reading logged");
                self.readings.append(reading.clone());
                Ok(reading)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Create failed"));
                Err(e.into())
            }
        }
    }

    /// Fetch one reading with its server-side evaluation and refresh it in
    /// the list
    pub async fn show(&mut self, id: i64) -> ViewResult<Reading> {
        let token = require_credential(self.session.as_ref())?;
        match self.api.get_reading(&token, id).await {
            Ok(reading) => {
                if !self.readings.replace_by_id(reading.clone()) {
                    self.readings.append(reading.clone());
                }
                Ok(reading)
            }
            Err(e) => {
                self.error = Some(failure_message(&e, "Failed to load"));
                Err(e.into())
            }
        }
    }

    pub async fn update(&mut self, id: i64, patch: &ReadingPatch) -> ViewResult<Reading> {
        self.status = None;
        let token = require_credential(self.session.as_ref())?;
        match self.api.update_reading(&token, id, patch).await {
            Ok(reading) => {
                self.readings.replace_by_id(reading.clone());
                Ok(reading)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Update failed"));
                Err(e.into())
            }
        }
    }

    /// Delete after confirmation. Unconfirmed requests do nothing and
    /// return `false`.
    pub async fn delete(&mut self, id: i64, confirmed: bool) -> ViewResult<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.status = None;

        let token = require_credential(self.session.as_ref())?;
        match self.api.delete_reading(&token, id).await {
            Ok(()) => {
                self.readings.remove_by_id(id);
                tracing::info!(id, "Reading deleted");
                Ok(true)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Delete failed"));
                Err(e.into())
            }
        }
    }

    /// Every reading paired with its local classification
    pub fn classified(&self) -> Vec<(&Reading, Classification)> {
        self.readings
            .iter()
            .map(|r| (r, classify(r.value, r.context)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::GlucoseStatus;
    use crate::models::MealContext;
    use crate::test_support::{logged_in_session, Mode, StubApi};
    use chrono::{NaiveDate, NaiveTime};

    fn form(value: &str, context: &str) -> ReadingForm {
        ReadingForm {
            value: value.to_string(),
            date: "2024-01-01".to_string(),
            time: "08:00".to_string(),
            context: context.to_string(),
            notes: String::new(),
        }
    }

    fn seeded(id: i64, value: f64) -> Reading {
        Reading {
            id,
            value,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            context: MealContext::PostMeal,
            notes: None,
            created_at: None,
            user_id: Some(1),
            evaluation: None,
        }
    }

    async fn view(api: &Arc<StubApi>) -> ReadingsView {
        let (session, _storage) = logged_in_session(api).await;
        ReadingsView::new(session, Arc::clone(api) as Arc<dyn HealthApi>)
    }

    #[tokio::test]
    async fn test_load_replaces_list() {
        let api = StubApi::new();
        api.seed_reading(seeded(5, 120.0));
        let mut view = view(&api).await;

        view.load().await.unwrap();
        assert_eq!(view.readings().len(), 1);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_load_failure_sets_error() {
        let api = StubApi::new();
        let mut view = view(&api).await;
        api.set_mode(Mode::Offline);

        assert!(view.load().await.is_err());
        assert_eq!(view.error.as_deref(), Some("Failed to load"));
    }

    #[tokio::test]
    async fn test_create_appends() {
        let api = StubApi::new();
        let mut view = view(&api).await;

        let reading = view.create(&form("95", "pre_meal")).await.unwrap();
        assert_eq!(view.readings().items(), &[reading.clone()]);

        let classified = view.classified();
        assert_eq!(classified[0].1.status, GlucoseStatus::Normal);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let api = StubApi::new();
        let mut view = view(&api).await;

        let err = view.create(&form("20", "")).await.unwrap_err();
        assert!(matches!(err, ViewError::Validation(_)));
        assert_eq!(view.field_errors.get("value"), Some("Must be at least 40"));
        assert_eq!(api.call_count("create_reading"), 0);
        assert!(view.readings().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_sets_status() {
        let api = StubApi::new();
        let mut view = view(&api).await;
        api.set_mode(Mode::Offline);

        assert!(view.create(&form("95", "")).await.is_err());
        assert_eq!(view.status.as_deref(), Some("Create failed"));
        assert!(view.readings().is_empty());
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let api = StubApi::new();
        api.seed_reading(seeded(5, 120.0));
        let mut view = view(&api).await;
        view.load().await.unwrap();

        assert!(!view.delete(5, false).await.unwrap());
        assert_eq!(api.call_count("delete_reading"), 0);
        assert_eq!(view.readings().len(), 1);

        assert!(view.delete(5, true).await.unwrap());
        assert!(view.readings().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_item() {
        let api = StubApi::new();
        api.seed_reading(seeded(5, 120.0));
        let mut view = view(&api).await;
        view.load().await.unwrap();

        assert!(view.delete(6, true).await.is_err());
        assert_eq!(view.status.as_deref(), Some("Reading not found"));
        assert_eq!(view.readings().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let api = StubApi::new();
        api.seed_reading(seeded(5, 120.0));
        api.seed_reading(seeded(6, 130.0));
        let mut view = view(&api).await;
        view.load().await.unwrap();

        let patch = ReadingPatch {
            value: Some(210.0),
            ..ReadingPatch::default()
        };
        view.update(5, &patch).await.unwrap();

        let values: Vec<f64> = view.readings().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![210.0, 130.0]);
        assert_eq!(view.classified()[0].1.status, GlucoseStatus::High);
    }

    #[tokio::test]
    async fn test_logged_out_view_makes_no_calls() {
        let api = StubApi::new();
        let (session, _storage) = logged_in_session(&api).await;
        session.logout().unwrap();
        let mut view = ReadingsView::new(session, Arc::clone(&api) as Arc<dyn HealthApi>);

        let err = view.load().await.unwrap_err();
        assert!(matches!(err, ViewError::Session(_)));
        assert_eq!(api.call_count("list_readings"), 0);
    }
}
