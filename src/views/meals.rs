//! Meals screen, including links between meals and readings

use std::sync::Arc;

use super::{failure_message, require_credential, EntityList, ViewError, ViewResult};
use crate::api::{HealthApi, MealLinkRequest};
use crate::models::{Meal, MealLink};
use crate::session::Session;
use crate::validation::{FieldErrors, MealForm};

pub struct MealsView {
    session: Arc<dyn Session>,
    api: Arc<dyn HealthApi>,
    meals: EntityList<Meal>,
    pub error: Option<String>,
    pub status: Option<String>,
    pub field_errors: FieldErrors,
}

impl MealsView {
    pub fn new(session: Arc<dyn Session>, api: Arc<dyn HealthApi>) -> Self {
        Self {
            session,
            api,
            meals: EntityList::new(),
            error: None,
            status: None,
            field_errors: FieldErrors::new(),
        }
    }

    pub fn meals(&self) -> &EntityList<Meal> {
        &self.meals
    }

    pub async fn load(&mut self) -> ViewResult<()> {
        let token = require_credential(self.session.as_ref())?;
        self.error = None;

        match self.api.list_meals(&token).await {
            Ok(meals) => {
                self.meals.replace_all(meals);
                Ok(())
            }
            Err(e) => {
                self.error = Some(failure_message(&e, "Failed to load"));
                Err(e.into())
            }
        }
    }

    pub async fn create(&mut self, form: &MealForm) -> ViewResult<Meal> {
        self.status = None;
        let draft = form.validate().map_err(|errors| {
            self.field_errors = errors.clone();
            ViewError::Validation(errors)
        })?;
        self.field_errors = FieldErrors::new();

        let token = require_credential(self.session.as_ref())?;
        match self.api.create_meal(&token, &draft).await {
            Ok(meal) => {
                self.meals.append(meal.clone());
                Ok(meal)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Create failed"));
                Err(e.into())
            }
        }
    }

    pub async fn link(
        &mut self,
        reading_id: i64,
        meal_id: i64,
        carbs_amount: Option<f64>,
    ) -> ViewResult<MealLink> {
        self.status = None;
        let token = require_credential(self.session.as_ref())?;
        let request = MealLinkRequest {
            meal_id,
            carbs_amount,
        };

        match self.api.link_meal(&token, reading_id, &request).await {
            Ok(link) => {
                tracing::info!(reading_id, meal_id, "Meal linked to reading");
                self.status = Some(link.message.clone());
                Ok(link)
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Link failed"));
                Err(e.into())
            }
        }
    }

    pub async fn unlink(&mut self, reading_id: i64, meal_id: i64) -> ViewResult<()> {
        self.status = None;
        let token = require_credential(self.session.as_ref())?;

        match self.api.unlink_meal(&token, reading_id, meal_id).await {
            Ok(()) => {
                tracing::info!(reading_id, meal_id, "Meal unlinked from reading");
                Ok(())
            }
            Err(e) => {
                self.status = Some(failure_message(&e, "Unlink failed"));
                Err(e.into())
            }
        }
    }
}
