//! Remote API
//!
//! Client side of the diabetes management REST API. Authentication, BMI
//! computation and persistence all live on the server; this module only
//! shapes requests and decodes answers.
//!
//! # Endpoints
//!
//! ## Auth
//! - `GET /check_session` - Validate a stored credential
//! - `POST /login` - Exchange email/password for a credential
//! - `POST /signup` - Create an account
//!
//! ## Profile
//! - `PATCH /me` - Update diabetes type, height, weight
//! - `GET /me/bmi` - BMI computed from the profile
//!
//! ## Readings
//! - `GET /readings`, `POST /readings`
//! - `GET /readings/:id`, `PATCH /readings/:id`, `DELETE /readings/:id`
//! - `POST /readings/:id/meals`, `DELETE /readings/:id/meals?meal_id=`
//!
//! ## Medications
//! - `GET /medications`, `POST /medications`
//! - `PATCH /medications/:id`
//!
//! ## Meals
//! - `GET /meals`, `POST /meals`

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, ApiClientConfig};
pub use dto::{
    AuthResponse, LoginRequest, MealDraft, MealLinkRequest, MedicationDraft, ProfilePayload,
    ProfileUpdate, ReadingDraft, ReadingPatch, SignupRequest, StatusUpdate,
};
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;

use crate::models::{BmiReport, Credential, Meal, MealLink, Medication, MedicationStatus, Reading};

/// Capability to call the remote API
///
/// Views and the session store depend on this trait rather than on
/// [`ApiClient`], so tests can substitute an in-process fake.
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// Validate a credential and fetch the profile it belongs to
    async fn check_session(&self, token: &Credential) -> ApiResult<ProfilePayload>;

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse>;

    async fn bmi(&self, token: &Credential) -> ApiResult<BmiReport>;

    async fn update_profile(
        &self,
        token: &Credential,
        update: &ProfileUpdate,
    ) -> ApiResult<ProfilePayload>;

    async fn list_readings(&self, token: &Credential) -> ApiResult<Vec<Reading>>;

    async fn create_reading(&self, token: &Credential, draft: &ReadingDraft) -> ApiResult<Reading>;

    async fn get_reading(&self, token: &Credential, id: i64) -> ApiResult<Reading>;

    async fn update_reading(
        &self,
        token: &Credential,
        id: i64,
        patch: &ReadingPatch,
    ) -> ApiResult<Reading>;

    /// Succeeds only on `204 No Content`
    async fn delete_reading(&self, token: &Credential, id: i64) -> ApiResult<()>;

    async fn list_medications(&self, token: &Credential) -> ApiResult<Vec<Medication>>;

    async fn create_medication(
        &self,
        token: &Credential,
        draft: &MedicationDraft,
    ) -> ApiResult<Medication>;

    async fn update_medication_status(
        &self,
        token: &Credential,
        id: i64,
        status: MedicationStatus,
    ) -> ApiResult<Medication>;

    async fn list_meals(&self, token: &Credential) -> ApiResult<Vec<Meal>>;

    async fn create_meal(&self, token: &Credential, draft: &MealDraft) -> ApiResult<Meal>;

    async fn link_meal(
        &self,
        token: &Credential,
        reading_id: i64,
        request: &MealLinkRequest,
    ) -> ApiResult<MealLink>;

    /// Succeeds only on `204 No Content`
    async fn unlink_meal(&self, token: &Credential, reading_id: i64, meal_id: i64) -> ApiResult<()>;
}
