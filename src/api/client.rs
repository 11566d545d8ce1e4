//! Remote API Client
//!
//! reqwest implementation of [`HealthApi`]. Every request carries an
//! `X-Request-Id` header that also appears in the log lines for that call.
//! Nothing is retried: a failed call is reported to the caller once.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::dto::{
    AuthResponse, ErrorBody, LoginRequest, MealDraft, MealLinkRequest, MedicationDraft,
    ProfilePayload, ProfileUpdate, ReadingDraft, ReadingPatch, SignupRequest, StatusUpdate,
};
use super::error::{ApiError, ApiResult};
use super::HealthApi;
use crate::models::{BmiReport, Credential, Meal, MealLink, Medication, MedicationStatus, Reading};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the API (e.g., "http://localhost:5555")
    pub base_url: String,
    /// Transport-level timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5555".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// HTTP client for the diabetes management API
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

/// A request that has been built but not yet sent
struct Call {
    builder: RequestBuilder,
    request_id: String,
}

impl Call {
    fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.json(body);
        self
    }

    fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Self {
        self.builder = self.builder.query(query);
        self
    }

    async fn send(self) -> ApiResult<(Response, String)> {
        match self.builder.send().await {
            Ok(response) => Ok((response, self.request_id)),
            Err(e) => {
                let err = ApiError::from_transport(e);
                tracing::warn!(request_id = %self.request_id, error = %err, "API request failed");
                Err(err)
            }
        }
    }

    /// Send and decode a JSON body from a success response
    async fn expect_json<T: DeserializeOwned>(self, fallback: &str) -> ApiResult<T> {
        let (response, request_id) = self.send().await?;

        if response.status().is_success() {
            response.json::<T>().await.map_err(|e| {
                tracing::warn!(request_id = %request_id, error = %e, "Unexpected response body");
                ApiError::Decode(e.to_string())
            })
        } else {
            Err(rejection(response, &request_id, fallback).await)
        }
    }

    /// Send and require `204 No Content`; any other status is a failure
    async fn expect_no_content(self, fallback: &str) -> ApiResult<()> {
        let (response, request_id) = self.send().await?;

        if response.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(rejection(response, &request_id, fallback).await)
        }
    }
}

/// Turn a non-success response into an error carrying the server's
/// `{error}` message, or `fallback` when the body has none
async fn rejection(response: Response, request_id: &str, fallback: &str) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    tracing::warn!(
        request_id = %request_id,
        status = status,
        message = %message,
        "API request rejected"
    );

    ApiError::Rejected { status, message }
}

impl ApiClient {
    /// Create a new API client with the given configuration
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn call(&self, method: Method, path: &str, token: Option<&Credential>) -> Call {
        let request_id = Uuid::new_v4().to_string();
        let url = self.url(path);

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            authed = token.is_some(),
            "Sending API request"
        );

        let mut builder = self
            .client
            .request(method, url)
            .header("X-Request-Id", request_id.as_str());
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }

        Call {
            builder,
            request_id,
        }
    }
}

#[async_trait]
impl HealthApi for ApiClient {
    async fn check_session(&self, token: &Credential) -> ApiResult<ProfilePayload> {
        self.call(Method::GET, "/check_session", Some(token))
            .expect_json("Session check failed")
            .await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.call(Method::POST, "/login", None)
            .json(request)
            .expect_json("Login failed")
            .await
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        self.call(Method::POST, "/signup", None)
            .json(request)
            .expect_json("Signup failed")
            .await
    }

    async fn bmi(&self, token: &Credential) -> ApiResult<BmiReport> {
        self.call(Method::GET, "/me/bmi", Some(token))
            .expect_json("Could not load BMI")
            .await
    }

    async fn update_profile(
        &self,
        token: &Credential,
        update: &ProfileUpdate,
    ) -> ApiResult<ProfilePayload> {
        self.call(Method::PATCH, "/me", Some(token))
            .json(update)
            .expect_json("Update failed")
            .await
    }

    async fn list_readings(&self, token: &Credential) -> ApiResult<Vec<Reading>> {
        self.call(Method::GET, "/readings", Some(token))
            .expect_json("Failed to load")
            .await
    }

    async fn create_reading(&self, token: &Credential, draft: &ReadingDraft) -> ApiResult<Reading> {
        self.call(Method::POST, "/readings", Some(token))
            .json(draft)
            .expect_json("Create failed")
            .await
    }

    async fn get_reading(&self, token: &Credential, id: i64) -> ApiResult<Reading> {
        self.call(Method::GET, &format!("/readings/{}", id), Some(token))
            .expect_json("Failed to load")
            .await
    }

    async fn update_reading(
        &self,
        token: &Credential,
        id: i64,
        patch: &ReadingPatch,
    ) -> ApiResult<Reading> {
        self.call(Method::PATCH, &format!("/readings/{}", id), Some(token))
            .json(patch)
            .expect_json("Update failed")
            .await
    }

    async fn delete_reading(&self, token: &Credential, id: i64) -> ApiResult<()> {
        self.call(Method::DELETE, &format!("/readings/{}", id), Some(token))
            .expect_no_content("Delete failed")
            .await
    }

    async fn list_medications(&self, token: &Credential) -> ApiResult<Vec<Medication>> {
        self.call(Method::GET, "/medications", Some(token))
            .expect_json("Failed to load")
            .await
    }

    async fn create_medication(
        &self,
        token: &Credential,
        draft: &MedicationDraft,
    ) -> ApiResult<Medication> {
        self.call(Method::POST, "/medications", Some(token))
            .json(draft)
            .expect_json("Create failed")
            .await
    }

    async fn update_medication_status(
        &self,
        token: &Credential,
        id: i64,
        status: MedicationStatus,
    ) -> ApiResult<Medication> {
        self.call(Method::PATCH, &format!("/medications/{}", id), Some(token))
            .json(&StatusUpdate { status })
            .expect_json("Update failed")
            .await
    }

    async fn list_meals(&self, token: &Credential) -> ApiResult<Vec<Meal>> {
        self.call(Method::GET, "/meals", Some(token))
            .expect_json("Failed to load")
            .await
    }

    async fn create_meal(&self, token: &Credential, draft: &MealDraft) -> ApiResult<Meal> {
        self.call(Method::POST, "/meals", Some(token))
            .json(draft)
            .expect_json("Create failed")
            .await
    }

    async fn link_meal(
        &self,
        token: &Credential,
        reading_id: i64,
        request: &MealLinkRequest,
    ) -> ApiResult<MealLink> {
        self.call(Method::POST, &format!("/readings/{}/meals", reading_id), Some(token))
            .json(request)
            .expect_json("Link failed")
            .await
    }

    async fn unlink_meal(&self, token: &Credential, reading_id: i64, meal_id: i64) -> ApiResult<()> {
        self.call(Method::DELETE, &format!("/readings/{}/meals", reading_id), Some(token))
            .query(&[("meal_id", meal_id)])
            .expect_no_content("Unlink failed")
            .await
    }
}
