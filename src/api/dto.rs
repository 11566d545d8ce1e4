//! Data Transfer Objects
//!
//! Request bodies sent to the remote API and the response envelopes that
//! are not plain domain types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{clock_time, Credential, DiabetesType, MealContext, MedicationStatus, UserProfile};

// ============================================
// AUTH DTOs
// ============================================

/// Login request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signup request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diabetes_type: Option<DiabetesType>,
}

/// Login and signup response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: Credential,
    pub user: UserProfile,
    /// Education tips for the user's diabetes type
    #[serde(default)]
    pub education: Option<Vec<String>>,
}

/// Session check and profile update response: the profile fields with the
/// education tips riding along in the same object
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePayload {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub education: Option<Vec<String>>,
}

// ============================================
// PROFILE DTOs
// ============================================

/// Profile update request; `None` fields are sent as `null` and clear the value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub diabetes_type: Option<DiabetesType>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

// ============================================
// READING DTOs
// ============================================

/// New glucose reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingDraft {
    pub value: f64,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub context: MealContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial reading update; only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_clock_time::serialize"
    )]
    pub time: Option<NaiveTime>,
    /// `Some(MealContext::Unset)` clears the context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<MealContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

mod optional_clock_time {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => crate::models::clock_time::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }
}

// ============================================
// MEDICATION DTOs
// ============================================

/// New medication
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationDraft {
    pub name: String,
    pub dose: String,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub status: MedicationStatus,
}

/// Medication status update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: MedicationStatus,
}

// ============================================
// MEAL DTOs
// ============================================

/// New meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Attach a meal to a reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealLinkRequest {
    pub meal_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_amount: Option<f64>,
}

// ============================================
// ERRORS
// ============================================

/// Error body returned by the server on failure
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
