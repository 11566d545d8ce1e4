//! Form Validation
//!
//! One validator per form. Raw input arrives as strings, the way a form or
//! a command line delivers it; a validator either builds the typed request
//! for the API or reports one message per offending field. Nothing that
//! fails here reaches the network.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use crate::api::{LoginRequest, MealDraft, MedicationDraft, ProfileUpdate, ReadingDraft, SignupRequest};
use crate::models::{DiabetesType, MealContext, MedicationStatus};

const REQUIRED: &str = "Required";
const NOT_A_NUMBER: &str = "Must be a number";
const INVALID: &str = "Invalid";

const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 2;
const HEIGHT_RANGE: RangeInclusive<f64> = 50.0..=250.0;
const WEIGHT_RANGE: RangeInclusive<f64> = 20.0..=400.0;
const GLUCOSE_RANGE: RangeInclusive<f64> = 40.0..=500.0;

// ============================================
// Field errors
// ============================================

/// Field name to message, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field wins
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

// ============================================
// Field checks
// ============================================

fn looks_like_email(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
        })
        .is_match(email)
}

fn check_email(errors: &mut FieldErrors, raw: &str) -> String {
    let email = raw.trim();
    if email.is_empty() {
        errors.add("email", REQUIRED);
    } else if !looks_like_email(email) {
        errors.add("email", "Invalid email");
    }
    email.to_string()
}

fn check_password(errors: &mut FieldErrors, raw: &str) {
    if raw.is_empty() {
        errors.add("password", REQUIRED);
    } else if raw.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Min 6 characters");
    }
}

fn check_required(errors: &mut FieldErrors, field: &'static str, raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

fn optional_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn check_diabetes_type(errors: &mut FieldErrors, raw: &str) -> Option<DiabetesType> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add("diabetes_type", INVALID);
            None
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// An optional number inside `range`; empty input is `None`
fn check_optional_measure(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: &str,
    range: RangeInclusive<f64>,
    below: &str,
    above: &str,
) -> Option<f64> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse_number(raw) {
        None => errors.add(field, NOT_A_NUMBER),
        Some(n) if n < *range.start() => errors.add(field, below),
        Some(n) if n > *range.end() => errors.add(field, above),
        Some(n) => return Some(n),
    }
    None
}

fn check_time(errors: &mut FieldErrors, raw: &str) -> Option<NaiveTime> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add("time", REQUIRED);
        return None;
    }
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add("time", "Use HH:MM");
            None
        }
    }
}

// ============================================
// Forms
// ============================================

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);

        errors.into_result(|| LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Empty, or one of the diabetes type wire names
    pub diabetes_type: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", REQUIRED);
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", "Too short");
        }
        let email = check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        let diabetes_type = check_diabetes_type(&mut errors, &self.diabetes_type);

        errors.into_result(|| SignupRequest {
            name,
            email,
            password: self.password.clone(),
            diabetes_type,
        })
    }
}

/// Profile edits; every field may be left empty, which clears it
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub diabetes_type: String,
    pub height_cm: String,
    pub weight_kg: String,
}

impl ProfileForm {
    /// Prefill from the current profile
    pub fn from_profile(profile: &crate::models::UserProfile) -> Self {
        let number = |n: Option<f64>| n.map(|v| v.to_string()).unwrap_or_default();
        Self {
            diabetes_type: profile
                .diabetes_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            height_cm: number(profile.height_cm),
            weight_kg: number(profile.weight_kg),
        }
    }

    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let diabetes_type = check_diabetes_type(&mut errors, &self.diabetes_type);
        let height_cm = check_optional_measure(
            &mut errors,
            "height_cm",
            &self.height_cm,
            HEIGHT_RANGE,
            "Too short",
            "Too tall",
        );
        let weight_kg = check_optional_measure(
            &mut errors,
            "weight_kg",
            &self.weight_kg,
            WEIGHT_RANGE,
            "Too low",
            "Too high",
        );

        errors.into_result(|| ProfileUpdate {
            diabetes_type,
            height_cm,
            weight_kg,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadingForm {
    pub value: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// Empty, `pre_meal` or `post_meal`
    pub context: String,
    pub notes: String,
}

impl ReadingForm {
    pub fn validate(&self) -> Result<ReadingDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let value = if self.value.trim().is_empty() {
            errors.add("value", REQUIRED);
            None
        } else {
            match parse_number(&self.value) {
                None => {
                    errors.add("value", NOT_A_NUMBER);
                    None
                }
                Some(n) if n < *GLUCOSE_RANGE.start() => {
                    errors.add("value", "Must be at least 40");
                    None
                }
                Some(n) if n > *GLUCOSE_RANGE.end() => {
                    errors.add("value", "Must be at most 500");
                    None
                }
                Some(n) => Some(n),
            }
        };

        let date = match self.date.trim() {
            "" => {
                errors.add("date", REQUIRED);
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.add("date", "Use YYYY-MM-DD");
                    None
                }
            },
        };

        let time = check_time(&mut errors, &self.time);

        let context = match self.context.parse::<MealContext>() {
            Ok(c) => c,
            Err(_) => {
                errors.add("context", INVALID);
                MealContext::Unset
            }
        };

        match (value, date, time) {
            (Some(value), Some(date), Some(time)) if errors.is_empty() => Ok(ReadingDraft {
                value,
                date,
                time,
                context,
                notes: optional_text(&self.notes),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MedicationForm {
    pub name: String,
    pub dose: String,
    /// `HH:MM`
    pub time: String,
    /// Empty means pending
    pub status: String,
}

impl MedicationForm {
    pub fn validate(&self) -> Result<MedicationDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = check_required(&mut errors, "name", &self.name);
        let dose = check_required(&mut errors, "dose", &self.dose);
        let time = check_time(&mut errors, &self.time);

        let status = match self.status.trim() {
            "" => MedicationStatus::default(),
            raw => raw.parse().unwrap_or_else(|_| {
                errors.add("status", INVALID);
                MedicationStatus::default()
            }),
        };

        match time {
            Some(time) if errors.is_empty() => Ok(MedicationDraft {
                name,
                dose,
                time,
                status,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MealForm {
    pub name: String,
    pub meal_type: String,
    pub description: String,
}

impl MealForm {
    pub fn validate(&self) -> Result<MealDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = check_required(&mut errors, "name", &self.name);

        errors.into_result(|| MealDraft {
            name,
            meal_type: optional_text(&self.meal_type),
            description: optional_text(&self.description),
        })
    }
}
