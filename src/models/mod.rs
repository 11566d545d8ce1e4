//! Domain Types
//!
//! Types shared between the API client, the session store and the views.
//! Everything here mirrors the JSON shapes of the remote diabetes API.

mod meal;
mod medication;
mod profile;
mod reading;

pub use meal::{Meal, MealLink};
pub use medication::{Medication, MedicationStatus};
pub use profile::{BmiCategory, BmiReport, Credential, DiabetesType, UserProfile};
pub use reading::{Evaluation, MealContext, Reading};

use thiserror::Error;

/// A string did not name any variant of a closed enumeration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Clock times travel as `HH:MM` on requests; the server answers with
/// `HH:MM:SS`. Both are accepted when decoding.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S%.f"))
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
    }

    pub fn format(time: &NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_clock_time_accepts_both_forms() {
        let expected = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(clock_time::parse("08:00").unwrap(), expected);
        assert_eq!(clock_time::parse("08:00:00").unwrap(), expected);
        assert!(clock_time::parse("8 o'clock").is_err());
    }

    #[test]
    fn test_clock_time_formats_without_seconds() {
        let t = NaiveTime::from_hms_opt(20, 5, 30).unwrap();
        assert_eq!(clock_time::format(&t), "20:05");
    }

    #[test]
    fn test_unknown_variant_display() {
        let err = UnknownVariant::new("meal context", "brunch");
        assert_eq!(err.to_string(), "invalid meal context: 'brunch'");
    }
}
