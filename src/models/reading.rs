//! Glucose readings

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{clock_time, UnknownVariant};

/// Meal context of a reading; selects the classifier's threshold table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MealContext {
    #[default]
    Unset,
    PreMeal,
    PostMeal,
}

impl MealContext {
    /// Wire form; `None` for an unset context
    pub fn as_wire(&self) -> Option<&'static str> {
        match self {
            MealContext::Unset => None,
            MealContext::PreMeal => Some("pre_meal"),
            MealContext::PostMeal => Some("post_meal"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealContext::Unset => "n/a",
            MealContext::PreMeal => "pre-meal",
            MealContext::PostMeal => "post-meal",
        }
    }
}

impl FromStr for MealContext {
    type Err = UnknownVariant;

    /// The empty string is an unset context, as submitted by an untouched select.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(MealContext::Unset),
            "pre_meal" => Ok(MealContext::PreMeal),
            "post_meal" => Ok(MealContext::PostMeal),
            other => Err(UnknownVariant::new("meal context", other)),
        }
    }
}

impl fmt::Display for MealContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for MealContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_wire() {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for MealContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(MealContext::Unset),
            Some(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Server-side evaluation attached to readings that carry a context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: String,
    pub color: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// A glucose measurement in mg/dL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    #[serde(default)]
    pub context: MealContext,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_from_server_payload() {
        let json = r#"{
            "id": 7,
            "value": 95.0,
            "date": "2024-01-01",
            "time": "08:00:00",
            "notes": null,
            "context": "pre_meal",
            "created_at": "2024-01-01T08:01:00",
            "user_id": 1,
            "evaluation": {"status": "normal", "color": "green", "suggestions": ["Stay hydrated."]}
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.id, 7);
        assert_eq!(reading.context, MealContext::PreMeal);
        assert_eq!(reading.time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(reading.evaluation.unwrap().status, "normal");
    }

    #[test]
    fn test_missing_or_null_context_is_unset() {
        let reading: Reading = serde_json::from_str(
            r#"{"id": 1, "value": 150, "date": "2024-02-03", "time": "12:30", "context": null}"#,
        )
        .unwrap();
        assert_eq!(reading.context, MealContext::Unset);

        let reading: Reading = serde_json::from_str(
            r#"{"id": 2, "value": 150, "date": "2024-02-03", "time": "12:30"}"#,
        )
        .unwrap();
        assert_eq!(reading.context, MealContext::Unset);
    }

    #[test]
    fn test_meal_context_parsing() {
        assert_eq!("".parse::<MealContext>().unwrap(), MealContext::Unset);
        assert_eq!("post_meal".parse::<MealContext>().unwrap(), MealContext::PostMeal);
        assert!("bedtime".parse::<MealContext>().is_err());
    }

    #[test]
    fn test_unset_context_serializes_as_null() {
        assert_eq!(serde_json::to_string(&MealContext::Unset).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&MealContext::PreMeal).unwrap(),
            r#""pre_meal""#
        );
    }
}
