//! Identity and health attributes of the logged-in user

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Opaque bearer token identifying an authenticated session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Diabetes type as stored on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiabetesType {
    Type1,
    Type2,
    Gestational,
    Prediabetes,
}

impl DiabetesType {
    pub const ALL: [DiabetesType; 4] = [
        DiabetesType::Type1,
        DiabetesType::Type2,
        DiabetesType::Gestational,
        DiabetesType::Prediabetes,
    ];

    /// Wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            DiabetesType::Type1 => "type1",
            DiabetesType::Type2 => "type2",
            DiabetesType::Gestational => "gestational",
            DiabetesType::Prediabetes => "prediabetes",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DiabetesType::Type1 => "Type 1",
            DiabetesType::Type2 => "Type 2",
            DiabetesType::Gestational => "Gestational",
            DiabetesType::Prediabetes => "Prediabetes",
        }
    }
}

impl FromStr for DiabetesType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiabetesType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("diabetes type", s))
    }
}

impl fmt::Display for DiabetesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            diabetes_type: None,
            height_cm: None,
            weight_kg: None,
            created_at: None,
        }
    }

    /// Both height and weight are set to something other than zero
    pub fn has_body_metrics(&self) -> bool {
        let set = |v: Option<f64>| v.map(|x| x != 0.0).unwrap_or(false);
        set(self.height_cm) && set(self.weight_kg)
    }

    pub fn diabetes_type_label(&self) -> &'static str {
        self.diabetes_type
            .map(|t| t.label())
            .unwrap_or("Not set")
    }
}

/// BMI band reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        };
        f.write_str(s)
    }
}

/// Response of the BMI endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    pub bmi: f64,
    pub category: BmiCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let token = Credential::new("tok123");
        assert_eq!(format!("{:?}", token), "Credential(***)");
        assert_eq!(token.bearer(), "Bearer tok123");
    }

    #[test]
    fn test_profile_minimal_payload() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"name": "A", "email": "a@b.com"}"#).unwrap();
        assert_eq!(profile, UserProfile::new("A", "a@b.com"));
        assert_eq!(profile.diabetes_type_label(), "Not set");
        assert!(!profile.has_body_metrics());
    }

    #[test]
    fn test_profile_with_null_type() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 3, "name": "A", "email": "a@b.com", "diabetes_type": null, "created_at": null}"#,
        )
        .unwrap();
        assert_eq!(profile.id, Some(3));
        assert_eq!(profile.diabetes_type, None);
    }

    #[test]
    fn test_body_metrics_treat_zero_as_missing() {
        let mut profile = UserProfile::new("A", "a@b.com");
        profile.height_cm = Some(170.0);
        profile.weight_kg = Some(0.0);
        assert!(!profile.has_body_metrics());

        profile.weight_kg = Some(70.0);
        assert!(profile.has_body_metrics());
    }

    #[test]
    fn test_diabetes_type_parsing() {
        assert_eq!("type2".parse::<DiabetesType>().unwrap(), DiabetesType::Type2);
        assert!("type3".parse::<DiabetesType>().is_err());
        assert_eq!(
            serde_json::to_string(&DiabetesType::Gestational).unwrap(),
            r#""gestational""#
        );
    }

    #[test]
    fn test_bmi_report_decoding() {
        let report: BmiReport =
            serde_json::from_str(r#"{"bmi": 24.2, "category": "Normal"}"#).unwrap();
        assert_eq!(report.category, BmiCategory::Normal);
        assert_eq!(report.category.to_string(), "Normal");
    }
}
