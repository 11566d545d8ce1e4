//! Medications and their intake status

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{clock_time, UnknownVariant};

/// Intake status of a scheduled medication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    #[default]
    Pending,
    Taken,
    Missed,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Pending => "pending",
            MedicationStatus::Taken => "taken",
            MedicationStatus::Missed => "missed",
        }
    }
}

impl FromStr for MedicationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(MedicationStatus::Pending),
            "taken" => Ok(MedicationStatus::Taken),
            "missed" => Ok(MedicationStatus::Missed),
            other => Err(UnknownVariant::new("medication status", other)),
        }
    }
}

impl fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A medication reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub dose: String,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    #[serde(default)]
    pub status: MedicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}
