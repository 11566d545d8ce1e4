//! Glucose Classifier
//!
//! Two threshold tables keyed by meal context:
//!
//! ```text
//! pre_meal:           < 80 low | 80..=130 normal | > 130 high
//! post_meal / unset:  < 180 normal | >= 180 high
//! ```
//!
//! The post-meal table has no low band.

use serde::Serialize;
use std::fmt;

use crate::models::MealContext;

const PRE_MEAL_LOW: f64 = 80.0;
const PRE_MEAL_HIGH: f64 = 130.0;
const POST_MEAL_HIGH: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseStatus {
    Low,
    Normal,
    High,
}

impl GlucoseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseStatus::Low => "low",
            GlucoseStatus::Normal => "normal",
            GlucoseStatus::High => "high",
        }
    }
}

impl fmt::Display for GlucoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color paired with a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    Goldenrod,
    Green,
    Crimson,
}

impl SeverityColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityColor::Goldenrod => "goldenrod",
            SeverityColor::Green => "green",
            SeverityColor::Crimson => "crimson",
        }
    }
}

impl fmt::Display for SeverityColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: GlucoseStatus,
    pub color: SeverityColor,
}

impl Classification {
    const LOW: Self = Self {
        status: GlucoseStatus::Low,
        color: SeverityColor::Goldenrod,
    };
    const NORMAL: Self = Self {
        status: GlucoseStatus::Normal,
        color: SeverityColor::Green,
    };
    const HIGH: Self = Self {
        status: GlucoseStatus::High,
        color: SeverityColor::Crimson,
    };
}

/// Classify a glucose value (mg/dL) for the given meal context
pub fn classify(value: f64, context: MealContext) -> Classification {
    match context {
        MealContext::PreMeal => {
            if value < PRE_MEAL_LOW {
                Classification::LOW
            } else if value <= PRE_MEAL_HIGH {
                Classification::NORMAL
            } else {
                Classification::HIGH
            }
        }
        MealContext::PostMeal | MealContext::Unset => {
            if value < POST_MEAL_HIGH {
                Classification::NORMAL
            } else {
                Classification::HIGH
            }
        }
    }
}
