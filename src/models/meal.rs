//! Meals and their links to readings

use serde::{Deserialize, Serialize};

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    /// breakfast, lunch, dinner or snack
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Confirmation returned when a meal is attached to a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLink {
    #[serde(default)]
    pub message: String,
    pub reading_id: i64,
    pub meal_id: i64,
    #[serde(default)]
    pub carbs_amount: Option<f64>,
}
