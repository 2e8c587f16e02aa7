//! Subscriber nutrition profile ("ficha técnica")

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subscriber's nutritional targets, written by nutritionist workflows
/// and read-only to the plan generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Daily calorie goal; must be present and positive before generation
    pub target_calories: Option<Decimal>,
    pub target_protein: Option<Decimal>,
    pub target_fat: Option<Decimal>,
    pub target_carbs: Option<Decimal>,
    /// How many meals the day's calories are spread over
    pub meals_per_day: Option<i32>,
    /// Optional explicit per-meal-type calorie fractions, e.g.
    /// `{"lunch": 0.4, "dinner": 0.35}`
    pub calorie_split_spec: Option<serde_json::Value>,
    /// Optional explicit absolute per-meal-type macro targets, e.g.
    /// `{"lunch": {"calories": 650, "protein": 40, "carbs": 60, "fats": 20}}`
    pub macro_split_spec: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
