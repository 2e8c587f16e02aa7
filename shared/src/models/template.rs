//! Reusable plan templates ("plan base") and their recipe pool

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MealType;

/// Days a template spans when it does not say otherwise
pub const DEFAULT_PLAN_DAYS: i32 = 5;

/// A reusable weekly structure with reference calories/macros and an
/// associated recipe pool. Read-only to the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub id: Uuid,
    pub name: String,
    /// Reference daily calories the recipe figures were written against
    pub base_calories: Option<Decimal>,
    pub base_protein: Option<Decimal>,
    pub base_fat: Option<Decimal>,
    pub days: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl PlanTemplate {
    /// Number of business days one generated plan covers
    pub fn day_count(&self) -> i32 {
        self.days.filter(|d| *d > 0).unwrap_or(DEFAULT_PLAN_DAYS)
    }
}

/// A recipe belonging to one plan template, tagged as a lunch or dinner
/// option and carrying its own reference totals (may be absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub plan_template_id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub calories: Option<Decimal>,
    pub protein: Option<Decimal>,
    pub carbs: Option<Decimal>,
    pub fats: Option<Decimal>,
}

/// One (recipe, ingredient) pair with its base quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub unit: String,
    /// Waste/shrink percentage ("merma"); carried through for procurement,
    /// never applied by the generation engine
    pub waste_percent: Option<Decimal>,
}
