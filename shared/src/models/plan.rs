//! Generated weekly plans ("plan semanal") and their owned rows

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MealType;

/// Status a plan carries from the moment it is generated. The engine never
/// transitions it afterwards; later status changes belong to coaching
/// workflows.
pub const PLAN_STATUS_GENERATED: &str = "generado";

/// Root entity of one generation run. At most one exists per
/// (subscriber, week-start) pair, enforced by delete-then-create rather
/// than a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub plan_template_id: Uuid,
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
    pub status: String,
    pub total_calories: Decimal,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One scheduled meal instance: a (day, meal-type) slot with the chosen
/// recipe and the figures adapted to the subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlanMeal {
    pub id: Uuid,
    pub weekly_plan_id: Uuid,
    pub day_number: i32,
    pub meal_type: MealType,
    pub recipe_id: Uuid,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
}

/// One ingredient requirement derived for a scheduled meal, quantity
/// adapted to the same scaling and pinned to a consumption date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlanIngredient {
    pub id: Uuid,
    pub weekly_plan_id: Uuid,
    pub weekly_plan_meal_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub unit: String,
    pub waste_percent: Option<Decimal>,
    pub adapted_quantity: Decimal,
    pub consumption_date: NaiveDate,
}
