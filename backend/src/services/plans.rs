//! Weekly plan read-side service
//!
//! Query companions the dashboards call once plans exist: fetch one plan
//! with its meals and ingredient requirements, list a subscriber's plans,
//! remove a plan.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{WeeklyPlan, WeeklyPlanIngredient, WeeklyPlanMeal};
use crate::services::plan_generation::PlanRow;
use shared::MealType;

/// Service for reading and removing generated weekly plans
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
}

/// One plan with everything it owns
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlanDetail {
    pub plan: WeeklyPlan,
    pub meals: Vec<WeeklyPlanMeal>,
    pub ingredients: Vec<WeeklyPlanIngredient>,
}

/// Database row for a persisted plan meal
#[derive(Debug, sqlx::FromRow)]
struct MealRow {
    id: Uuid,
    weekly_plan_id: Uuid,
    day_number: i32,
    meal_type: String,
    recipe_id: Uuid,
    calories: Decimal,
    protein: Decimal,
    carbs: Decimal,
    fats: Decimal,
}

impl TryFrom<MealRow> for WeeklyPlanMeal {
    type Error = AppError;

    fn try_from(row: MealRow) -> Result<Self, Self::Error> {
        let meal_type = MealType::parse(&row.meal_type)
            .ok_or_else(|| AppError::Internal(format!("Unknown meal type: {}", row.meal_type)))?;
        Ok(WeeklyPlanMeal {
            id: row.id,
            weekly_plan_id: row.weekly_plan_id,
            day_number: row.day_number,
            meal_type,
            recipe_id: row.recipe_id,
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fats: row.fats,
        })
    }
}

/// Database row for a persisted ingredient requirement
#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    id: Uuid,
    weekly_plan_id: Uuid,
    weekly_plan_meal_id: Uuid,
    ingredient_id: Uuid,
    quantity: Decimal,
    unit: String,
    waste_percent: Option<Decimal>,
    adapted_quantity: Decimal,
    consumption_date: NaiveDate,
}

impl From<IngredientRow> for WeeklyPlanIngredient {
    fn from(row: IngredientRow) -> Self {
        WeeklyPlanIngredient {
            id: row.id,
            weekly_plan_id: row.weekly_plan_id,
            weekly_plan_meal_id: row.weekly_plan_meal_id,
            ingredient_id: row.ingredient_id,
            quantity: row.quantity,
            unit: row.unit,
            waste_percent: row.waste_percent,
            adapted_quantity: row.adapted_quantity,
            consumption_date: row.consumption_date,
        }
    }
}

impl PlanService {
    /// Create a new PlanService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get one plan with its meals and ingredient requirements, scoped to
    /// the owning subscriber
    pub async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<WeeklyPlanDetail> {
        let plan = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, user_id, profile_id, plan_template_id, week_start_date,
                   week_end_date, status, total_calories, comment, created_at
            FROM weekly_plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Weekly plan".to_string()))?;

        let meal_rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, weekly_plan_id, day_number, meal_type, recipe_id,
                   calories, protein, carbs, fats
            FROM weekly_plan_meals
            WHERE weekly_plan_id = $1
            ORDER BY day_number ASC, meal_type ASC
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        let ingredient_rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, weekly_plan_id, weekly_plan_meal_id, ingredient_id,
                   quantity, unit, waste_percent, adapted_quantity, consumption_date
            FROM weekly_plan_ingredients
            WHERE weekly_plan_id = $1
            ORDER BY consumption_date ASC, id ASC
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        let meals = meal_rows
            .into_iter()
            .map(WeeklyPlanMeal::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeeklyPlanDetail {
            plan: plan.into(),
            meals,
            ingredients: ingredient_rows.into_iter().map(|r| r.into()).collect(),
        })
    }

    /// List a subscriber's plans, newest week first
    pub async fn list_plans(&self, user_id: Uuid) -> AppResult<Vec<WeeklyPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, user_id, profile_id, plan_template_id, week_start_date,
                   week_end_date, status, total_calories, comment, created_at
            FROM weekly_plans
            WHERE user_id = $1
            ORDER BY week_start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Delete a subscriber's plan; owned meals and ingredient rows cascade
    pub async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM weekly_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Weekly plan".to_string()));
        }
        tracing::info!(user_id = %user_id, plan_id = %plan_id, "Deleted weekly plan");
        Ok(())
    }
}
