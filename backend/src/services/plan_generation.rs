//! Weekly plan generation service
//!
//! Orchestrates one generation run: load the subscriber's nutrition profile
//! and the plan template, assemble the week with the pure engine in
//! `shared`, then persist the plan, its meals and its derived ingredient
//! requirements. Generation is destructive-idempotent: any existing plan
//! for the same (subscriber, week) is deleted and replaced, never added to.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    NutritionProfile, PlanTemplate, Recipe, RecipeIngredient, WeeklyPlan, PLAN_STATUS_GENERATED,
};
use shared::{
    assemble_weekly_plan, calorie_distribution, calorie_scaling, consumption_date,
    validate_profile_for_generation, validate_recipe_pool, MealAssignment, MealType,
    WeeklyPlanDraft,
};

/// Service generating subscriber-specific weekly plans
#[derive(Clone)]
pub struct PlanGenerationService {
    db: PgPool,
}

/// Input for one generation run
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateWeeklyPlanInput {
    pub user_id: Uuid,
    pub plan_base_id: Uuid,
    /// First day of the target week, "YYYY-MM-DD"
    pub week_start_date: NaiveDate,
}

/// Result of one generation run: the persisted plan root and the
/// pre-persistence meal assignments the schedule was built from
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedWeeklyPlan {
    pub plan: WeeklyPlan,
    pub meals: Vec<MealAssignment>,
}

/// Database row for a nutrition profile
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    target_calories: Option<Decimal>,
    target_protein: Option<Decimal>,
    target_fat: Option<Decimal>,
    target_carbs: Option<Decimal>,
    meals_per_day: Option<i32>,
    calorie_split_spec: Option<serde_json::Value>,
    macro_split_spec: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for NutritionProfile {
    fn from(row: ProfileRow) -> Self {
        NutritionProfile {
            id: row.id,
            user_id: row.user_id,
            target_calories: row.target_calories,
            target_protein: row.target_protein,
            target_fat: row.target_fat,
            target_carbs: row.target_carbs,
            meals_per_day: row.meals_per_day,
            calorie_split_spec: row.calorie_split_spec,
            macro_split_spec: row.macro_split_spec,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a plan template
#[derive(Debug, sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    name: String,
    base_calories: Option<Decimal>,
    base_protein: Option<Decimal>,
    base_fat: Option<Decimal>,
    days: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<TemplateRow> for PlanTemplate {
    fn from(row: TemplateRow) -> Self {
        PlanTemplate {
            id: row.id,
            name: row.name,
            base_calories: row.base_calories,
            base_protein: row.base_protein,
            base_fat: row.base_fat,
            days: row.days,
            created_at: row.created_at,
        }
    }
}

/// Database row for a recipe
#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    plan_template_id: Uuid,
    name: String,
    meal_type: String,
    calories: Option<Decimal>,
    protein: Option<Decimal>,
    carbs: Option<Decimal>,
    fats: Option<Decimal>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = AppError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let meal_type = MealType::parse(&row.meal_type)
            .ok_or_else(|| AppError::Internal(format!("Unknown meal type: {}", row.meal_type)))?;
        Ok(Recipe {
            id: row.id,
            plan_template_id: row.plan_template_id,
            name: row.name,
            meal_type,
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fats: row.fats,
        })
    }
}

/// Database row for a recipe ingredient
#[derive(Debug, sqlx::FromRow)]
struct RecipeIngredientRow {
    id: Uuid,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    quantity: Decimal,
    unit: String,
    waste_percent: Option<Decimal>,
}

impl From<RecipeIngredientRow> for RecipeIngredient {
    fn from(row: RecipeIngredientRow) -> Self {
        RecipeIngredient {
            id: row.id,
            recipe_id: row.recipe_id,
            ingredient_id: row.ingredient_id,
            quantity: row.quantity,
            unit: row.unit,
            waste_percent: row.waste_percent,
        }
    }
}

/// Database row for a weekly plan
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlanRow {
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

impl From<PlanRow> for WeeklyPlan {
    fn from(row: PlanRow) -> Self {
        WeeklyPlan {
            id: row.id,
            user_id: row.user_id,
            profile_id: row.profile_id,
            plan_template_id: row.plan_template_id,
            week_start_date: row.week_start_date,
            week_end_date: row.week_end_date,
            status: row.status,
            total_calories: row.total_calories,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

/// Inserted meal row, as returned by the batch insert
#[derive(Debug, sqlx::FromRow)]
struct InsertedMealRow {
    id: Uuid,
    day_number: i32,
    meal_type: String,
    recipe_id: Uuid,
}

impl PlanGenerationService {
    /// Create a new PlanGenerationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Generate the weekly plan for one subscriber and one week.
    ///
    /// The whole replacement (delete old plan, insert plan, meals and
    /// ingredient requirements) runs inside a single transaction guarded by
    /// a Postgres advisory lock on (user, week start), so concurrent calls
    /// for the same pair serialize and a failed run leaves no orphaned
    /// plan behind.
    pub async fn generate_weekly_plan(
        &self,
        input: GenerateWeeklyPlanInput,
    ) -> AppResult<GeneratedWeeklyPlan> {
        let profile = self.load_profile(input.user_id).await?;
        let template = self.load_template(input.plan_base_id).await?;
        let recipes = self.load_recipes(input.plan_base_id).await?;

        let draft = assemble_weekly_plan(&profile, &template, &recipes, input.week_start_date);
        tracing::debug!(
            user_id = %input.user_id,
            days = draft.days.len(),
            meals = draft.meals.len(),
            "Assembled weekly plan"
        );

        let mut tx = self.db.begin().await?;
        self.lock_generation(&mut tx, input.user_id, input.week_start_date)
            .await?;
        self.delete_existing_plan(&mut tx, input.user_id, input.week_start_date)
            .await?;
        let plan = self
            .insert_plan(&mut tx, &input, &profile, &template, &draft)
            .await?;
        let inserted_meals = self.insert_meals(&mut tx, plan.id, &draft).await?;
        self.insert_ingredient_requirements(
            &mut tx,
            plan.id,
            &profile,
            &template,
            &recipes,
            &draft,
            &inserted_meals,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %input.user_id,
            plan_id = %plan.id,
            week_start = %input.week_start_date,
            meals = draft.meals.len(),
            "Generated weekly plan"
        );

        Ok(GeneratedWeeklyPlan {
            plan,
            meals: draft.meals,
        })
    }

    /// Load and validate the subscriber's nutrition profile
    async fn load_profile(&self, user_id: Uuid) -> AppResult<NutritionProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, target_calories, target_protein, target_fat, target_carbs,
                   meals_per_day, calorie_split_spec, macro_split_spec, created_at, updated_at
            FROM nutrition_profiles
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Validation {
            field: "user_id".to_string(),
            message: "Subscriber has no nutrition profile".to_string(),
            message_es: "El suscriptor no tiene ficha técnica".to_string(),
        })?;

        let profile: NutritionProfile = row.into();
        validate_profile_for_generation(&profile).map_err(|msg| AppError::Validation {
            field: "target_calories".to_string(),
            message: msg.to_string(),
            message_es: "La ficha técnica no tiene un objetivo calórico válido".to_string(),
        })?;
        Ok(profile)
    }

    /// Load the plan template by id
    async fn load_template(&self, plan_base_id: Uuid) -> AppResult<PlanTemplate> {
        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, name, base_calories, base_protein, base_fat, days, created_at
            FROM plan_templates
            WHERE id = $1
            "#,
        )
        .bind(plan_base_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan template".to_string()))?;

        Ok(row.into())
    }

    /// Load the template's recipe pool; an empty pool blocks generation
    async fn load_recipes(&self, plan_base_id: Uuid) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, plan_template_id, name, meal_type, calories, protein, carbs, fats
            FROM recipes
            WHERE plan_template_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(plan_base_id)
        .fetch_all(&self.db)
        .await?;

        let recipes = rows
            .into_iter()
            .map(Recipe::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        validate_recipe_pool(&recipes).map_err(|msg| AppError::Validation {
            field: "plan_base_id".to_string(),
            message: msg.to_string(),
            message_es: "El plan base no tiene recetas asociadas".to_string(),
        })?;
        Ok(recipes)
    }

    /// Serialize concurrent generation for the same (subscriber, week)
    async fn lock_generation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("weekly-plan:{}:{}", user_id, week_start))
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Delete any existing plan for the pair; meals and ingredient rows
    /// cascade with it
    async fn delete_existing_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> AppResult<()> {
        let replaced: Vec<(Uuid,)> = sqlx::query_as(
            "DELETE FROM weekly_plans WHERE user_id = $1 AND week_start_date = $2 RETURNING id",
        )
        .bind(user_id)
        .bind(week_start)
        .fetch_all(&mut **tx)
        .await?;

        for (plan_id,) in &replaced {
            tracing::info!(user_id = %user_id, plan_id = %plan_id, "Replacing existing weekly plan");
        }
        Ok(())
    }

    /// Persist the plan root row
    async fn insert_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        input: &GenerateWeeklyPlanInput,
        profile: &NutritionProfile,
        template: &PlanTemplate,
        draft: &WeeklyPlanDraft,
    ) -> AppResult<WeeklyPlan> {
        let comment = format!(
            "Generado automáticamente el {}",
            Utc::now().format("%d/%m/%Y %H:%M")
        );
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO weekly_plans (
                user_id, profile_id, plan_template_id, week_start_date, week_end_date,
                status, total_calories, comment
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, profile_id, plan_template_id, week_start_date,
                      week_end_date, status, total_calories, comment, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(profile.id)
        .bind(template.id)
        .bind(draft.week_start)
        .bind(draft.week_end)
        .bind(PLAN_STATUS_GENERATED)
        .bind(draft.total_calories)
        .bind(&comment)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    /// Batch-insert every pending meal row in one statement
    async fn insert_meals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan_id: Uuid,
        draft: &WeeklyPlanDraft,
    ) -> AppResult<Vec<InsertedMealRow>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO weekly_plan_meals \
             (weekly_plan_id, day_number, meal_type, recipe_id, calories, protein, carbs, fats) ",
        );
        builder.push_values(draft.meals.iter(), |mut row, meal| {
            row.push_bind(plan_id)
                .push_bind(meal.day_number)
                .push_bind(meal.meal_type.as_str())
                .push_bind(meal.recipe_id)
                .push_bind(meal.macros.calories)
                .push_bind(meal.macros.protein)
                .push_bind(meal.macros.carbs)
                .push_bind(meal.macros.fats);
        });
        builder.push(" RETURNING id, day_number, meal_type, recipe_id");

        let inserted: Vec<InsertedMealRow> = builder
            .build_query_as()
            .fetch_all(&mut **tx)
            .await?;

        if inserted.len() != draft.meals.len() {
            return Err(AppError::StorageError(format!(
                "Expected {} inserted meal rows, got {}",
                draft.meals.len(),
                inserted.len()
            )));
        }
        Ok(inserted)
    }

    /// Expand every inserted meal's recipe into adapted ingredient
    /// requirement rows and batch-insert them.
    ///
    /// Recipe-ingredient lookups are cached per recipe id for the duration
    /// of this run, so a recipe reused across days is fetched once. The
    /// quantity scaling always follows the calorie ratio of the meal slot;
    /// an explicit macro target that overrode the meal's persisted figures
    /// does not participate here.
    #[allow(clippy::too_many_arguments)]
    async fn insert_ingredient_requirements(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan_id: Uuid,
        profile: &NutritionProfile,
        template: &PlanTemplate,
        recipes: &[Recipe],
        draft: &WeeklyPlanDraft,
        inserted_meals: &[InsertedMealRow],
    ) -> AppResult<()> {
        let target_calories = profile.target_calories.unwrap_or(Decimal::ZERO);
        let calorie_split = calorie_distribution(profile);
        let recipes_by_id: HashMap<Uuid, &Recipe> = recipes.iter().map(|r| (r.id, r)).collect();
        let mut ingredient_cache: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();

        struct PendingIngredient {
            meal_id: Uuid,
            ingredient_id: Uuid,
            quantity: Decimal,
            unit: String,
            waste_percent: Option<Decimal>,
            adapted_quantity: Decimal,
            consumption_date: NaiveDate,
        }

        let mut pending: Vec<PendingIngredient> = Vec::new();
        for meal in inserted_meals {
            let meal_type = MealType::parse(&meal.meal_type).ok_or_else(|| {
                AppError::Internal(format!("Unknown meal type: {}", meal.meal_type))
            })?;
            let recipe = recipes_by_id.get(&meal.recipe_id).ok_or_else(|| {
                AppError::Internal(format!("Meal references unknown recipe {}", meal.recipe_id))
            })?;

            if !ingredient_cache.contains_key(&meal.recipe_id) {
                let ingredients = self.load_recipe_ingredients(tx, meal.recipe_id).await?;
                ingredient_cache.insert(meal.recipe_id, ingredients);
            }
            let ingredients = &ingredient_cache[&meal.recipe_id];

            let scaling = calorie_scaling(
                target_calories,
                template.base_calories,
                calorie_split.fraction(meal_type),
                recipe.calories,
            );
            let date = consumption_date(&draft.days, meal.day_number, draft.week_start);

            for ingredient in ingredients {
                pending.push(PendingIngredient {
                    meal_id: meal.id,
                    ingredient_id: ingredient.ingredient_id,
                    quantity: ingredient.quantity,
                    unit: ingredient.unit.clone(),
                    waste_percent: ingredient.waste_percent,
                    adapted_quantity: shared::adapt_quantity(ingredient.quantity, scaling),
                    consumption_date: date,
                });
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO weekly_plan_ingredients \
             (weekly_plan_id, weekly_plan_meal_id, ingredient_id, quantity, unit, \
              waste_percent, adapted_quantity, consumption_date) ",
        );
        builder.push_values(pending.iter(), |mut row, item| {
            row.push_bind(plan_id)
                .push_bind(item.meal_id)
                .push_bind(item.ingredient_id)
                .push_bind(item.quantity)
                .push_bind(&item.unit)
                .push_bind(item.waste_percent)
                .push_bind(item.adapted_quantity)
                .push_bind(item.consumption_date);
        });

        let result = builder.build().execute(&mut **tx).await?;
        if result.rows_affected() != pending.len() as u64 {
            return Err(AppError::StorageError(format!(
                "Expected {} inserted ingredient rows, got {}",
                pending.len(),
                result.rows_affected()
            )));
        }
        Ok(())
    }

    /// Ingredient list for one recipe, fetched inside the generation
    /// transaction
    async fn load_recipe_ingredients(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: Uuid,
    ) -> AppResult<Vec<RecipeIngredient>> {
        let rows = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            SELECT id, recipe_id, ingredient_id, quantity, unit, waste_percent
            FROM recipe_ingredients
            WHERE recipe_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
