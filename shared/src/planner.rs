//! Pure weekly plan assembly
//!
//! Deterministic, I/O-free composition of the calendar builder, the
//! distribution resolver and the meal scaling engine. The backend
//! orchestrator loads the inputs, calls [`assemble_weekly_plan`] and
//! persists the result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{build_business_days, BusinessDay};
use crate::distribution::{calorie_distribution, macro_distribution};
use crate::models::{NutritionProfile, PlanTemplate, Recipe};
use crate::scaling::{round_robin, scale_meal, MACRO_DECIMALS};
use crate::types::{MealMacros, MealType};

/// One pending meal row: a (day, meal-type) slot with its chosen recipe and
/// adapted figures, before persistence assigns ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealAssignment {
    pub day_number: i32,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: Uuid,
    #[serde(flatten)]
    pub macros: MealMacros,
}

/// Everything one generation run computes before touching storage
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlanDraft {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<BusinessDay>,
    pub total_calories: Decimal,
    pub meals: Vec<MealAssignment>,
}

/// Assemble the meal schedule for one subscriber and one week.
///
/// Recipes rotate round-robin per meal type across the template's business
/// days. A meal type with no recipes of its own borrows the full unfiltered
/// pool rather than failing, so a lunch-only template still fills every
/// dinner slot. Callers validate the profile and the recipe pool first; an
/// empty pool here simply yields no meals.
pub fn assemble_weekly_plan(
    profile: &NutritionProfile,
    template: &PlanTemplate,
    recipes: &[Recipe],
    week_start: NaiveDate,
) -> WeeklyPlanDraft {
    let target_calories = profile.target_calories.unwrap_or(Decimal::ZERO);
    let day_count = template.day_count();
    let days = build_business_days(week_start, day_count as usize);
    let week_end = days.last().map(|d| d.date).unwrap_or(week_start);

    let calorie_split = calorie_distribution(profile);
    let macro_split = macro_distribution(profile);

    let lunch_pool = meal_pool(recipes, MealType::Lunch);
    let dinner_pool = meal_pool(recipes, MealType::Dinner);

    let mut meals = Vec::with_capacity(days.len() * MealType::ALL.len());
    for (day_index, day) in days.iter().enumerate() {
        for meal_type in MealType::ALL {
            let pool = match meal_type {
                MealType::Lunch => &lunch_pool,
                MealType::Dinner => &dinner_pool,
            };
            let Some(recipe) = round_robin(pool, day_index) else {
                continue;
            };
            let macros = scale_meal(
                target_calories,
                template.base_calories,
                calorie_split.fraction(meal_type),
                recipe,
                macro_split.target(meal_type),
            );
            meals.push(MealAssignment {
                day_number: day.day_number,
                date: day.date,
                meal_type,
                recipe_id: recipe.id,
                macros,
            });
        }
    }

    WeeklyPlanDraft {
        week_start,
        week_end,
        days,
        total_calories: (target_calories * Decimal::from(day_count)).round_dp(MACRO_DECIMALS),
        meals,
    }
}

/// Recipes eligible for a meal type. An empty tagged pool borrows the full
/// unfiltered set, so recipes may serve the other slot when a template only
/// covers one.
pub fn meal_pool(recipes: &[Recipe], meal: MealType) -> Vec<&Recipe> {
    let tagged: Vec<&Recipe> = recipes.iter().filter(|r| r.meal_type == meal).collect();
    if tagged.is_empty() {
        recipes.iter().collect()
    } else {
        tagged
    }
}
