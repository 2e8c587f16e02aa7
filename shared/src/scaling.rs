//! Meal scaling engine
//!
//! Rescales a template recipe's figures to a subscriber's daily calorie
//! target for one (day, meal-type) slot.

use rust_decimal::Decimal;

use crate::models::Recipe;
use crate::types::MealMacros;

/// Decimal places kept on persisted calorie/macro figures
pub const MACRO_DECIMALS: u32 = 2;

/// Decimal places kept on persisted ingredient quantities
pub const QUANTITY_DECIMALS: u32 = 4;

/// Calorie-ratio scaling for one meal slot.
///
/// The meal's target is `target_calories * ratio`. Its baseline is the
/// recipe's own calorie total when positive, else the template's
/// `base_calories * ratio` when both are positive. When a baseline exists
/// the scaling is `target / baseline`; otherwise it falls back to the
/// plan-wide `target_calories / base_calories`, and to `1` when the
/// template carries no base reference at all.
pub fn calorie_scaling(
    target_calories: Decimal,
    base_calories: Option<Decimal>,
    ratio: Decimal,
    recipe_calories: Option<Decimal>,
) -> Decimal {
    let meal_target = target_calories * ratio;
    let base_meal = recipe_calories
        .filter(|c| *c > Decimal::ZERO)
        .or_else(|| match base_calories {
            Some(base) if base > Decimal::ZERO && ratio > Decimal::ZERO => Some(base * ratio),
            _ => None,
        });
    match base_meal {
        Some(base) if meal_target > Decimal::ZERO => meal_target / base,
        _ => match base_calories {
            Some(base) if base > Decimal::ZERO => target_calories / base,
            _ => Decimal::ONE,
        },
    }
}

/// Adapted figures for one (day, meal-type, recipe) combination.
///
/// An explicit `macro_target` wins verbatim and the recipe's own macros are
/// ignored entirely. Otherwise every figure is the recipe's value times the
/// calorie-ratio scaling, with calories falling back to the meal's target
/// when the recipe carries no calorie total. All values are rounded to two
/// decimal places.
pub fn scale_meal(
    target_calories: Decimal,
    base_calories: Option<Decimal>,
    ratio: Decimal,
    recipe: &Recipe,
    macro_target: Option<MealMacros>,
) -> MealMacros {
    if let Some(target) = macro_target {
        return MealMacros {
            calories: target.calories.round_dp(MACRO_DECIMALS),
            protein: target.protein.round_dp(MACRO_DECIMALS),
            carbs: target.carbs.round_dp(MACRO_DECIMALS),
            fats: target.fats.round_dp(MACRO_DECIMALS),
        };
    }

    let scaling = calorie_scaling(target_calories, base_calories, ratio, recipe.calories);
    let calories = match recipe.calories {
        Some(c) => c * scaling,
        None => target_calories * ratio,
    };
    MealMacros {
        calories: calories.round_dp(MACRO_DECIMALS),
        protein: (recipe.protein.unwrap_or(Decimal::ZERO) * scaling).round_dp(MACRO_DECIMALS),
        carbs: (recipe.carbs.unwrap_or(Decimal::ZERO) * scaling).round_dp(MACRO_DECIMALS),
        fats: (recipe.fats.unwrap_or(Decimal::ZERO) * scaling).round_dp(MACRO_DECIMALS),
    }
}

/// Quantity of one recipe ingredient adapted by the calorie-ratio scaling,
/// rounded to four decimal places.
pub fn adapt_quantity(base_quantity: Decimal, scaling: Decimal) -> Decimal {
    (base_quantity * scaling).round_dp(QUANTITY_DECIMALS)
}

/// Round-robin recipe rotation: day `i` (0-based) takes `pool[i % len]`.
/// With one recipe every day repeats it; with at least as many recipes as
/// days every day is distinct.
pub fn round_robin<T>(pool: &[T], day_index: usize) -> Option<&T> {
    if pool.is_empty() {
        None
    } else {
        Some(&pool[day_index % pool.len()])
    }
}
