//! Validation helpers for plan generation inputs

use rust_decimal::Decimal;

use crate::models::{NutritionProfile, Recipe};

/// A profile qualifies for generation only with a positive calorie target
pub fn validate_profile_for_generation(profile: &NutritionProfile) -> Result<(), &'static str> {
    match profile.target_calories {
        Some(calories) if calories > Decimal::ZERO => Ok(()),
        Some(_) => Err("Target calories must be positive"),
        None => Err("Nutrition profile has no calorie target"),
    }
}

/// A template must bring at least one recipe to generate from
pub fn validate_recipe_pool(recipes: &[Recipe]) -> Result<(), &'static str> {
    if recipes.is_empty() {
        Err("Plan template has no recipes")
    } else {
        Ok(())
    }
}

/// Calorie fractions are expected inside (0, 1]
pub fn validate_fraction(fraction: Decimal) -> Result<(), &'static str> {
    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        Err("Calorie fraction must be within (0, 1]")
    } else {
        Ok(())
    }
}
