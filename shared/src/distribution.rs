//! Calorie and macro distribution resolution
//!
//! Turns a nutrition profile into per-meal-type calorie fractions and
//! optional absolute macro targets. The profile's split specs are opaque
//! JSON written by nutritionist tooling; entries found there win over the
//! derived defaults.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::models::NutritionProfile;
use crate::types::{MealMacros, MealType};

/// Assumed when a profile does not say how many meals it spreads the day over
pub const DEFAULT_MEALS_PER_DAY: i32 = 2;

const PROTEIN_KCAL_PER_GRAM: u32 = 4;
const CARBS_KCAL_PER_GRAM: u32 = 4;
const FAT_KCAL_PER_GRAM: u32 = 9;

/// Fraction of the daily calorie target attributable to each meal type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieSplit {
    pub lunch: Decimal,
    pub dinner: Decimal,
}

impl CalorieSplit {
    pub fn fraction(&self, meal: MealType) -> Decimal {
        match meal {
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }
}

/// Optional explicit absolute macro targets per meal type. When present for
/// a meal type these take precedence over per-recipe scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroSplit {
    pub lunch: Option<MealMacros>,
    pub dinner: Option<MealMacros>,
}

impl MacroSplit {
    pub fn target(&self, meal: MealType) -> Option<MealMacros> {
        match meal {
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }
}

/// Per-meal-type calorie fractions for a profile. An explicit fraction in
/// `calorie_split_spec` wins; otherwise each meal type gets an equal
/// `1 / meals_per_day` share of the day.
pub fn calorie_distribution(profile: &NutritionProfile) -> CalorieSplit {
    let meals = profile
        .meals_per_day
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_MEALS_PER_DAY);
    let default = Decimal::ONE / Decimal::from(meals);
    let spec = profile.calorie_split_spec.as_ref();
    CalorieSplit {
        lunch: fraction_override(spec, MealType::Lunch).unwrap_or(default),
        dinner: fraction_override(spec, MealType::Dinner).unwrap_or(default),
    }
}

/// Explicit absolute macro targets from `macro_split_spec`, if any. A
/// target without a calorie figure gets one derived from its macros at
/// 4/4/9 kcal per gram.
pub fn macro_distribution(profile: &NutritionProfile) -> MacroSplit {
    let Some(spec) = profile.macro_split_spec.as_ref() else {
        return MacroSplit::default();
    };
    MacroSplit {
        lunch: macro_override(spec, MealType::Lunch),
        dinner: macro_override(spec, MealType::Dinner),
    }
}

fn fraction_override(spec: Option<&Value>, meal: MealType) -> Option<Decimal> {
    let value = spec?.get(meal.as_str())?;
    serde_json::from_value::<Decimal>(value.clone())
        .ok()
        .filter(|f| *f > Decimal::ZERO)
}

#[derive(Debug, Deserialize)]
struct RawMacroTarget {
    calories: Option<Decimal>,
    protein: Option<Decimal>,
    carbs: Option<Decimal>,
    fats: Option<Decimal>,
}

fn macro_override(spec: &Value, meal: MealType) -> Option<MealMacros> {
    let raw: RawMacroTarget = serde_json::from_value(spec.get(meal.as_str())?.clone()).ok()?;
    let protein = raw.protein.unwrap_or(Decimal::ZERO);
    let carbs = raw.carbs.unwrap_or(Decimal::ZERO);
    let fats = raw.fats.unwrap_or(Decimal::ZERO);
    let calories = raw.calories.unwrap_or_else(|| {
        protein * Decimal::from(PROTEIN_KCAL_PER_GRAM)
            + carbs * Decimal::from(CARBS_KCAL_PER_GRAM)
            + fats * Decimal::from(FAT_KCAL_PER_GRAM)
    });
    Some(MealMacros {
        calories,
        protein,
        carbs,
        fats,
    })
}
