//! Per-meal budget derivation from a goal profile and the user's daily settings

use crate::presets::GoalProfile;
use crate::types::{DailySettings, MealBudget, MealType};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Meal slots counted for the day. The requested meal always counts.
pub fn meal_slots(meal_type: MealType, daily: &DailySettings) -> Vec<MealType> {
    MealType::ALL
        .into_iter()
        .filter(|slot| match slot {
            MealType::Breakfast => daily.include_breakfast || meal_type == MealType::Breakfast,
            MealType::Snack => daily.include_snacks || meal_type == MealType::Snack,
            MealType::Lunch | MealType::Dinner => true,
        })
        .collect()
}

/// Fraction of the daily target assigned to `meal_type`
pub fn meal_share(meal_type: MealType, daily: &DailySettings) -> f64 {
    let total: f64 = meal_slots(meal_type, daily)
        .iter()
        .map(|slot| slot.daily_share())
        .sum();
    meal_type.daily_share() / total
}

/// Derive the budget for one meal. Pure; call again whenever settings change.
pub fn compute_meal_budget(profile: &GoalProfile, daily: &DailySettings, meal_type: MealType) -> MealBudget {
    let daily_kcal = daily
        .daily_calories
        .filter(|kcal| kcal.is_finite() && *kcal > 0.0)
        .unwrap_or(profile.daily_calories);

    let share = meal_share(meal_type, daily);
    let kcal_target = daily_kcal * share;

    let tolerance = match meal_type {
        MealType::Breakfast => profile.breakfast_tolerance,
        _ => profile.tolerance,
    };

    MealBudget {
        meal_type,
        kcal_target,
        protein_target_g: kcal_target * profile.protein_ratio / KCAL_PER_G_PROTEIN,
        carb_target_g: kcal_target * profile.carb_ratio / KCAL_PER_G_CARB,
        fat_target_g: kcal_target * profile.fat_ratio / KCAL_PER_G_FAT,
        fiber_min_g: profile.fiber_daily_g * share,
        sugar_soft_cap_g: profile.sugar_soft_cap_daily_g * share,
        sugar_hard_cap_g: profile.sugar_hard_cap_daily_g * share,
        tolerance,
    }
}
