//! Hard eligibility rules. A candidate passes all of them or is dropped.

use crate::matching::IngredientMatcher;
use crate::types::{MealBudget, MealType, Recipe, UserPreferences};
use serde::Serialize;
use std::fmt;

/// Ceiling multiplier on tolerance. Overshoot is allowed further than undershoot.
pub const CALORIE_CEILING_FACTOR: f64 = 1.6;
/// Floor multiplier on tolerance.
pub const CALORIE_FLOOR_FACTOR: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardConstraints {
    pub max_calories: f64,
    pub min_calories: f64,
    pub max_sugar: f64,
    pub max_cook_time: Option<u32>,
    pub required_tags: Vec<String>,
    pub excluded_ingredients: Vec<String>,
}

impl HardConstraints {
    pub fn derive(budget: &MealBudget, prefs: &UserPreferences) -> Self {
        let tol = budget.tolerance;

        let mut required_tags: Vec<String> = prefs
            .dietary_preference
            .required_tag()
            .map(str::to_string)
            .into_iter()
            .chain(prefs.restrictions.iter().map(|r| r.tag()))
            .filter(|t| !t.is_empty())
            .collect();
        required_tags.sort();
        required_tags.dedup();

        Self {
            max_calories: budget.kcal_target * (1.0 + tol * CALORIE_CEILING_FACTOR),
            min_calories: budget.kcal_target * (1.0 - tol * CALORIE_FLOOR_FACTOR),
            max_sugar: budget.sugar_hard_cap_g,
            max_cook_time: prefs.max_cook_time_minutes,
            required_tags,
            excluded_ingredients: prefs.excluded_terms(),
        }
    }
}

/// First rule a candidate failed
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    CaloriesTooLow { calories: f64, min: f64 },
    CaloriesTooHigh { calories: f64, max: f64 },
    SugarOverCap { sugar: f64, max: f64 },
    CookTimeTooLong { minutes: u32, max: u32 },
    MissingTag(String),
    ExcludedIngredient { ingredient: String, term: String },
}

impl Rejection {
    /// Stable key for stats aggregation
    pub fn rule(&self) -> &'static str {
        match self {
            Rejection::CaloriesTooLow { .. } | Rejection::CaloriesTooHigh { .. } => "calories",
            Rejection::SugarOverCap { .. } => "sugar",
            Rejection::CookTimeTooLong { .. } => "cook_time",
            Rejection::MissingTag(_) => "required_tag",
            Rejection::ExcludedIngredient { .. } => "excluded_ingredient",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::CaloriesTooLow { calories, min } => write!(f, "{:.0} kcal below floor {:.0}", calories, min),
            Rejection::CaloriesTooHigh { calories, max } => write!(f, "{:.0} kcal above ceiling {:.0}", calories, max),
            Rejection::SugarOverCap { sugar, max } => write!(f, "{:.1}g sugar above cap {:.1}g", sugar, max),
            Rejection::CookTimeTooLong { minutes, max } => write!(f, "{} min cook time above {} min", minutes, max),
            Rejection::MissingTag(tag) => write!(f, "missing tag '{}'", tag),
            Rejection::ExcludedIngredient { ingredient, term } => {
                write!(f, "ingredient '{}' matches excluded '{}'", ingredient, term)
            }
        }
    }
}

/// Evaluate the five hard rules in order, returning the first failure.
pub fn check(recipe: &Recipe, constraints: &HardConstraints, matcher: &dyn IngredientMatcher) -> Option<Rejection> {
    let calories = recipe.nutrients.calories();
    if calories < constraints.min_calories {
        return Some(Rejection::CaloriesTooLow { calories, min: constraints.min_calories });
    }
    if calories > constraints.max_calories {
        return Some(Rejection::CaloriesTooHigh { calories, max: constraints.max_calories });
    }

    if let Some(sugar) = recipe.nutrients.sugar_g {
        if sugar > constraints.max_sugar {
            return Some(Rejection::SugarOverCap { sugar, max: constraints.max_sugar });
        }
    }

    if let (Some(minutes), Some(max)) = (recipe.cook_time_minutes, constraints.max_cook_time) {
        if minutes > max {
            return Some(Rejection::CookTimeTooLong { minutes, max });
        }
    }

    if let Some(tag) = constraints.required_tags.iter().find(|tag| !recipe.has_tag(tag)) {
        return Some(Rejection::MissingTag(tag.clone()));
    }

    for ingredient in &recipe.ingredients {
        if let Some(term) = constraints
            .excluded_ingredients
            .iter()
            .find(|term| matcher.matches(ingredient, term))
        {
            return Some(Rejection::ExcludedIngredient {
                ingredient: ingredient.clone(),
                term: term.clone(),
            });
        }
    }

    None
}

pub fn accepts(recipe: &Recipe, constraints: &HardConstraints, matcher: &dyn IngredientMatcher) -> bool {
    check(recipe, constraints, matcher).is_none()
}

/// Recipes carrying any meal-type tag must carry the requested one.
/// Untagged recipes are eligible for every meal.
pub fn fits_meal_type(recipe: &Recipe, meal_type: MealType) -> bool {
    let tagged: Vec<MealType> = recipe.tags.iter().filter_map(|t| MealType::from_tag(t)).collect();
    tagged.is_empty() || tagged.contains(&meal_type)
}
