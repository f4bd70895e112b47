//! Scoring functions for candidate recipes

use crate::matching::IngredientMatcher;
use crate::types::*;
use std::collections::HashSet;

/// Additive bonus for recipes the user has liked. Not weighted.
pub const LIKE_BONUS: f64 = 0.2;

/// Cost range mapped linearly onto [1, 0]
pub const COST_FLOOR: f64 = 2.0;
pub const COST_CEILING: f64 = 15.0;

pub const PREMIUM_INGREDIENTS: &[&str] = &["beef", "salmon", "shrimp", "cheese"];

const ESTIMATE_BASE_COST: f64 = 3.0;
const ESTIMATE_COST_PER_INGREDIENT: f64 = 0.6;
const ESTIMATE_PREMIUM_SURCHARGE: f64 = 3.5;

/// Which nutritional-fit function applies for a call
#[derive(Debug, Clone, PartialEq)]
pub enum FitStrategy {
    /// Score against the budget derived from the user's goal profile
    GoalBased,
    /// Score against explicit per-meal macro targets
    TargetBased(MacroTargets),
}

impl FitStrategy {
    pub fn select(prefs: &UserPreferences) -> Self {
        match prefs.macro_targets {
            Some(ref targets) if !targets.is_empty() => FitStrategy::TargetBased(targets.clone()),
            _ => FitStrategy::GoalBased,
        }
    }
}

/// Everything the scorer reads for one call
pub struct ScoringContext<'a> {
    pub budget: &'a MealBudget,
    pub weights: &'a RecommendationWeights,
    pub strategy: FitStrategy,
    pub liked_ids: &'a HashSet<String>,
    pub history_categories: HashSet<String>,
    pub pantry: &'a [String],
    pub recently_viewed: &'a [String],
    pub matcher: &'a dyn IngredientMatcher,
}

pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Linear falloff around a target. 1 inside the tolerance band.
pub fn component_score(actual: f64, target: f64, tolerance: f64) -> f64 {
    if target <= 0.0 || !target.is_finite() {
        return 1.0; // target not applicable
    }
    let ratio = actual / target;
    let min_ratio = 1.0 - tolerance;
    let max_ratio = 1.0 + tolerance;

    let score = if ratio < min_ratio {
        if min_ratio > 0.0 { ratio / min_ratio } else { 1.0 }
    } else if ratio > max_ratio {
        2.0 - ratio / max_ratio
    } else {
        1.0
    };
    clamp01(score)
}

pub fn fiber_bonus(fiber: f64, fiber_min: f64) -> f64 {
    if fiber_min <= 0.0 {
        return 1.0;
    }
    clamp01(fiber / fiber_min)
}

/// 1 at or under the soft cap, falling to 0 at the hard cap
pub fn sugar_penalty(sugar: f64, soft_cap: f64, hard_cap: f64) -> f64 {
    if sugar <= soft_cap {
        return 1.0;
    }
    let span = hard_cap - soft_cap;
    if span <= 0.0 {
        return 0.0;
    }
    clamp01(1.0 - (sugar - soft_cap) / span)
}

pub fn goal_based_fit(nutrients: &NutrientProfile, budget: &MealBudget) -> f64 {
    let tol = budget.tolerance;
    let score = 0.30 * component_score(nutrients.calories(), budget.kcal_target, tol)
        + 0.25 * component_score(nutrients.protein(), budget.protein_target_g, tol)
        + 0.15 * component_score(nutrients.carbs(), budget.carb_target_g, tol)
        + 0.15 * component_score(nutrients.fat(), budget.fat_target_g, tol)
        + 0.10 * fiber_bonus(nutrients.fiber(), budget.fiber_min_g)
        + 0.05 * sugar_penalty(nutrients.sugar(), budget.sugar_soft_cap_g, budget.sugar_hard_cap_g);
    clamp01(score)
}

/// Equal-weight fit against explicit targets; absent targets score 1.
pub fn target_based_fit(nutrients: &NutrientProfile, targets: &MacroTargets, tolerance: f64) -> f64 {
    let component = |actual: f64, target: Option<f64>| match target {
        Some(t) => component_score(actual, t, tolerance),
        None => 1.0,
    };
    let score = 0.25 * component(nutrients.calories(), targets.calories)
        + 0.25 * component(nutrients.protein(), targets.protein_g)
        + 0.25 * component(nutrients.carbs(), targets.carbs_g)
        + 0.25 * component(nutrients.fat(), targets.fat_g);
    clamp01(score)
}

pub fn nutritional_fit(recipe: &Recipe, ctx: &ScoringContext) -> f64 {
    match ctx.strategy {
        FitStrategy::GoalBased => goal_based_fit(&recipe.nutrients, ctx.budget),
        FitStrategy::TargetBased(ref targets) => target_based_fit(&recipe.nutrients, targets, ctx.budget.tolerance),
    }
}

/// 0.8 with no like history; otherwise 0.5, plus 0.3 for an unseen category
pub fn variety_score(recipe: &Recipe, liked_ids: &HashSet<String>, history_categories: &HashSet<String>) -> f64 {
    if liked_ids.is_empty() {
        return 0.8;
    }
    match recipe.category() {
        Some(cat) if !history_categories.contains(&cat) => 0.8,
        _ => 0.5,
    }
}

/// Fraction of ingredients already in the pantry; 0.5 for an empty pantry
pub fn pantry_score(recipe: &Recipe, pantry: &[String], matcher: &dyn IngredientMatcher) -> f64 {
    if pantry.is_empty() {
        return 0.5;
    }
    if recipe.ingredients.is_empty() {
        return 0.0;
    }
    let owned = recipe
        .ingredients
        .iter()
        .filter(|ing| pantry.iter().any(|item| matcher.matches(ing, item)))
        .count();
    clamp01(owned as f64 / recipe.ingredients.len() as f64)
}

pub fn estimate_cost(recipe: &Recipe) -> f64 {
    let premium = recipe
        .ingredients
        .iter()
        .filter(|ing| {
            let lower = ing.to_lowercase();
            PREMIUM_INGREDIENTS.iter().any(|p| lower.contains(p))
        })
        .count();
    ESTIMATE_BASE_COST
        + ESTIMATE_COST_PER_INGREDIENT * recipe.ingredients.len() as f64
        + ESTIMATE_PREMIUM_SURCHARGE * premium as f64
}

/// Cheaper is better: [2, 15] maps to [1, 0]
pub fn cost_score(recipe: &Recipe) -> f64 {
    let cost = match recipe.cost {
        Some(c) if c.is_finite() && c >= 0.0 => c,
        _ => estimate_cost(recipe),
    };
    clamp01((COST_CEILING - cost) / (COST_CEILING - COST_FLOOR))
}

/// 1.0 if never viewed, else 0.2 for the latest view rising to 1.0 for the oldest
pub fn recency_score(recipe_id: &str, recently_viewed: &[String]) -> f64 {
    match recently_viewed.iter().position(|id| id == recipe_id) {
        None => 1.0,
        Some(position) => {
            let denom = recently_viewed.len().saturating_sub(1).max(1) as f64;
            clamp01(0.2 + 0.8 * (position as f64 / denom))
        }
    }
}

pub fn like_bonus(recipe_id: &str, liked_ids: &HashSet<String>) -> f64 {
    if liked_ids.contains(recipe_id) {
        LIKE_BONUS
    } else {
        0.0
    }
}

/// Score one recipe. The candidate is cloned into the result, never modified.
pub fn score_recipe(recipe: &Recipe, ctx: &ScoringContext) -> ScoredRecipe {
    let w = ctx.weights;

    let nutritional_fit_score = nutritional_fit(recipe, ctx);
    let variety_score = variety_score(recipe, ctx.liked_ids, &ctx.history_categories);
    let pantry_score = pantry_score(recipe, ctx.pantry, ctx.matcher);
    let cost_score = cost_score(recipe);
    let recency_score = recency_score(&recipe.id, ctx.recently_viewed);
    let like_bonus = like_bonus(&recipe.id, ctx.liked_ids);

    let weighted = w.nutritional_fit * nutritional_fit_score
        + w.variety_boost * variety_score
        + w.pantry_match * pantry_score
        + w.cost_score * cost_score
        + w.recency_penalty * recency_score;

    ScoredRecipe {
        recipe: recipe.clone(),
        nutritional_fit_score,
        variety_score,
        pantry_score,
        cost_score,
        recency_score,
        like_bonus,
        total_score: clamp01(weighted + like_bonus),
    }
}

pub fn explain_recipe(scored: &ScoredRecipe) -> Vec<String> {
    let mut reasons = Vec::new();

    if scored.nutritional_fit_score > 0.8 {
        reasons.push(format!("close to meal budget: {:.2}", scored.nutritional_fit_score));
    }
    if scored.pantry_score > 0.5 {
        reasons.push(format!("uses pantry items: {:.0}%", scored.pantry_score * 100.0));
    }
    if scored.variety_score > 0.5 {
        reasons.push("adds variety".to_string());
    }
    if scored.cost_score > 0.6 {
        reasons.push(format!("budget friendly: {:.2}", scored.cost_score));
    }
    if scored.recency_score < 1.0 {
        reasons.push(format!("viewed recently: {:.2}", scored.recency_score));
    }
    if scored.like_bonus > 0.0 {
        reasons.push("previously liked".to_string());
    }
    if let Some(cat) = scored.recipe.category() {
        reasons.push(format!("category: {}", cat));
    }

    reasons.push(format!("total score: {:.2}", scored.total_score));

    reasons
}
