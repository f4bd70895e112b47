//! Recommendation pipeline: budget -> hard filter -> score -> sort -> diversify

use crate::budget::compute_meal_budget;
use crate::error::Result;
use crate::filters::{check, fits_meal_type, HardConstraints};
use crate::matching::{IngredientMatcher, SubstringMatcher};
use crate::presets::PresetRegistry;
use crate::recency::RecencyStore;
use crate::scoring::{explain_recipe, score_recipe, FitStrategy, ScoringContext};
use crate::selection::diversify;
use crate::types::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Main recommendation engine. Holds no per-call state, so one instance
/// can serve concurrent callers.
pub struct MealEngine {
    pub matcher: Box<dyn IngredientMatcher>,
    pub recency: Option<Box<dyn RecencyStore>>,
    pub presets: PresetRegistry,
}

pub type SharedMealEngine = Arc<MealEngine>;

impl MealEngine {
    /// Create an engine with a custom matcher, recency source and preset registry
    pub fn new(
        matcher: Box<dyn IngredientMatcher>,
        recency: Option<Box<dyn RecencyStore>>,
        presets: PresetRegistry,
    ) -> SharedMealEngine {
        Arc::new(Self {
            matcher,
            recency,
            presets,
        })
    }

    /// Substring matching, built-in presets, history read from the preferences
    pub fn new_simple() -> SharedMealEngine {
        Self::new(Box::new(SubstringMatcher), None, PresetRegistry::builtin())
    }

    /// Top `count` recipes for a meal. An empty pool after filtering yields `[]`.
    pub fn recommend(
        &self,
        preferences: &UserPreferences,
        candidates: &[Recipe],
        meal_type: MealType,
        count: usize,
    ) -> Result<Vec<ScoredRecipe>> {
        let response = self.run(preferences, candidates, &HashSet::new(), meal_type, count, false)?;
        Ok(response.recommendations)
    }

    /// Same pipeline as `recommend`, returning budget, stats, warnings and rationale.
    /// Unlike `recommend`, a zero count is rejected.
    pub fn recommend_detailed(&self, req: &RecommendRequest) -> Result<RecommendResponse> {
        req.validate()?;
        self.run(
            &req.preferences,
            &req.candidates,
            &HashSet::new(),
            req.meal_type,
            req.count,
            req.explain,
        )
    }

    /// Best single replacement for a disliked recipe, skipping the disliked
    /// recipe and everything already selected.
    pub fn replace_disliked(
        &self,
        preferences: &UserPreferences,
        candidates: &[Recipe],
        current_selections: &[String],
        disliked_id: &str,
        meal_type: MealType,
    ) -> Result<Option<ScoredRecipe>> {
        let mut excluded: HashSet<&str> = current_selections.iter().map(String::as_str).collect();
        excluded.insert(disliked_id);

        let response = self.run(preferences, candidates, &excluded, meal_type, 1, false)?;
        let replacement = response.recommendations.into_iter().next();

        match replacement {
            Some(ref r) => info!("Replacing '{}' with '{}' ({:.2})", disliked_id, r.recipe.id, r.total_score),
            None => warn!("No alternative available for '{}'", disliked_id),
        }

        Ok(replacement)
    }

    fn run(
        &self,
        prefs: &UserPreferences,
        catalogue: &[Recipe],
        excluded: &HashSet<&str>,
        meal_type: MealType,
        count: usize,
        explain: bool,
    ) -> Result<RecommendResponse> {
        let start = Instant::now();

        info!(
            "Recommending: meal={:?}, count={}, candidates={}, preset={:?}, goal={:?}",
            meal_type,
            count,
            catalogue.len(),
            prefs.preset,
            prefs.fitness_goal
        );

        // Step 0: Validate overrides before any scoring
        if let Some(ref weights) = prefs.weights {
            weights.validate()?;
        }

        let mut warnings = Vec::new();
        let (profile, preset_warning) = self.presets.resolve_for(prefs);
        warnings.extend(preset_warning);

        let weights = prefs.weights.clone().unwrap_or_else(|| profile.weights.clone());

        // Step 1: Budget
        let budget = compute_meal_budget(profile, &prefs.daily, meal_type);
        debug!(
            "Budget: {:.0} kcal, P {:.0}g C {:.0}g F {:.0}g, tol {:.2}",
            budget.kcal_target, budget.protein_target_g, budget.carb_target_g, budget.fat_target_g, budget.tolerance
        );

        let mut stats = RecommendStats {
            candidates_in: catalogue.len(),
            ..Default::default()
        };

        // Step 2: Pool for this meal
        let pool: Vec<&Recipe> = catalogue
            .iter()
            .filter(|r| !excluded.contains(r.id.as_str()))
            .filter(|r| !prefs.disliked_recipe_ids.contains(&r.id))
            .filter(|r| fits_meal_type(r, meal_type))
            .collect();
        stats.after_meal_type = pool.len();

        // Step 3: Hard filter
        let constraints = HardConstraints::derive(&budget, prefs);
        let survivors = self.filter_candidates(pool, &constraints, &mut stats.rejections);
        stats.after_filter = survivors.len();

        if survivors.is_empty() {
            warn!("No candidates left after filtering ({} in)", catalogue.len());
            warnings.push(Warning::EmptyCandidatePool);
        }

        // Step 4: Score
        let recently_viewed = match self.recency {
            Some(ref store) => store.recently_viewed(),
            None => prefs.recently_viewed.clone(),
        };
        let ctx = ScoringContext {
            budget: &budget,
            weights: &weights,
            strategy: FitStrategy::select(prefs),
            liked_ids: &prefs.liked_recipe_ids,
            history_categories: liked_categories(catalogue, &prefs.liked_recipe_ids),
            pantry: &prefs.pantry,
            recently_viewed: &recently_viewed,
            matcher: self.matcher.as_ref(),
        };

        let mut scored: Vec<ScoredRecipe> = survivors.into_iter().map(|r| score_recipe(r, &ctx)).collect();

        // Step 5: Stable sort, then leave the diversity pass room to work
        stats.scored = scored.len();
        scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        scored.truncate(count.saturating_mul(2));

        // Step 6: Diversify
        let recommendations = diversify(scored, count);
        stats.selected = recommendations.len();
        stats.elapsed_ms = start.elapsed().as_millis() as u64;

        let rationale = if explain {
            Some(
                recommendations
                    .iter()
                    .map(|r| RecipeExplanation {
                        recipe_id: r.recipe.id.clone(),
                        total_score: r.total_score,
                        reasons: explain_recipe(r),
                    })
                    .collect(),
            )
        } else {
            None
        };

        info!(
            "Recommendation complete: {} selected from {} eligible ({} in)",
            stats.selected, stats.after_filter, stats.candidates_in
        );

        Ok(RecommendResponse {
            recommendations,
            budget,
            stats,
            warnings,
            rationale,
        })
    }

    fn filter_candidates<'a>(
        &self,
        pool: Vec<&'a Recipe>,
        constraints: &HardConstraints,
        rejections: &mut BTreeMap<String, usize>,
    ) -> Vec<&'a Recipe> {
        pool.into_iter()
            .filter(|recipe| match check(recipe, constraints, self.matcher.as_ref()) {
                None => true,
                Some(rejection) => {
                    debug!("  REJECT: {} ({})", recipe.id, rejection);
                    *rejections.entry(rejection.rule().to_string()).or_insert(0) += 1;
                    false
                }
            })
            .collect()
    }
}

/// Categories of liked recipes that appear in the catalogue
fn liked_categories(catalogue: &[Recipe], liked: &HashSet<String>) -> HashSet<String> {
    catalogue
        .iter()
        .filter(|r| liked.contains(&r.id))
        .filter_map(|r| r.category())
        .collect()
}
