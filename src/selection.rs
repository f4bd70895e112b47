//! Greedy diversity pass over score-sorted recipes

use crate::types::ScoredRecipe;
use std::collections::HashSet;

/// Scores above this are accepted regardless of ingredient repetition
pub const STRONG_MATCH_SCORE: f64 = 0.85;
/// Overlap with already-used main ingredients must stay below this
pub const MAX_OVERLAP_RATIO: f64 = 0.5;

/// Share of `main` already present in `used`. Empty `main` never overlaps.
pub fn overlap_ratio(main: &HashSet<String>, used: &HashSet<String>) -> f64 {
    if main.is_empty() {
        return 0.0;
    }
    let shared = main.intersection(used).count();
    shared as f64 / main.len() as f64
}

/// Walk `sorted` once, keeping up to `count` recipes whose main ingredients
/// mostly differ from those already kept. Input order is preserved.
pub fn diversify(sorted: Vec<ScoredRecipe>, count: usize) -> Vec<ScoredRecipe> {
    let mut selected: Vec<ScoredRecipe> = Vec::with_capacity(count.min(sorted.len()));
    let mut used: HashSet<String> = HashSet::new();

    for cand in sorted {
        if selected.len() >= count {
            break;
        }

        let main = cand.recipe.main_ingredients();
        let overlap = overlap_ratio(&main, &used);

        if overlap < MAX_OVERLAP_RATIO || cand.total_score > STRONG_MATCH_SCORE {
            used.extend(main);
            selected.push(cand);
        } else {
            tracing::debug!("  SKIP: {} repeats main ingredients ({:.0}%)", cand.recipe.id, overlap * 100.0);
        }
    }

    selected
}
