//! Pluggable ingredient matching used by the hard filter and pantry scoring

use std::collections::HashMap;

/// Decides whether an ingredient name matches a user-supplied term
/// (an allergen, a disliked food, a pantry item).
pub trait IngredientMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, ingredient: &str, term: &str) -> bool;
}

/// Case-insensitive substring match
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl IngredientMatcher for SubstringMatcher {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn matches(&self, ingredient: &str, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }
        ingredient.to_lowercase().contains(&term)
    }
}

/// Substring match that also expands a term through a synonym table,
/// so "dairy" catches "whole milk" and "cheddar cheese".
#[derive(Debug, Clone)]
pub struct SynonymMatcher {
    synonyms: HashMap<String, Vec<String>>,
}

impl SynonymMatcher {
    pub fn new(synonyms: HashMap<String, Vec<String>>) -> Self {
        let synonyms = synonyms
            .into_iter()
            .map(|(term, words)| {
                let words = words.into_iter().map(|w| w.trim().to_lowercase()).collect();
                (term.trim().to_lowercase(), words)
            })
            .collect();
        Self { synonyms }
    }

    /// Common allergen groups
    pub fn with_allergen_groups() -> Self {
        let groups: [(&str, &[&str]); 6] = [
            ("dairy", &["milk", "cheese", "butter", "cream", "yogurt", "whey"]),
            ("gluten", &["wheat", "flour", "bread", "pasta", "barley", "rye", "couscous"]),
            ("nuts", &["almond", "walnut", "cashew", "pecan", "hazelnut", "pistachio"]),
            ("shellfish", &["shrimp", "prawn", "crab", "lobster", "mussel", "clam"]),
            ("egg", &["eggs", "mayonnaise"]),
            ("soy", &["tofu", "tempeh", "edamame", "miso"]),
        ];
        let synonyms = groups
            .iter()
            .map(|(term, words)| (term.to_string(), words.iter().map(|w| w.to_string()).collect()))
            .collect();
        Self::new(synonyms)
    }
}

impl IngredientMatcher for SynonymMatcher {
    fn name(&self) -> &'static str {
        "synonym"
    }

    fn matches(&self, ingredient: &str, term: &str) -> bool {
        if SubstringMatcher.matches(ingredient, term) {
            return true;
        }
        match self.synonyms.get(&term.trim().to_lowercase()) {
            Some(words) => words.iter().any(|w| SubstringMatcher.matches(ingredient, w)),
            None => false,
        }
    }
}
