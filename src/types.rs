//! Core type definitions for meal recommendation

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::error::{RecommendError, Result};

/// Per-serving nutrient amounts. Missing fields are treated as zero by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    #[serde(default)]
    pub calories: Option<f64>,   // kcal
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub fiber_g: Option<f64>,
    #[serde(default)]
    pub sugar_g: Option<f64>,    // None passes the sugar hard filter
}

impl NutrientProfile {
    pub fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64, fiber_g: f64, sugar_g: f64) -> Self {
        Self {
            calories: Some(calories),
            protein_g: Some(protein_g),
            carbs_g: Some(carbs_g),
            fat_g: Some(fat_g),
            fiber_g: Some(fiber_g),
            sugar_g: Some(sugar_g),
        }
    }

    pub fn calories(&self) -> f64 {
        non_negative(self.calories)
    }

    pub fn protein(&self) -> f64 {
        non_negative(self.protein_g)
    }

    pub fn carbs(&self) -> f64 {
        non_negative(self.carbs_g)
    }

    pub fn fat(&self) -> f64 {
        non_negative(self.fat_g)
    }

    pub fn fiber(&self) -> f64 {
        non_negative(self.fiber_g)
    }

    pub fn sugar(&self) -> f64 {
        non_negative(self.sugar_g)
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Candidate recipe. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,     // ordered; first three are the main ingredients
    #[serde(default, alias = "nutrientProfile")]
    pub nutrients: NutrientProfile,
    #[serde(default, alias = "cookTimeMinutes")]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub cost: Option<f64>,            // currency units per serving
    #[serde(default)]
    pub category: Option<String>,
}

impl Recipe {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Explicit category, else the first tag that is neither dietary nor a meal type.
    pub fn category(&self) -> Option<String> {
        if let Some(ref cat) = self.category {
            if !cat.trim().is_empty() {
                return Some(cat.trim().to_lowercase());
            }
        }
        self.tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .find(|t| !t.is_empty() && !is_classification_tag(t))
    }

    /// Lower-cased first word of each of the first three ingredients.
    pub fn main_ingredients(&self) -> HashSet<String> {
        self.ingredients
            .iter()
            .take(3)
            .filter_map(|ing| ing.split_whitespace().next())
            .map(|word| word.to_lowercase())
            .collect()
    }
}

fn is_classification_tag(tag: &str) -> bool {
    MealType::from_tag(tag).is_some() || DIETARY_TAGS.contains(&tag)
}

const DIETARY_TAGS: &[&str] = &[
    "vegetarian",
    "vegan",
    "pescatarian",
    "keto",
    "gluten-free",
    "dairy-free",
    "nut-free",
    "low-sugar",
    "paleo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack];

    pub fn tag(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag().eq_ignore_ascii_case(tag.trim()))
    }

    /// Relative share of the daily target this slot receives.
    pub fn daily_share(&self) -> f64 {
        match self {
            MealType::Breakfast => 25.0,
            MealType::Lunch => 35.0,
            MealType::Dinner => 30.0,
            MealType::Snack => 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    #[default]
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
    Keto,
}

impl DietaryPreference {
    pub fn required_tag(&self) -> Option<&'static str> {
        match self {
            DietaryPreference::Omnivore => None,
            DietaryPreference::Vegetarian => Some("vegetarian"),
            DietaryPreference::Vegan => Some("vegan"),
            DietaryPreference::Pescatarian => Some("pescatarian"),
            DietaryPreference::Keto => Some("keto"),
        }
    }
}

/// Restriction flags that map onto recipe tags
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    GlutenFree,
    DairyFree,
    NutFree,
    LowSugar,
    Paleo,
    Custom(String),
}

impl DietaryRestriction {
    pub fn tag(&self) -> String {
        match self {
            DietaryRestriction::GlutenFree => "gluten-free".to_string(),
            DietaryRestriction::DairyFree => "dairy-free".to_string(),
            DietaryRestriction::NutFree => "nut-free".to_string(),
            DietaryRestriction::LowSugar => "low-sugar".to_string(),
            DietaryRestriction::Paleo => "paleo".to_string(),
            DietaryRestriction::Custom(tag) => tag.trim().to_lowercase(),
        }
    }
}

/// Global per-day settings owned by the user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySettings {
    #[serde(default)]
    pub daily_calories: Option<f64>,  // overrides the goal profile's daily kcal
    #[serde(default = "default_true")]
    pub include_breakfast: bool,      // breakfast is part of the plan
    #[serde(default)]
    pub include_snacks: bool,
}

impl Default for DailySettings {
    fn default() -> Self {
        Self {
            daily_calories: None,
            include_breakfast: true,
            include_snacks: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Explicit per-meal macro targets. Selects the target-based fit strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

impl MacroTargets {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none() && self.protein_g.is_none() && self.carbs_g.is_none() && self.fat_g.is_none()
    }
}

/// User profile snapshot supplied by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub dietary_preference: DietaryPreference,
    #[serde(default)]
    pub restrictions: Vec<DietaryRestriction>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub intolerances: Vec<String>,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default)]
    pub liked_recipe_ids: HashSet<String>,
    #[serde(default)]
    pub disliked_recipe_ids: HashSet<String>,
    #[serde(default)]
    pub pantry: Vec<String>,
    #[serde(default)]
    pub fitness_goal: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,       // explicit preset wins over fitness_goal
    #[serde(default)]
    pub weights: Option<RecommendationWeights>,
    #[serde(default)]
    pub max_cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub recently_viewed: Vec<String>, // most recent first
    #[serde(default)]
    pub daily: DailySettings,
    #[serde(default)]
    pub macro_targets: Option<MacroTargets>,
}

impl UserPreferences {
    /// Allergies, intolerances and disliked foods, trimmed and lower-cased
    pub fn excluded_terms(&self) -> Vec<String> {
        self.allergies
            .iter()
            .chain(self.intolerances.iter())
            .chain(self.disliked_foods.iter())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Per-meal budget derived fresh on every call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealBudget {
    pub meal_type: MealType,
    pub kcal_target: f64,
    pub protein_target_g: f64,
    pub carb_target_g: f64,
    pub fat_target_g: f64,
    pub fiber_min_g: f64,
    pub sugar_soft_cap_g: f64,
    pub sugar_hard_cap_g: f64,
    pub tolerance: f64,               // fraction, e.g. 0.20
}

/// Weights for the weighted sum. An override replaces the preset's weights
/// wholesale, so the five scored weights must all be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationWeights {
    pub nutritional_fit: f64,
    pub variety_boost: f64,
    pub pantry_match: f64,
    pub cost_score: f64,
    pub recency_penalty: f64,
    /// Validated but unweighted. Liked recipes get the flat `LIKE_BONUS` instead.
    #[serde(default)]
    pub similarity_to_likes: f64,
    // Reserved slots, zero in every built-in preset
    #[serde(default)]
    pub metadata_overlap: f64,
    #[serde(default)]
    pub vector_similarity: f64,
    #[serde(default)]
    pub collaborative_filtering: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            nutritional_fit: 0.40,
            variety_boost: 0.15,
            pantry_match: 0.15,
            cost_score: 0.10,
            recency_penalty: 0.20,
            similarity_to_likes: 0.0,
            metadata_overlap: 0.0,
            vector_similarity: 0.0,
            collaborative_filtering: 0.0,
        }
    }
}

impl RecommendationWeights {
    pub fn named(&self) -> [(&'static str, f64); 9] {
        [
            ("nutritional_fit", self.nutritional_fit),
            ("variety_boost", self.variety_boost),
            ("pantry_match", self.pantry_match),
            ("cost_score", self.cost_score),
            ("recency_penalty", self.recency_penalty),
            ("similarity_to_likes", self.similarity_to_likes),
            ("metadata_overlap", self.metadata_overlap),
            ("vector_similarity", self.vector_similarity),
            ("collaborative_filtering", self.collaborative_filtering),
        ]
    }
}

/// A recipe plus the scores from one scoring pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecipe {
    pub recipe: Recipe,
    pub nutritional_fit_score: f64,
    pub variety_score: f64,
    pub pantry_score: f64,
    pub cost_score: f64,
    pub recency_score: f64,
    pub like_bonus: f64,
    pub total_score: f64,
}

impl ScoredRecipe {
    pub fn id(&self) -> &str {
        &self.recipe.id
    }
}

/// Request for one recommendation call. The pool is shared so a server can
/// hand out its catalogue without copying it.
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    pub preferences: UserPreferences,
    pub candidates: Arc<[Recipe]>,
    pub meal_type: MealType,
    pub count: usize,
    pub explain: bool,
}

impl RecommendRequest {
    pub fn new(
        preferences: UserPreferences,
        candidates: impl Into<Arc<[Recipe]>>,
        meal_type: MealType,
        count: usize,
    ) -> Self {
        Self {
            preferences,
            candidates: candidates.into(),
            meal_type,
            count,
            explain: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(RecommendError::InvalidCount(self.count));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Warning {
    EmptyCandidatePool,
    UnresolvedPreset(String),
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<ScoredRecipe>,
    pub budget: MealBudget,
    pub stats: RecommendStats,
    pub warnings: Vec<Warning>,
    pub rationale: Option<Vec<RecipeExplanation>>,
}

#[derive(Debug, Default, Serialize)]
pub struct RecommendStats {
    pub candidates_in: usize,
    pub after_meal_type: usize,
    pub after_filter: usize,
    pub rejections: BTreeMap<String, usize>,
    pub scored: usize,
    pub selected: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct RecipeExplanation {
    pub recipe_id: String,
    pub total_score: f64,
    pub reasons: Vec<String>,
}
