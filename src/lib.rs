//! mealrank - Meal recommendation engine
//!
//! Ranks candidate recipes for one meal of a user's day:
//! - Per-meal calorie/macro budget from a named goal profile
//! - Hard dietary, allergen, calorie and cook-time filters
//! - Weighted multi-factor scoring (nutrition, variety, pantry, cost, recency)
//! - Greedy main-ingredient diversity pass

pub mod types;
pub mod error;
pub mod presets;
pub mod budget;
pub mod matching;
pub mod filters;
pub mod scoring;
pub mod selection;
pub mod recency;
pub mod engine;
pub mod config;
pub mod server;

pub use types::*;
pub use error::RecommendError;
pub use engine::{MealEngine, SharedMealEngine};
pub use matching::{IngredientMatcher, SubstringMatcher, SynonymMatcher};
pub use presets::{GoalProfile, PresetRegistry};
pub use recency::{RecencyStore, StaticRecency};
