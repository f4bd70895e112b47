//! Named goal profiles and weight presets
//!
//! A goal profile bundles the daily energy target, macro split, tolerances and
//! the default `RecommendationWeights` for users who pick that goal. Names are
//! matched loosely ("Weight Loss", "weight_loss" and "WeightLoss" are the same).

use crate::error::{RecommendError, Result};
use crate::types::{RecommendationWeights, UserPreferences, Warning};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

pub const DEFAULT_PRESET: &str = "Healthy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProfile {
    pub name: String,
    pub daily_calories: f64,
    pub protein_ratio: f64,           // fraction of daily kcal
    pub carb_ratio: f64,
    pub fat_ratio: f64,
    pub tolerance: f64,
    pub breakfast_tolerance: f64,     // breakfasts vary more in size
    pub fiber_daily_g: f64,
    pub sugar_soft_cap_daily_g: f64,
    pub sugar_hard_cap_daily_g: f64,
    #[serde(default)]
    pub weights: RecommendationWeights,
}

impl GoalProfile {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| RecommendError::InvalidProfile {
            name: self.name.clone(),
            reason,
        };

        let fields = [
            ("daily_calories", self.daily_calories),
            ("protein_ratio", self.protein_ratio),
            ("carb_ratio", self.carb_ratio),
            ("fat_ratio", self.fat_ratio),
            ("fiber_daily_g", self.fiber_daily_g),
            ("sugar_soft_cap_daily_g", self.sugar_soft_cap_daily_g),
            ("sugar_hard_cap_daily_g", self.sugar_hard_cap_daily_g),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be finite and non-negative, got {}", field, value)));
            }
        }
        for (field, value) in [("tolerance", self.tolerance), ("breakfast_tolerance", self.breakfast_tolerance)] {
            if !(0.0..1.0).contains(&value) {
                return Err(invalid(format!("{} must be in [0, 1), got {}", field, value)));
            }
        }
        if self.sugar_hard_cap_daily_g < self.sugar_soft_cap_daily_g {
            return Err(invalid("sugar hard cap is below the soft cap".to_string()));
        }
        self.weights.validate()
    }
}

impl RecommendationWeights {
    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(RecommendError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Common fitness-goal spellings mapped onto preset keys
fn goal_alias(key: &str) -> &str {
    match key {
        "loseweight" | "fatloss" | "cut" => "weightloss",
        "buildmuscle" | "gainmuscle" | "bulk" => "musclegain",
        "maintain" | "maintenance" | "balanced" => "healthy",
        "ketogenic" | "lowcarb" => "keto",
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct PresetRegistry {
    profiles: HashMap<String, GoalProfile>,
    fallback: GoalProfile,            // tracks whatever is registered as Healthy
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self {
            profiles: HashMap::new(),
            fallback: healthy(),
        };
        for profile in builtin_profiles() {
            registry.insert(profile);
        }
        registry
    }

    /// Built-ins overlaid with profiles from a JSON array
    pub fn with_json(json: &str) -> Result<Self> {
        let mut registry = Self::builtin();
        let extra: Vec<GoalProfile> = serde_json::from_str(json)?;
        for profile in extra {
            profile.validate()?;
            registry.insert(profile);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, profile: GoalProfile) {
        let key = normalize_name(&profile.name);
        if key == normalize_name(DEFAULT_PRESET) {
            self.fallback = profile.clone();
        }
        self.profiles.insert(key, profile);
    }

    pub fn get(&self, name: &str) -> Option<&GoalProfile> {
        let key = normalize_name(name);
        self.profiles.get(goal_alias(&key))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.values().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    pub fn default_profile(&self) -> &GoalProfile {
        &self.fallback
    }

    /// Resolve a preset by name, falling back to Healthy for unknown names.
    pub fn resolve(&self, name: &str) -> (&GoalProfile, Option<Warning>) {
        match self.get(name) {
            Some(profile) => (profile, None),
            None => {
                warn!("Unknown preset '{}', falling back to {}", name, DEFAULT_PRESET);
                (self.default_profile(), Some(Warning::UnresolvedPreset(name.to_string())))
            }
        }
    }

    /// Explicit preset, else fitness goal, else Healthy.
    pub fn resolve_for(&self, prefs: &UserPreferences) -> (&GoalProfile, Option<Warning>) {
        let requested = prefs
            .preset
            .as_deref()
            .or(prefs.fitness_goal.as_deref())
            .filter(|name| !name.trim().is_empty());

        match requested {
            Some(name) => self.resolve(name),
            None => (self.default_profile(), None),
        }
    }
}

fn healthy() -> GoalProfile {
    GoalProfile {
        name: DEFAULT_PRESET.to_string(),
        daily_calories: 2000.0,
        protein_ratio: 0.25,
        carb_ratio: 0.50,
        fat_ratio: 0.25,
        tolerance: 0.20,
        breakfast_tolerance: 0.30,
        fiber_daily_g: 28.0,
        sugar_soft_cap_daily_g: 50.0,
        sugar_hard_cap_daily_g: 90.0,
        weights: RecommendationWeights::default(),
    }
}

fn builtin_profiles() -> Vec<GoalProfile> {
    let base = healthy();
    vec![
        GoalProfile {
            name: "WeightLoss".to_string(),
            daily_calories: 1600.0,
            protein_ratio: 0.30,
            carb_ratio: 0.40,
            fat_ratio: 0.30,
            tolerance: 0.15,
            breakfast_tolerance: 0.25,
            fiber_daily_g: 30.0,
            sugar_soft_cap_daily_g: 30.0,
            sugar_hard_cap_daily_g: 60.0,
            weights: RecommendationWeights {
                nutritional_fit: 0.50,
                variety_boost: 0.10,
                pantry_match: 0.10,
                cost_score: 0.10,
                recency_penalty: 0.20,
                ..base.weights.clone()
            },
        },
        GoalProfile {
            name: "MuscleGain".to_string(),
            daily_calories: 2600.0,
            protein_ratio: 0.30,
            carb_ratio: 0.45,
            fat_ratio: 0.25,
            tolerance: 0.20,
            breakfast_tolerance: 0.30,
            fiber_daily_g: 30.0,
            sugar_soft_cap_daily_g: 60.0,
            sugar_hard_cap_daily_g: 100.0,
            weights: RecommendationWeights {
                nutritional_fit: 0.50,
                variety_boost: 0.10,
                pantry_match: 0.15,
                cost_score: 0.05,
                recency_penalty: 0.20,
                ..base.weights.clone()
            },
        },
        GoalProfile {
            name: "Keto".to_string(),
            daily_calories: 1800.0,
            protein_ratio: 0.25,
            carb_ratio: 0.05,
            fat_ratio: 0.70,
            tolerance: 0.20,
            breakfast_tolerance: 0.30,
            fiber_daily_g: 20.0,
            sugar_soft_cap_daily_g: 15.0,
            sugar_hard_cap_daily_g: 30.0,
            weights: RecommendationWeights {
                nutritional_fit: 0.45,
                variety_boost: 0.15,
                pantry_match: 0.15,
                cost_score: 0.05,
                recency_penalty: 0.20,
                ..base.weights.clone()
            },
        },
        base,
    ]
}
