//! Server configuration read from the environment

use crate::presets::PresetRegistry;
use crate::types::Recipe;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8090;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub catalogue_path: Option<PathBuf>, // JSON array of recipes
    pub presets_path: Option<PathBuf>,   // JSON array of goal profiles
    pub use_synonyms: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalogue_path: None,
            presets_path: None,
            use_synonyms: false,
        }
    }
}

impl ServerConfig {
    /// MEALRANK_PORT, MEALRANK_CATALOGUE, MEALRANK_PRESETS, MEALRANK_SYNONYMS
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("MEALRANK_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MEALRANK_PORT is not a port number: '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let use_synonyms = lookup("MEALRANK_SYNONYMS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            port,
            catalogue_path: lookup("MEALRANK_CATALOGUE").map(PathBuf::from),
            presets_path: lookup("MEALRANK_PRESETS").map(PathBuf::from),
            use_synonyms,
        })
    }

    pub fn load_catalogue(&self) -> Result<Vec<Recipe>> {
        let Some(ref path) = self.catalogue_path else {
            return Ok(Vec::new());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalogue {}", path.display()))?;
        let recipes: Vec<Recipe> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalogue {}", path.display()))?;
        Ok(recipes)
    }

    pub fn load_presets(&self) -> Result<PresetRegistry> {
        let Some(ref path) = self.presets_path else {
            return Ok(PresetRegistry::builtin());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read presets {}", path.display()))?;
        PresetRegistry::with_json(&raw).with_context(|| format!("Invalid presets in {}", path.display()))
    }
}
