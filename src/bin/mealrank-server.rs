//! Meal recommendation HTTP server binary

use mealrank::config::ServerConfig;
use mealrank::server::{run_server, AppState};
use mealrank::{IngredientMatcher, MealEngine, SubstringMatcher, SynonymMatcher};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    info!("mealrank {}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env()?;

    let catalogue = config.load_catalogue()?;
    match config.catalogue_path {
        Some(ref path) => info!("Loaded {} recipes from {}", catalogue.len(), path.display()),
        None => info!("No MEALRANK_CATALOGUE set; requests must supply candidates"),
    }

    let presets = config.load_presets()?;
    info!("Presets: {}", presets.names().join(", "));

    let matcher: Box<dyn IngredientMatcher> = if config.use_synonyms {
        Box::new(SynonymMatcher::with_allergen_groups())
    } else {
        Box::new(SubstringMatcher)
    };
    info!("Ingredient matcher: {}", matcher.name());

    let state = AppState {
        engine: MealEngine::new(matcher, None, presets),
        catalogue: Arc::from(catalogue),
    };

    run_server(state, config.port).await?;

    Ok(())
}
