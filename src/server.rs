//! HTTP server for meal recommendations

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    MealEngine, MealType, Recipe, RecommendRequest, RecommendResponse, ScoredRecipe, UserPreferences,
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MealEngine>,
    pub catalogue: Arc<[Recipe]>,
}

/// HTTP request for recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendRequestHttp {
    #[serde(default)]
    pub preferences: UserPreferences,
    pub meal_type: MealType,
    #[serde(default = "default_count")]
    pub count: usize,
    pub candidates: Option<Vec<Recipe>>, // falls back to the loaded catalogue
    pub explain: Option<bool>,
}

fn default_count() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRequestHttp {
    #[serde(default)]
    pub preferences: UserPreferences,
    pub meal_type: MealType,
    #[serde(default)]
    pub current_selections: Vec<String>,
    pub disliked_id: String,
    pub candidates: Option<Vec<Recipe>>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub replacement: Option<ScoredRecipe>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub catalogue_size: usize,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: &str, e: impl std::fmt::Display) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            details: Some(e.to_string()),
        }),
    )
}

/// Recommend handler
pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequestHttp>,
) -> Result<Json<RecommendResponse>, HandlerError> {
    info!("Received recommend request: meal={:?}, count={}", req.meal_type, req.count);

    let candidates: Arc<[Recipe]> = match req.candidates {
        Some(c) => c.into(),
        None => Arc::clone(&state.catalogue),
    };
    let request = RecommendRequest {
        explain: req.explain.unwrap_or(false),
        ..RecommendRequest::new(req.preferences, candidates, req.meal_type, req.count)
    };

    match state.engine.recommend_detailed(&request) {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Recommendation rejected: {}", e);
            Err(bad_request("Invalid recommendation request", e))
        }
    }
}

/// Replace-disliked handler
pub async fn replace_handler(
    State(state): State<AppState>,
    Json(req): Json<ReplaceRequestHttp>,
) -> Result<Json<ReplaceResponse>, HandlerError> {
    info!("Received replace request: disliked='{}', meal={:?}", req.disliked_id, req.meal_type);

    let candidates: &[Recipe] = match req.candidates {
        Some(ref c) => c,
        None => &state.catalogue[..],
    };

    state
        .engine
        .replace_disliked(&req.preferences, candidates, &req.current_selections, &req.disliked_id, req.meal_type)
        .map(|replacement| Json(ReplaceResponse { replacement }))
        .map_err(|e| {
            error!("Replacement rejected: {}", e);
            bad_request("Invalid replacement request", e)
        })
}

/// Health check handler
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "mealrank".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalogue_size: state.catalogue.len(),
    })
}

/// Create and configure the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/recommend", post(recommend_handler))
        .route("/replace", post(replace_handler))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting mealrank server on {}", addr);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
