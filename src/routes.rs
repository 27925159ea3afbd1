use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    database::SuggestionStore,
    error::ApiError,
    suggestion::{NewSuggestion, SuggestionRow},
};

pub const CREATE_SUGGESTION_PATH: &str = "/createSuggestion";
pub const GET_SUGGESTIONS_PATH: &str = "/getSuggestions";

/// Shared by every request. Handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SuggestionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SuggestionStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            CREATE_SUGGESTION_PATH,
            post(create_suggestion_handler).fallback(method_not_allowed_handler),
        )
        .route(
            GET_SUGGESTIONS_PATH,
            get(get_suggestions_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn create_suggestion_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    // An unreadable body is treated like an empty one and fails validation below.
    let payload: NewSuggestion = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable suggestion payload: {e}");
        NewSuggestion::default()
    });

    let suggestion = payload.validate().ok_or(ApiError::Validation)?;
    let inserted = state.store.insert(suggestion).await?;

    info!(count = inserted.len(), "Stored new suggestion");
    Ok(Json(json!({ "success": true, "inserted": inserted })))
}

pub async fn get_suggestions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<SuggestionRow>>, ApiError> {
    let rows = state.store.list().await?;
    debug!(count = rows.len(), "Listed suggestions");
    Ok(Json(rows))
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
