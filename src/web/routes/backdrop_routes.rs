use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use crate::feed::ContentItem;
use crate::feed::backdrop::pick_backdrop;
use crate::web::{AppError, AppState};

pub fn create_backdrop_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(backdrop_handler))
}

async fn backdrop_handler(State(app_state): State<Arc<AppState>>) -> Result<Json<ContentItem>, AppError> {
    let images = app_state.source.fetch_starred_images().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load starred images for the backdrop.");
        Vec::new()
    });
    pick_backdrop(&images, Utc::now(), app_state.config.backdrop_bucket)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No starred image available".to_string()))
}
