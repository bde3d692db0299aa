use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use std::sync::Arc;
use tracing::info;

use crate::content::CaptureSubmission;
use crate::db::models::StoredContent;
use crate::db::services::content_service;
use crate::web::{AppError, AppState};

pub fn create_capture_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(capture_handler))
}

/// Saves what the browser extension clipped as a regular content item.
async fn capture_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CaptureSubmission>,
) -> Result<(StatusCode, Json<StoredContent>), AppError> {
    let page_url = payload.capture.page_url.clone();
    let content = payload.into_new_content()?;
    let stored = content_service::create_content(&app_state.db_pool, content).await?;
    info!(content_id = %stored.item.id, %page_url, "Captured content saved.");
    Ok((StatusCode::CREATED, Json(stored)))
}
