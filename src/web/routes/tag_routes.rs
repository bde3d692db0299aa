use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::entities::tag;
use crate::db::models::TagWithCount;
use crate::db::services::tag_service;
use crate::feed::Tag;
use crate::web::models::TagNameRequest;
use crate::web::{AppError, AppState};

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_tags_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tags_with_counts_handler).post(create_tag_handler))
        .route("/{tag_id}", put(rename_tag_handler).delete(delete_tag_handler))
}

/// The mood picker's catalog. A failed read shows an empty picker.
async fn list_tags_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<Tag>> {
    match app_state.source.fetch_tags().await {
        Ok(tags) => Json(tags),
        Err(e) => {
            warn!(error = %e, "Failed to load tag catalog, returning no tags.");
            Json(Vec::new())
        }
    }
}

async fn list_tags_with_counts_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagWithCount>>, AppError> {
    let tags = tag_service::list_tags_with_counts(&app_state.db_pool).await?;
    Ok(Json(tags))
}

async fn create_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<TagNameRequest>,
) -> Result<(StatusCode, Json<tag::Model>), AppError> {
    let tag = tag_service::create_tag(&app_state.db_pool, &payload.name).await?;
    info!(tag_id = %tag.id, name = %tag.name, "Tag created.");
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn rename_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<Uuid>,
    Json(payload): Json<TagNameRequest>,
) -> Result<Json<tag::Model>, AppError> {
    let tag = tag_service::rename_tag(&app_state.db_pool, tag_id, &payload.name).await?;
    Ok(Json(tag))
}

async fn delete_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tag_service::delete_tag(&app_state.db_pool, tag_id).await?;
    info!(%tag_id, "Tag deleted.");
    Ok(StatusCode::NO_CONTENT)
}
