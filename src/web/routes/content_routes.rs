use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::content::ContentDraft;
use crate::db::models::StoredContent;
use crate::db::services::content_service;
use crate::web::models::StarRequest;
use crate::web::{AppError, AppState};

pub fn create_content_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_content_handler).post(create_content_handler))
        .route(
            "/{content_id}",
            get(get_content_handler)
                .put(update_content_handler)
                .delete(delete_content_handler),
        )
        .route("/{content_id}/star", put(star_handler))
}

async fn list_content_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredContent>>, AppError> {
    let content = content_service::list_content(&app_state.db_pool).await?;
    Ok(Json(content))
}

async fn create_content_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ContentDraft>,
) -> Result<(StatusCode, Json<StoredContent>), AppError> {
    let content = payload.validate()?;
    let stored = content_service::create_content(&app_state.db_pool, content).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_content_handler(
    State(app_state): State<Arc<AppState>>,
    Path(content_id): Path<Uuid>,
) -> Result<Json<StoredContent>, AppError> {
    let stored = content_service::get_content(&app_state.db_pool, content_id).await?;
    Ok(Json(stored))
}

async fn update_content_handler(
    State(app_state): State<Arc<AppState>>,
    Path(content_id): Path<Uuid>,
    Json(payload): Json<ContentDraft>,
) -> Result<Json<StoredContent>, AppError> {
    let content = payload.validate()?;
    let stored = content_service::update_content(&app_state.db_pool, content_id, content).await?;
    Ok(Json(stored))
}

async fn delete_content_handler(
    State(app_state): State<Arc<AppState>>,
    Path(content_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    content_service::delete_content(&app_state.db_pool, content_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn star_handler(
    State(app_state): State<Arc<AppState>>,
    Path(content_id): Path<Uuid>,
    Json(payload): Json<StarRequest>,
) -> Result<Json<StoredContent>, AppError> {
    let stored = content_service::set_starred(&app_state.db_pool, content_id, payload.is_starred).await?;
    Ok(Json(stored))
}
