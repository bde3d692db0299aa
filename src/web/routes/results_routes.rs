use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::feed::{ResultsView, SelectOutcome};
use crate::web::models::{ResultsPage, SelectionParams};
use crate::web::{AppError, AppState};

pub fn create_results_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/results", get(start_results_handler))
        .route("/views/{view_id}", get(get_view_handler).delete(delete_view_handler))
        .route("/views/{view_id}/selection", put(select_handler))
        .route("/views/{view_id}/more", post(load_more_handler))
        .route("/views/{view_id}/next-page", post(next_page_handler))
}

fn find_view(app_state: &AppState, view_id: Uuid) -> Result<Arc<ResultsView>, AppError> {
    app_state
        .views
        .get(&view_id)
        .ok_or_else(|| AppError::NotFound(format!("Results view {view_id} not found")))
}

async fn run_selection(app_state: &AppState, view: &ResultsView, params: SelectionParams) -> ResultsPage {
    let outcome = view
        .select(app_state.source.as_ref(), params.selection(), params.match_mode)
        .await;
    let mut page = ResultsPage::from_state(view.id(), outcome.state());
    page.superseded = matches!(outcome, SelectOutcome::Superseded(_));
    page
}

/// Opens a new view and runs the first selection on it.
async fn start_results_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> Json<ResultsPage> {
    let view = app_state.views.create();
    Json(run_selection(&app_state, &view, params).await)
}

async fn select_handler(
    State(app_state): State<Arc<AppState>>,
    Path(view_id): Path<Uuid>,
    Query(params): Query<SelectionParams>,
) -> Result<Json<ResultsPage>, AppError> {
    let view = find_view(&app_state, view_id)?;
    Ok(Json(run_selection(&app_state, &view, params).await))
}

async fn get_view_handler(
    State(app_state): State<Arc<AppState>>,
    Path(view_id): Path<Uuid>,
) -> Result<Json<ResultsPage>, AppError> {
    let view = find_view(&app_state, view_id)?;
    let state = view.snapshot().await;
    Ok(Json(ResultsPage::from_state(view_id, &state)))
}

async fn load_more_handler(
    State(app_state): State<Arc<AppState>>,
    Path(view_id): Path<Uuid>,
) -> Result<Json<ResultsPage>, AppError> {
    let view = find_view(&app_state, view_id)?;
    let state = view.load_more().await;
    Ok(Json(ResultsPage::from_state(view_id, &state)))
}

async fn next_page_handler(
    State(app_state): State<Arc<AppState>>,
    Path(view_id): Path<Uuid>,
) -> Result<Json<ResultsPage>, AppError> {
    let view = find_view(&app_state, view_id)?;
    let state = view.next_page().await;
    Ok(Json(ResultsPage::from_state(view_id, &state)))
}

async fn delete_view_handler(
    State(app_state): State<Arc<AppState>>,
    Path(view_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if app_state.views.remove(&view_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Results view {view_id} not found")))
    }
}
