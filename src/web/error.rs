use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::content::ValidationError;
use crate::db::services::{ContentServiceError, TagServiceError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {msg}"),
            ),
            AppError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        error!(error = %err, "Database operation failed.");
        AppError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(format!("JSON serialization/deserialization error: {err}"))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<TagServiceError> for AppError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::EmptyName => AppError::InvalidInput(err.to_string()),
            TagServiceError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            TagServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            TagServiceError::Db { .. } => {
                error!(error = %err, "Tag write failed.");
                AppError::DatabaseError(err.to_string())
            }
        }
    }
}

impl From<ContentServiceError> for AppError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::Validation(e) => e.into(),
            ContentServiceError::UnknownTags(_) => AppError::InvalidInput(err.to_string()),
            ContentServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            ContentServiceError::Db { .. } => {
                error!(error = %err, "Content write failed.");
                AppError::DatabaseError(err.to_string())
            }
            ContentServiceError::Malformed { .. } | ContentServiceError::Encode(_) => {
                error!(error = %err, "Content payload could not be processed.");
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::InvalidInput("Title and at least one tag required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Title and at least one tag required" })
        );
    }

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let status = |e: AppError| e.into_response().status();

        assert_eq!(status(TagServiceError::DuplicateName("calm".into()).into()), StatusCode::CONFLICT);
        assert_eq!(status(TagServiceError::EmptyName.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(TagServiceError::NotFound(Uuid::new_v4()).into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ContentServiceError::UnknownTags(vec![Uuid::new_v4()]).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ContentServiceError::Validation(ValidationError::MissingTitleOrTags).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(
                ContentServiceError::Db {
                    operation: "Error adding content",
                    source: sea_orm::DbErr::Custom("down".into()),
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
