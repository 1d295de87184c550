use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use synctool_core::SyncError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // The auth failure shape is part of the client contract:
            // plain text body plus the Basic challenge header.
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Sync API\"")],
                "HTTP Authentication failed\n",
            )
                .into_response(),
            ApiError::NotFound(msg) => {
                error_body(StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Internal(msg) => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    let body = json!({
        "error": {
            "code": code,
            "message": message
        }
    });

    (status, Json(body)).into_response()
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::UnknownModel(label) => {
                ApiError::NotFound(format!("Model '{}' is not registered", label))
            }
            SyncError::UnknownApp(app) => {
                ApiError::NotFound(format!("No models registered for app '{}'", app))
            }
            SyncError::TableNotFound(table) => {
                ApiError::NotFound(format!("Table '{}' does not exist", table))
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
