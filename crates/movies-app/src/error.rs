use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tracing::{debug, error};

use crate::catalog::CatalogError;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] movies_dal::Error),

    #[error("Multipart error: {0}")]
    MultipartError(#[from] MultipartError),
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::NotFound(_) => ApiError::ResourceNotFound(value.to_string()),
            CatalogError::InvalidInput(msg) => ApiError::InvalidRequest(msg),
            CatalogError::Storage(e) => ApiError::DatabaseError(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest(msg) => {
                debug!("Invalid request: {msg}");
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::ResourceNotFound(msg) => {
                debug!("Not found: {msg}");
                (StatusCode::NOT_FOUND, msg).into_response()
            }
            ApiError::DatabaseError(movies_dal::Error::RecordNotFound(msg)) => {
                debug!("Record not found: {msg}");
                (StatusCode::NOT_FOUND, msg).into_response()
            }
            ApiError::DatabaseError(e) => {
                error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            ApiError::MultipartError(e) => {
                debug!("Multipart error: {e}");
                (e.status(), e.body_text()).into_response()
            }
        }
    }
}
