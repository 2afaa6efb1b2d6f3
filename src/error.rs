use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain failures raised by the store and the service.
///
/// A missing user is not an error here; lookups return `None` for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("User with username '{0}' already exists")]
    UsernameExists(String),

    #[error("Invalid range: pageCurrent ({page_current}) and pageSize ({page_size}) must be at least 1")]
    InvalidRange {
        page_current: usize,
        page_size: usize,
    },

    #[error("User '{0}' is inactive")]
    InactiveUser(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError to an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::User(UserError::UsernameExists(_)) => (StatusCode::CONFLICT, self.to_string()),
            AppError::User(UserError::InvalidRange { .. }) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::User(UserError::InactiveUser(_)) => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(?self);
        } else {
            tracing::debug!(%status, "{}", message);
        }

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub type Result<T> = std::result::Result<T, AppError>;
