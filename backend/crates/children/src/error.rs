//! Children Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use auth::AuthError;

/// Children-specific result type alias
pub type ChildrenResult<T> = Result<T, ChildrenError>;

/// Children-specific error variants
#[derive(Debug, Error)]
pub enum ChildrenError {
    /// A batch record failed validation; identifies the offending record
    #[error("Validation failed at index {index}, field '{field}': {message}")]
    Validation {
        index: usize,
        field: &'static str,
        message: String,
    },

    /// No child carries the presented linking code
    #[error("Code not found")]
    CodeNotFound,

    /// Child record does not exist
    #[error("Child not found")]
    ChildNotFound,

    /// Company record does not exist
    #[error("Company not found")]
    CompanyNotFound,

    /// A freshly generated linking code already exists; retryable
    #[error("Linking code collision")]
    CodeCollision,

    /// Auth failure surfaced from the guard
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChildrenError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChildrenError::Validation { .. } => StatusCode::BAD_REQUEST,
            ChildrenError::CodeNotFound
            | ChildrenError::ChildNotFound
            | ChildrenError::CompanyNotFound => StatusCode::NOT_FOUND,
            ChildrenError::Auth(e) => e.status_code(),
            ChildrenError::CodeCollision
            | ChildrenError::Database(_)
            | ChildrenError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChildrenError::Validation { .. } => ErrorKind::BadRequest,
            ChildrenError::CodeNotFound
            | ChildrenError::ChildNotFound
            | ChildrenError::CompanyNotFound => ErrorKind::NotFound,
            ChildrenError::Auth(e) => e.kind(),
            ChildrenError::CodeCollision
            | ChildrenError::Database(_)
            | ChildrenError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ChildrenError::Database(e) => {
                tracing::error!(error = %e, "Children database error");
            }
            ChildrenError::Internal(msg) => {
                tracing::error!(message = %msg, "Children internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Children error");
            }
        }
    }
}

impl IntoResponse for ChildrenError {
    fn into_response(self) -> Response {
        // Auth failures keep their own logging
        if let ChildrenError::Auth(e) = self {
            return e.into_response();
        }
        self.log();
        self.to_app_error().into_response()
    }
}
