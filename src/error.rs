//! Global error handling module for the Anime List API
//!
//! This module provides a unified error type that handles all application errors
//! and converts them to HTTP responses with a consistent `{status, message}` body.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::{DbError, RepositoryError};
use crate::models::ErrorBody;

pub const BAD_DATA_MESSAGE: &str = "Invalid data provided";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
pub const DUPLICATE_MESSAGE: &str = "Duplicate data found, this data already exists.";
pub const INTERNAL_MESSAGE: &str = "An unexpected condition was encountered.";

/// Application-wide error type that unifies all error sources
#[derive(Debug, Error)]
pub enum AppError {
    /// Database connection and health errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Repository query errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication-related errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Request data failed validation
    #[error("Bad data: {0}")]
    BadData(String),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate resource
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a bad data error
    pub fn bad_data(msg: impl Into<String>) -> Self {
        AppError::BadData(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadData(_) => StatusCode::BAD_REQUEST,

            AppError::Auth(auth_err) => match auth_err {
                AuthError::HashingError(_) | AuthError::TokenGenerationError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::UNAUTHORIZED,
            },

            AppError::NotFound(_) | AppError::Repository(RepositoryError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }

            AppError::Conflict(_) | AppError::Repository(RepositoryError::Duplicate(_)) => {
                StatusCode::CONFLICT
            }

            AppError::Database(_)
            | AppError::Repository(RepositoryError::DatabaseError(_))
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message exposed to clients
    ///
    /// Server-side failures never leak their details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadData(msg) if msg.is_empty() => BAD_DATA_MESSAGE.to_string(),
            AppError::BadData(msg) => msg.clone(),
            AppError::NotFound(msg) if msg.is_empty() => NOT_FOUND_MESSAGE.to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(msg) if msg.is_empty() => DUPLICATE_MESSAGE.to_string(),
            AppError::Conflict(msg) => msg.clone(),

            AppError::Repository(RepositoryError::NotFound(_)) => NOT_FOUND_MESSAGE.to_string(),
            AppError::Repository(RepositoryError::Duplicate(_)) => DUPLICATE_MESSAGE.to_string(),

            AppError::Auth(auth_err) => match auth_err {
                AuthError::HashingError(_) | AuthError::TokenGenerationError(_) => {
                    INTERNAL_MESSAGE.to_string()
                }
                AuthError::TokenExpired => "The token has expired.".to_string(),
                AuthError::InvalidToken | AuthError::TokenVerificationError(_) => {
                    "The token or authorization scheme is invalid or expired.".to_string()
                }
                other => other.to_string(),
            },

            AppError::Database(_)
            | AppError::Repository(RepositoryError::DatabaseError(_))
            | AppError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorBody::new(status, self.user_message()))
    }
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_data_error_status_code() {
        let error = AppError::bad_data("Invalid input");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status_code() {
        let error = AppError::not_found("Resource not found");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);

        let error = AppError::Repository(RepositoryError::NotFound("anime".to_string()));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_status_code() {
        let error = AppError::conflict("Resource already exists");
        assert_eq!(error.status_code(), StatusCode::CONFLICT);

        let error = AppError::Repository(RepositoryError::Duplicate("users_email_key".to_string()));
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert_eq!(error.user_message(), DUPLICATE_MESSAGE);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let error = AppError::internal("connection pool exhausted");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.user_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_auth_error_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::InvalidToken,
            AuthError::MissingAuthHeader,
            AuthError::InvalidAuthScheme,
            AuthError::NotResourceOwner,
        ] {
            assert_eq!(AppError::Auth(err).status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_auth_processing_errors_are_internal() {
        let error = AppError::Auth(AuthError::HashingError("boom".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.user_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_auth_error_user_messages() {
        let error = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(error.user_message(), "The credentials provided are invalid");

        let error = AppError::Auth(AuthError::MissingAuthHeader);
        assert_eq!(error.user_message(), "No authorization header present.");

        let error = AppError::Auth(AuthError::NotResourceOwner);
        assert_eq!(
            error.user_message(),
            "You are not authorized to modify this resource."
        );
    }

    #[test]
    fn test_empty_messages_fall_back_to_defaults() {
        assert_eq!(AppError::bad_data("").user_message(), BAD_DATA_MESSAGE);
        assert_eq!(AppError::not_found("").user_message(), NOT_FOUND_MESSAGE);
        assert_eq!(AppError::conflict("").user_message(), DUPLICATE_MESSAGE);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::bad_data("test error");
        assert_eq!(format!("{}", error), "Bad data: test error");

        let error = AppError::not_found("anime");
        assert_eq!(format!("{}", error), "Not found: anime");
    }

    #[test]
    fn test_from_auth_error() {
        let app_err: AppError = AuthError::InvalidCredentials.into();
        assert!(matches!(app_err, AppError::Auth(_)));
    }

    #[test]
    fn test_from_db_error() {
        let app_err: AppError = DbError::HealthCheckError("test".to_string()).into();
        assert!(matches!(app_err, AppError::Database(_)));
        assert_eq!(app_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
