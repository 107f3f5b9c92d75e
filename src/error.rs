//! Error types for Bookshelf server

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    BadValue = 18,
    BookInUse = 21,
}

/// Persisted entity kinds, used to qualify lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Book => f.write_str("Book"),
            Entity::User => f.write_str("User"),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A required lookup found no row
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: Entity, id: i64 },

    /// The store refused the write because of a referential constraint
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn book_not_found(id: i64) -> Self {
        AppError::NotFound { entity: Entity::Book, id }
    }

    pub fn user_not_found(id: i64) -> Self {
        AppError::NotFound { entity: Entity::User, id }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err)
                if matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) =>
            {
                let detail = match db_err.constraint() {
                    Some(constraint) => format!("{} ({})", db_err.message(), constraint),
                    None => db_err.message().to_string(),
                };
                AppError::ConstraintViolation(detail)
            }
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound { entity: Entity::Book, .. } => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook)
            }
            AppError::NotFound { entity: Entity::User, .. } => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser)
            }
            AppError::ConstraintViolation(_) => (StatusCode::CONFLICT, ErrorCode::BookInUse),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::ConstraintViolation(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                self.to_string()
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound { .. } => self.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
