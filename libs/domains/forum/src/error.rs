use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ForumError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not permitted: {0}")]
    Unauthorized(String),

    /// Same outward error for an unknown username and a wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Search is temporarily unavailable")]
    SearchUnavailable,

    #[error("Embedding service failed")]
    EmbeddingFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ForumResult<T> = Result<T, ForumError>;

impl ForumError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Maps a storage error: unique and foreign-key violations become
/// `ConstraintViolation` with `conflict` as the outward message; anything else is internal.
pub(crate) fn db_err(err: DbErr, conflict: &str) -> ForumError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ForumError::ConstraintViolation(conflict.to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ForumError::ConstraintViolation("Referenced record does not exist".to_string())
        }
        _ => ForumError::Internal(format!("Database error: {}", err)),
    }
}

pub(crate) fn internal(err: DbErr) -> ForumError {
    ForumError::Internal(format!("Database error: {}", err))
}

impl From<ForumError> for AppError {
    fn from(err: ForumError) -> Self {
        match err {
            ForumError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} {} not found", entity, id))
            }
            ForumError::ConstraintViolation(msg) => AppError::Conflict(msg),
            ForumError::Unauthorized(msg) => AppError::Forbidden(msg),
            ForumError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".to_string())
            }
            ForumError::BadRequest(msg) => AppError::BadRequest(msg),
            ForumError::SearchUnavailable => {
                AppError::ServiceUnavailable("Search is temporarily unavailable".to_string())
            }
            ForumError::EmbeddingFailed => {
                AppError::BadGateway("Could not index the post, try again later".to_string())
            }
            ForumError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
