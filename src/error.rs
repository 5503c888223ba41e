use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    fn database_kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Database(sqlx::Error::Database(err)) => Some(err.kind()),
            _ => None,
        }
    }

    /// True when the storage layer rejected a duplicate unique column (e.g. `users.email`).
    pub fn is_unique_violation(&self) -> bool {
        matches!(self.database_kind(), Some(ErrorKind::UniqueViolation))
    }

    /// True when an insert or update referenced a user or trip that does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self.database_kind(), Some(ErrorKind::ForeignKeyViolation))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            err if err.is_unique_violation() => StatusCode::CONFLICT,
            err if err.is_foreign_key_violation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UnknownField(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Io(_) | AppError::Database(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
