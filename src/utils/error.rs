use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use thiserror::Error;

use crate::utils::response::Envelope;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    UnauthorizedError(String),

    #[error("{0}")]
    ForbiddenError(String),

    #[error("{0}")]
    NotFoundError(String),

    #[error("{0}")]
    ConflictError(String),

    /// A concurrent request inserted a reaction for the same (post, user)
    /// pair between our lookup and our insert.
    #[error("A reaction for this post is already being recorded, please retry")]
    DuplicateReaction,

    /// A cascade stopped after some of its steps had already committed.
    /// Every step is idempotent, so the whole delete can be retried.
    #[error(
        "Deleting {target} stopped at step '{step}' after completing [{}]; retrying the delete is safe",
        .completed.join(", ")
    )]
    PartialCascadeFailure {
        target: String,
        step: &'static str,
        completed: Vec<&'static str>,
    },

    #[error("{0}")]
    StorageUnavailable(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl CustomError {
    pub fn code(&self) -> &'static str {
        match self {
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::UnauthorizedError(..) => "UNAUTHORIZED_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::ConflictError(..) => "CONFLICT_ERROR",
            CustomError::DuplicateReaction => "DUPLICATE_REACTION",
            CustomError::PartialCascadeFailure { .. } => "PARTIAL_CASCADE_FAILURE",
            CustomError::StorageUnavailable(..) => "STORAGE_UNAVAILABLE",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Translate a driver error into the public taxonomy. The raw error is
    /// logged here and never reaches the client.
    pub fn from_storage(context: &str, err: mongodb::error::Error) -> Self {
        log::error!("{}: {}", context, err);
        if is_connection_failure(&err) {
            CustomError::StorageUnavailable("Storage is temporarily unavailable".to_string())
        } else {
            CustomError::InternalServerError(context.to_string())
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::UnauthorizedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::DuplicateReaction => StatusCode::CONFLICT,
            CustomError::PartialCascadeFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::StorageUnavailable(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(Envelope::<()>::failure(
            status,
            self.to_string(),
            self.code(),
        ))
    }
}

pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code: 11000, .. }))
    )
}

fn is_connection_failure(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Io(..)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
    )
}
