//! Exam Error Types
//!
//! This module provides exam-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! A timed-out submission is NOT an error: it is a terminal result carrying
//! the final grade, modeled as [`crate::application::submit_answer::SubmitAnswerOutput::TimedOut`]
//! and rendered as 408 by the handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Exam-specific result type alias
pub type ExamResult<T> = Result<T, ExamError>;

/// Exam-specific error variants
///
/// These map to the HTTP status codes of the public contract and can be
/// converted to `AppError` for unified error handling.
#[derive(Debug, Error)]
pub enum ExamError {
    /// A required request field is missing or empty
    #[error("Missing required field: {0}")]
    InvalidRequest(&'static str),

    /// Session id does not resolve to an existing session
    #[error("Exam session not found")]
    SessionNotFound,

    /// Session is already finished; no further operations are accepted
    #[error("Exam already completed")]
    AlreadyCompleted,

    /// An answer for this (session, question) pair is already recorded
    #[error("Answer already submitted for this question")]
    DuplicateAnswer,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExamError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExamError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ExamError::SessionNotFound => StatusCode::NOT_FOUND,
            ExamError::AlreadyCompleted => StatusCode::FORBIDDEN,
            ExamError::DuplicateAnswer => StatusCode::CONFLICT,
            ExamError::Database(_) | ExamError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExamError::InvalidRequest(_) => ErrorKind::BadRequest,
            ExamError::SessionNotFound => ErrorKind::NotFound,
            ExamError::AlreadyCompleted => ErrorKind::Forbidden,
            ExamError::DuplicateAnswer => ErrorKind::Conflict,
            ExamError::Database(_) | ExamError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ExamError::Database(e) => {
                tracing::error!(error = %e, "Exam database error");
            }
            ExamError::Internal(msg) => {
                tracing::error!(message = %msg, "Exam internal error");
            }
            ExamError::DuplicateAnswer => {
                tracing::warn!("Duplicate answer rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Exam error");
            }
        }
    }
}

impl From<ExamError> for AppError {
    fn from(err: ExamError) -> Self {
        let kind = err.kind();
        match err {
            // Persistence details stay out of client-facing messages
            ExamError::Database(e) => {
                AppError::new(kind, "Internal server error").with_source(e)
            }
            ExamError::Internal(_) => AppError::new(kind, "Internal server error"),
            other => AppError::new(kind, other.to_string()),
        }
    }
}

impl IntoResponse for ExamError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
