//! Exam Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, grading engine, repository traits
//! - `application/` - Use cases (start, submit-answer, status)
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers
//!
//! ## State Machine
//! - A session is Active until it finishes or its 10-minute limit elapses
//! - Expiry is a lazy predicate checked when a mutating request arrives,
//!   never a background timer
//! - `is_finished` flips false -> true exactly once and never reverts
//! - The (session, question) uniqueness constraint is the sole
//!   concurrency-safety mechanism for duplicate answers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ExamConfig;
pub use error::{ExamError, ExamResult};
pub use infra::postgres::PgExamRepository;
pub use presentation::router::exam_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
