//! Exam Router

use crate::application::config::ExamConfig;
use crate::domain::repository::{AnswerRepository, ExamSessionRepository, QuestionRepository};
use crate::infra::postgres::PgExamRepository;
use crate::presentation::handlers::{self, ExamAppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the exam router with PostgreSQL repository
pub fn exam_router(repo: PgExamRepository, config: ExamConfig) -> Router {
    exam_router_generic(repo, config)
}

/// Create a generic exam router for any repository implementation
pub fn exam_router_generic<R>(repo: R, config: ExamConfig) -> Router
where
    R: ExamSessionRepository
        + QuestionRepository
        + AnswerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = ExamAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/start", post(handlers::start_exam::<R>))
        .route("/answer", post(handlers::submit_answer::<R>))
        .route("/status/{session_id}", get(handlers::exam_status::<R>))
        .with_state(state)
}
