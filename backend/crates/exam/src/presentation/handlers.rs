//! HTTP Handlers

use crate::application::config::ExamConfig;
use crate::application::exam_status::{ExamStatusOutput, ExamStatusUseCase};
use crate::application::start_exam::StartExamUseCase;
use crate::application::submit_answer::{
    SubmitAnswerInput, SubmitAnswerOutput, SubmitAnswerUseCase,
};
use crate::domain::repository::{AnswerRepository, ExamSessionRepository, QuestionRepository};
use crate::error::{ExamError, ExamResult};
use crate::presentation::dto::{
    ExamCompleteResponse, GradeReport, NextQuestionResponse, StartExamResponse, SubmitAnswerRequest,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::id::ExamSessionId;
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for exam handlers
#[derive(Clone)]
pub struct ExamAppState<R>
where
    R: ExamSessionRepository
        + QuestionRepository
        + AnswerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<ExamConfig>,
}

/// POST /api/exam/start
pub async fn start_exam<R>(State(state): State<ExamAppState<R>>) -> ExamResult<Response>
where
    R: ExamSessionRepository
        + QuestionRepository
        + AnswerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = StartExamUseCase::new(state.repo.clone(), state.repo.clone());

    let output = use_case.execute().await?;

    let body = StartExamResponse {
        session_id: output.session_id.into_uuid(),
        started_at: output.started_at,
        question: output.first_question.into(),
    };

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// POST /api/exam/answer
pub async fn submit_answer<R>(
    State(state): State<ExamAppState<R>>,
    Json(req): Json<SubmitAnswerRequest>,
) -> ExamResult<Response>
where
    R: ExamSessionRepository
        + QuestionRepository
        + AnswerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = SubmitAnswerUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = SubmitAnswerInput {
        session_id: req.session_id,
        question_id: req.question_id,
        answer: req.answer,
    };

    let response = match use_case.execute(input).await? {
        SubmitAnswerOutput::Next { question } => Json(NextQuestionResponse {
            next_question: question.into(),
        })
        .into_response(),
        SubmitAnswerOutput::Completed { grade } => {
            Json(GradeReport::from(grade)).into_response()
        }
        // Terminal result, not an error: the grade payload rides along with
        // the timeout status
        SubmitAnswerOutput::TimedOut { grade } => {
            (StatusCode::REQUEST_TIMEOUT, Json(GradeReport::from(grade))).into_response()
        }
    };

    Ok(response)
}

/// GET /api/exam/status/{session_id}
pub async fn exam_status<R>(
    State(state): State<ExamAppState<R>>,
    Path(session_id): Path<String>,
) -> ExamResult<Response>
where
    R: ExamSessionRepository
        + QuestionRepository
        + AnswerRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    // A malformed id cannot resolve to a session; report it as a lookup miss
    let session_id = Uuid::parse_str(&session_id)
        .map(ExamSessionId::from_uuid)
        .map_err(|_| ExamError::SessionNotFound)?;

    let use_case = ExamStatusUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
    );

    let response = match use_case.execute(session_id).await? {
        ExamStatusOutput::Next { question } => Json(NextQuestionResponse {
            next_question: question.into(),
        })
        .into_response(),
        ExamStatusOutput::Exhausted => Json(ExamCompleteResponse {
            completed: true,
            message: "All questions answered".to_string(),
        })
        .into_response(),
    };

    Ok(response)
}
