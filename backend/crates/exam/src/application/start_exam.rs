//! Start Exam Use Case

use crate::domain::entities::{ExamSession, Question};
use crate::domain::repository::{ExamSessionRepository, QuestionRepository};
use crate::error::{ExamError, ExamResult};
use chrono::{DateTime, Utc};
use kernel::id::ExamSessionId;
use std::sync::Arc;

/// Output DTO for start exam
#[derive(Debug, Clone)]
pub struct StartExamOutput {
    pub session_id: ExamSessionId,
    pub started_at: DateTime<Utc>,
    pub first_question: Question,
}

/// Start Exam Use Case
pub struct StartExamUseCase<S, Q>
where
    S: ExamSessionRepository,
    Q: QuestionRepository,
{
    session_repo: Arc<S>,
    question_repo: Arc<Q>,
}

impl<S, Q> StartExamUseCase<S, Q>
where
    S: ExamSessionRepository,
    Q: QuestionRepository,
{
    pub fn new(session_repo: Arc<S>, question_repo: Arc<Q>) -> Self {
        Self {
            session_repo,
            question_repo,
        }
    }

    pub async fn execute(&self) -> ExamResult<StartExamOutput> {
        // Resolve the first question before writing anything, so a failure
        // here leaves no partial session behind
        let first_question = self
            .question_repo
            .first()
            .await?
            .ok_or_else(|| ExamError::Internal("question store is empty".to_string()))?;

        let session = ExamSession::new();
        self.session_repo.create(&session).await?;

        tracing::info!(
            session_id = %session.id,
            first_question_id = first_question.id,
            "Exam session started"
        );

        Ok(StartExamOutput {
            session_id: session.id,
            started_at: session.started_at,
            first_question,
        })
    }
}
