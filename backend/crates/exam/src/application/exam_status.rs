//! Exam Status Use Case
//!
//! Read-only resume operation: reports the next unanswered question for an
//! active session without writing anything.

use crate::domain::entities::Question;
use crate::domain::repository::{AnswerRepository, ExamSessionRepository, QuestionRepository};
use crate::error::{ExamError, ExamResult};
use kernel::id::ExamSessionId;
use std::sync::Arc;

/// Output DTO for exam status
#[derive(Debug, Clone)]
pub enum ExamStatusOutput {
    /// The next unanswered question for the session
    Next { question: Question },
    /// Every question has been answered. This path reports completion but
    /// deliberately does NOT run the grading transition, diverging from the
    /// equivalent path in submit-answer (open product question; preserved
    /// as observed).
    Exhausted,
}

/// Exam Status Use Case
pub struct ExamStatusUseCase<S, Q, A>
where
    S: ExamSessionRepository,
    Q: QuestionRepository,
    A: AnswerRepository,
{
    session_repo: Arc<S>,
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
}

impl<S, Q, A> ExamStatusUseCase<S, Q, A>
where
    S: ExamSessionRepository,
    Q: QuestionRepository,
    A: AnswerRepository,
{
    pub fn new(session_repo: Arc<S>, question_repo: Arc<Q>, answer_repo: Arc<A>) -> Self {
        Self {
            session_repo,
            question_repo,
            answer_repo,
        }
    }

    pub async fn execute(&self, session_id: ExamSessionId) -> ExamResult<ExamStatusOutput> {
        let session = self
            .session_repo
            .get(session_id)
            .await?
            .ok_or(ExamError::SessionNotFound)?;

        if session.is_finished {
            return Err(ExamError::AlreadyCompleted);
        }

        // No timeout check here: expiry is only evaluated by
        // session-mutating operations, and status never writes
        let next = match self.answer_repo.highest_answered(session.id).await? {
            Some(last_answered) => self.question_repo.next_after(last_answered).await?,
            None => self.question_repo.first().await?,
        };

        match next {
            Some(question) => {
                tracing::debug!(
                    session_id = %session.id,
                    next_question_id = question.id,
                    "Exam status resolved"
                );
                Ok(ExamStatusOutput::Next { question })
            }
            None => Ok(ExamStatusOutput::Exhausted),
        }
    }
}
