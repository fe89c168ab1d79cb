//! Submit Answer Use Case
//!
//! The session-mutating heart of the exam state machine. Transition order:
//! field validation, session lookup, finished check, lazy timeout check,
//! answer insert, progress check, completion.

use crate::application::config::ExamConfig;
use crate::domain::entities::{Answer, Question};
use crate::domain::repository::{AnswerRepository, ExamSessionRepository, QuestionRepository};
use crate::domain::services::{Grade, grade};
use crate::error::{ExamError, ExamResult};
use kernel::id::ExamSessionId;
use std::sync::Arc;
use uuid::Uuid;

/// Input DTO for submit answer
///
/// Fields arrive as `Option`s so that missing request fields are rejected
/// with `InvalidRequest` here, before any persistence access.
#[derive(Debug, Clone)]
pub struct SubmitAnswerInput {
    pub session_id: Option<String>,
    pub question_id: Option<i32>,
    pub answer: Option<String>,
}

/// Output DTO for submit answer
#[derive(Debug, Clone)]
pub enum SubmitAnswerOutput {
    /// Answer recorded; the exam continues with the next question
    Next { question: Question },
    /// Answer recorded and the exam finished; final grade attached
    Completed { grade: Grade },
    /// The duration limit had already elapsed; the submitted answer was
    /// discarded and the session finalized
    TimedOut { grade: Grade },
}

/// Submit Answer Use Case
pub struct SubmitAnswerUseCase<S, Q, A>
where
    S: ExamSessionRepository,
    Q: QuestionRepository,
    A: AnswerRepository,
{
    session_repo: Arc<S>,
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
    config: Arc<ExamConfig>,
}

impl<S, Q, A> SubmitAnswerUseCase<S, Q, A>
where
    S: ExamSessionRepository,
    Q: QuestionRepository,
    A: AnswerRepository,
{
    pub fn new(
        session_repo: Arc<S>,
        question_repo: Arc<Q>,
        answer_repo: Arc<A>,
        config: Arc<ExamConfig>,
    ) -> Self {
        Self {
            session_repo,
            question_repo,
            answer_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SubmitAnswerInput) -> ExamResult<SubmitAnswerOutput> {
        let (session_id, question_id, answer_text) = validate(input)?;

        let session = self
            .session_repo
            .get(session_id)
            .await?
            .ok_or(ExamError::SessionNotFound)?;

        if session.is_finished {
            return Err(ExamError::AlreadyCompleted);
        }

        // Lazy expiry: no background timer exists, the limit is checked at
        // the moment a mutating request arrives. The submitted answer on
        // this path is discarded, not recorded.
        if session.is_expired(self.config.duration_ms()) {
            tracing::info!(
                session_id = %session.id,
                elapsed_ms = session.elapsed_ms(),
                "Exam duration exceeded, finalizing without recording answer"
            );
            let grade = self.finalize(session.id).await?;
            return Ok(SubmitAnswerOutput::TimedOut { grade });
        }

        // A uniqueness conflict on (session, question) surfaces from the
        // store as DuplicateAnswer; two concurrent submissions race at the
        // persistence layer and exactly one wins
        let record = Answer::new(session.id, question_id, answer_text);
        self.answer_repo.insert(&record).await?;

        let answered = self.answer_repo.count_for_session(session.id).await?;
        if answered >= self.config.total_questions {
            let grade = self.finalize(session.id).await?;
            return Ok(SubmitAnswerOutput::Completed { grade });
        }

        match self.question_repo.next_after(question_id).await? {
            Some(question) => {
                tracing::info!(
                    session_id = %session.id,
                    question_id,
                    next_question_id = question.id,
                    answered,
                    "Answer recorded"
                );
                Ok(SubmitAnswerOutput::Next { question })
            }
            None => {
                // Question store exhausted before reaching the completion
                // threshold: finalize anyway
                let grade = self.finalize(session.id).await?;
                Ok(SubmitAnswerOutput::Completed { grade })
            }
        }
    }

    /// Grading transition: flip the finished flag, then score the recorded
    /// answers against the question store. `finish` only ever sets the flag
    /// to true, so a concurrent double invocation is benign.
    async fn finalize(&self, session_id: ExamSessionId) -> ExamResult<Grade> {
        self.session_repo.finish(session_id).await?;
        let correct = self.answer_repo.count_correct(session_id).await?;
        let grade = grade(correct);

        tracing::info!(
            session_id = %session_id,
            correct_count = grade.correct_count,
            score_percent = grade.score_percent,
            status = %grade.status,
            "Exam session finalized"
        );

        Ok(grade)
    }
}

/// Validate request fields and parse the session id.
///
/// Runs before any repository access. An unparseable session UUID cannot
/// resolve to a session and is reported as not-found, matching a lookup miss.
fn validate(input: SubmitAnswerInput) -> ExamResult<(ExamSessionId, i32, String)> {
    let session_id = match input.session_id {
        Some(s) if !s.is_empty() => s,
        _ => return Err(ExamError::InvalidRequest("sessionId")),
    };
    let question_id = input
        .question_id
        .ok_or(ExamError::InvalidRequest("questionId"))?;
    let answer = match input.answer {
        Some(a) if !a.is_empty() => a,
        _ => return Err(ExamError::InvalidRequest("answer")),
    };

    let session_id = Uuid::parse_str(&session_id)
        .map(ExamSessionId::from_uuid)
        .map_err(|_| ExamError::SessionNotFound)?;

    Ok((session_id, question_id, answer))
}
