//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entities::{Answer, ExamSession, Question};
use crate::error::ExamResult;
use kernel::id::ExamSessionId;

/// Exam session repository trait
#[trait_variant::make(ExamSessionRepository: Send)]
pub trait LocalExamSessionRepository {
    /// Create a new session (single atomic write)
    async fn create(&self, session: &ExamSession) -> ExamResult<()>;

    /// Get a session by ID
    async fn get(&self, session_id: ExamSessionId) -> ExamResult<Option<ExamSession>>;

    /// Mark a session finished. Only ever sets the flag to true, so the
    /// transition is monotonic and a repeated call is a no-op.
    async fn finish(&self, session_id: ExamSessionId) -> ExamResult<()>;
}

/// Question repository trait (read-only question store)
#[trait_variant::make(QuestionRepository: Send)]
pub trait LocalQuestionRepository {
    /// The question with the globally minimum id
    async fn first(&self) -> ExamResult<Option<Question>>;

    /// The next question with id strictly greater than `question_id`,
    /// ascending, limit one
    async fn next_after(&self, question_id: i32) -> ExamResult<Option<Question>>;
}

/// Answer repository trait
#[trait_variant::make(AnswerRepository: Send)]
pub trait LocalAnswerRepository {
    /// Insert a submission record. A uniqueness conflict on
    /// (session_id, question_id) surfaces as `ExamError::DuplicateAnswer`;
    /// no duplicate row is ever written.
    async fn insert(&self, answer: &Answer) -> ExamResult<()>;

    /// Number of answers recorded for the session
    async fn count_for_session(&self, session_id: ExamSessionId) -> ExamResult<u32>;

    /// Highest answered question id for the session, if any
    async fn highest_answered(&self, session_id: ExamSessionId) -> ExamResult<Option<i32>>;

    /// Number of recorded answers matching the question store's
    /// correct answer, for grading
    async fn count_correct(&self, session_id: ExamSessionId) -> ExamResult<u32>;
}
