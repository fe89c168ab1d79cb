//! PostgreSQL Repository Implementations

use crate::domain::entities::{Answer, ExamSession, Question};
use crate::domain::repository::{AnswerRepository, ExamSessionRepository, QuestionRepository};
use crate::error::{ExamError, ExamResult};
use kernel::id::ExamSessionId;
use sqlx::PgPool;
use uuid::Uuid;

// PostgreSQL unique_violation, the conflict signal behind DuplicateAnswer
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgExamRepository {
    pool: PgPool,
}

impl PgExamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ExamSessionRepository for PgExamRepository {
    async fn create(&self, session: &ExamSession) -> ExamResult<()> {
        sqlx::query(
            r#"
            INSERT INTO exam_sessions (exam_session_id, started_at, is_finished)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session.id.into_uuid())
        .bind(session.started_at)
        .bind(session.is_finished)
        .execute(&self.pool)
        .await?;

        tracing::info!(session_id = %session.id, "Exam session created");

        Ok(())
    }

    async fn get(&self, session_id: ExamSessionId) -> ExamResult<Option<ExamSession>> {
        let row = sqlx::query_as::<_, ExamSessionRow>(
            r#"
            SELECT exam_session_id, started_at, is_finished
            FROM exam_sessions
            WHERE exam_session_id = $1
            "#,
        )
        .bind(session_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ExamSessionRow::into_session))
    }

    async fn finish(&self, session_id: ExamSessionId) -> ExamResult<()> {
        // Only ever sets the flag to true; repeating the statement cannot
        // revert a finished session
        sqlx::query("UPDATE exam_sessions SET is_finished = TRUE WHERE exam_session_id = $1")
            .bind(session_id.into_uuid())
            .execute(&self.pool)
            .await?;

        tracing::info!(session_id = %session_id, "Exam session marked finished");
        Ok(())
    }
}

impl QuestionRepository for PgExamRepository {
    async fn first(&self) -> ExamResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, question_text, options, correct_answer
            FROM questions
            ORDER BY question_id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn next_after(&self, question_id: i32) -> ExamResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, question_text, options, correct_answer
            FROM questions
            WHERE question_id > $1
            ORDER BY question_id ASC
            LIMIT 1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }
}

impl AnswerRepository for PgExamRepository {
    async fn insert(&self, answer: &Answer) -> ExamResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO exam_answers (exam_session_id, question_id, submitted_answer)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(answer.session_id.into_uuid())
        .bind(answer.question_id)
        .bind(&answer.submitted_answer)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    session_id = %answer.session_id,
                    question_id = answer.question_id,
                    "Answer recorded"
                );
                Ok(())
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                tracing::warn!(
                    session_id = %answer.session_id,
                    question_id = answer.question_id,
                    "Duplicate answer rejected by uniqueness constraint"
                );
                Err(ExamError::DuplicateAnswer)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn count_for_session(&self, session_id: ExamSessionId) -> ExamResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM exam_answers WHERE exam_session_id = $1",
        )
        .bind(session_id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u32)
    }

    async fn highest_answered(&self, session_id: ExamSessionId) -> ExamResult<Option<i32>> {
        let max = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(question_id) FROM exam_answers WHERE exam_session_id = $1",
        )
        .bind(session_id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }

    async fn count_correct(&self, session_id: ExamSessionId) -> ExamResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM exam_answers a
            JOIN questions q ON q.question_id = a.question_id
            WHERE a.exam_session_id = $1
              AND a.submitted_answer = q.correct_answer
            "#,
        )
        .bind(session_id.into_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u32)
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct ExamSessionRow {
    exam_session_id: Uuid,
    started_at: chrono::DateTime<chrono::Utc>,
    is_finished: bool,
}

impl ExamSessionRow {
    fn into_session(self) -> ExamSession {
        ExamSession {
            id: ExamSessionId::from_uuid(self.exam_session_id),
            started_at: self.started_at,
            is_finished: self.is_finished,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    question_id: i32,
    question_text: String,
    options: Vec<String>,
    correct_answer: String,
}

impl QuestionRow {
    fn into_question(self) -> Question {
        Question {
            id: self.question_id,
            text: self.question_text,
            options: self.options,
            correct_answer: self.correct_answer,
        }
    }
}
