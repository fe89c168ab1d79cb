//! API DTOs (Data Transfer Objects)

use crate::domain::entities::Question;
use crate::domain::services::{Grade, GradeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-facing question: `correct_answer` is withheld until grading
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: i32,
    pub text: String,
    pub options: Vec<String>,
}

impl From<Question> for QuestionDto {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            options: q.options,
        }
    }
}

/// Response for POST /api/exam/start
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartExamResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub question: QuestionDto,
}

/// Request for POST /api/exam/answer
///
/// All fields default to `None` so that a missing field reaches the use case
/// and is rejected there as `InvalidRequest`, instead of failing JSON
/// extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub question_id: Option<i32>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Response body carrying the next question
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionResponse {
    pub next_question: QuestionDto,
}

/// Final grade report, returned on completion (200) or timeout (408)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    /// Percentage string, e.g. "70%"
    pub score: String,
    pub correct_count: u32,
    pub total_questions: u32,
    pub status: GradeStatus,
    pub remark: String,
}

impl From<Grade> for GradeReport {
    fn from(g: Grade) -> Self {
        Self {
            score: format!("{}%", g.score_percent),
            correct_count: g.correct_count,
            total_questions: g.total_questions,
            status: g.status,
            remark: g.remark.to_string(),
        }
    }
}

/// Completion notice for GET /api/exam/status when no questions remain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCompleteResponse {
    pub completed: bool,
    pub message: String,
}
