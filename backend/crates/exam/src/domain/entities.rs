//! Domain Entities
//!
//! Core business entities for the exam domain.

use chrono::{DateTime, Utc};
use kernel::id::ExamSessionId;

/// ExamSession entity - one exam attempt by one client
///
/// `is_finished` is monotonic: it flips false -> true exactly once (on
/// completion or timeout) and never reverts. Expiry is never stored; it is
/// computed lazily from `started_at` when a request arrives.
#[derive(Debug, Clone)]
pub struct ExamSession {
    pub id: ExamSessionId,
    pub started_at: DateTime<Utc>,
    pub is_finished: bool,
}

impl ExamSession {
    /// Create a new active session starting now
    pub fn new() -> Self {
        Self {
            id: ExamSessionId::new(),
            started_at: Utc::now(),
            is_finished: false,
        }
    }

    /// Milliseconds elapsed since the session started
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now().timestamp_millis() - self.started_at.timestamp_millis()
    }

    /// Check whether the exam duration limit has been exceeded
    pub fn is_expired(&self, limit_ms: i64) -> bool {
        self.elapsed_ms() > limit_ms
    }
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Question entity - an ordered, immutable prompt
///
/// `id` is the sequencing key: the exam always starts at the minimum id and
/// advances to the next strictly-greater id. `correct_answer` is consulted
/// only during grading and never leaves the domain/presentation boundary.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Answer entity - one submitted answer, keyed by (session, question)
///
/// At most one record may exist per (session_id, question_id) pair; the
/// uniqueness constraint is enforced at write time by the store.
#[derive(Debug, Clone)]
pub struct Answer {
    pub session_id: ExamSessionId,
    pub question_id: i32,
    pub submitted_answer: String,
}

impl Answer {
    pub fn new(session_id: ExamSessionId, question_id: i32, submitted_answer: String) -> Self {
        Self {
            session_id,
            question_id,
            submitted_answer,
        }
    }
}
