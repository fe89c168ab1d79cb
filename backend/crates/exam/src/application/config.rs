//! Application Configuration
//!
//! Configuration for the exam application layer.

use crate::domain::services::TOTAL_QUESTIONS;
use std::time::Duration;

/// Exam application configuration
#[derive(Debug, Clone)]
pub struct ExamConfig {
    /// Wall-clock bound after which no further answers are accepted
    pub duration: Duration,
    /// Completion threshold (the scoring denominator is fixed separately
    /// in the grading engine)
    pub total_questions: u32,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(600),
            total_questions: TOTAL_QUESTIONS,
        }
    }
}

impl ExamConfig {
    pub fn duration_ms(&self) -> i64 {
        self.duration.as_millis() as i64
    }
}
