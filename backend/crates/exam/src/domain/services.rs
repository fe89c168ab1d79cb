//! Domain Services
//!
//! Pure grading logic for finished exam sessions.

use serde::Serialize;

/// Fixed question count: completion threshold and scoring denominator
pub const TOTAL_QUESTIONS: u32 = 10;

/// Pass/Fail verdict for a graded session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradeStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeStatus::Pass => write!(f, "Pass"),
            GradeStatus::Fail => write!(f, "Fail"),
        }
    }
}

/// Final grade for a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub score_percent: u32,
    pub correct_count: u32,
    pub total_questions: u32,
    pub status: GradeStatus,
    pub remark: &'static str,
}

/// Compute the final grade from the number of correct answers.
///
/// The denominator is always [`TOTAL_QUESTIONS`], regardless of how many
/// questions were actually answered: unanswered questions earn zero credit
/// through the fixed denominator. This is a deliberate scoring rule.
pub fn grade(correct_count: u32) -> Grade {
    let score_percent = correct_count * 100 / TOTAL_QUESTIONS;
    Grade {
        score_percent,
        correct_count,
        total_questions: TOTAL_QUESTIONS,
        status: if score_percent >= 50 {
            GradeStatus::Pass
        } else {
            GradeStatus::Fail
        },
        remark: remark_for(score_percent),
    }
}

fn remark_for(score_percent: u32) -> &'static str {
    if score_percent >= 90 {
        "Excellent work!"
    } else if score_percent >= 70 {
        "Very good!"
    } else if score_percent >= 50 {
        "Good effort!"
    } else {
        "Needs improvement, but keep trying!"
    }
}
