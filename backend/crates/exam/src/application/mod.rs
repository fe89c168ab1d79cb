//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod exam_status;
pub mod start_exam;
pub mod submit_answer;
