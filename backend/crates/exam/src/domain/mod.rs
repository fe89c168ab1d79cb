//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (ExamSession, Question, Answer)
//! - Domain services (grading engine)
//! - Repository traits (interfaces)

pub mod entities;
pub mod services;
pub mod repository;
