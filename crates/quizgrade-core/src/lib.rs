//! quizgrade-core: Quiz loading, answer evaluation, scoring, and reports.
//!
//! This crate defines the quiz data model, the JSON loader, the per-question
//! evaluator, score aggregation, and the mistake report formatter. Session
//! state lives in an explicit [`session::SessionContext`]; everything else is
//! side-effect free.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod model;
pub mod report;
pub mod session;
pub mod statistics;

pub use error::QuizError;
pub use model::{Question, QuestionKind, Quiz, SlotKey, Submission};
