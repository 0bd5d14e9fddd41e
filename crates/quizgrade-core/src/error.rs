//! Quiz error types.
//!
//! These represent authoring defects in quiz data and caller mistakes when
//! driving a session. Missing or unparseable quiz files are not errors: the
//! loader maps them to absence.

use thiserror::Error;

use crate::model::SlotKey;

/// Errors raised while validating quizzes or recording submissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A correct-answer index points outside the options list.
    #[error("question {question_id}: correct index {index} is out of range for {option_count} option(s)")]
    InconsistentIndex {
        question_id: u32,
        index: usize,
        option_count: usize,
    },

    /// A submitted index points outside the options list.
    #[error("question {question_id}: selected index {index} is out of range for {option_count} option(s)")]
    InvalidSelection {
        question_id: u32,
        index: usize,
        option_count: usize,
    },

    /// A submission's kind does not match the question it answers.
    #[error("question {question_id}: expected a {expected} answer, got {actual}")]
    KindMismatch {
        question_id: u32,
        expected: &'static str,
        actual: &'static str,
    },

    /// The registration step was given a blank user name.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// A submission targeted a slot that was never initialized.
    #[error("slot {0} has not been initialized")]
    SlotNotInitialized(SlotKey),

    /// A submission targeted a question position past the end of the quiz.
    #[error("question position {position} is out of range for {question_count} question(s)")]
    QuestionOutOfRange {
        position: usize,
        question_count: usize,
    },
}

impl QuizError {
    /// Returns `true` for defects in the quiz data itself rather than in how
    /// the engine was called.
    pub fn is_authoring_defect(&self) -> bool {
        matches!(self, QuizError::InconsistentIndex { .. })
    }
}
