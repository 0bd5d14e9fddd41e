//! Core data model types for quizgrade.
//!
//! These are the types the loader produces and the evaluator, aggregator,
//! and report formatter consume.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single quiz question with its answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Identifier, unique within a quiz.
    pub id: u32,
    /// The question as shown to the learner.
    pub text: String,
    /// Question type together with its answer key.
    pub kind: QuestionKind,
    /// Answer options, indexed by the answer key and by submissions.
    pub options: Vec<String>,
    /// Explanation shown after the answers are checked.
    pub explanation: String,
}

impl Question {
    /// Text of the option at `index`, if it exists.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// Whether this question takes part in automatic grading.
    pub fn is_graded(&self) -> bool {
        !matches!(self.kind, QuestionKind::FreeText)
    }
}

/// Question type and the answer key that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Exactly one option is correct.
    SingleChoice { correct_answer: usize },
    /// A set of options is correct; the learner must pick exactly that set.
    MultipleChoice { correct_answers: BTreeSet<usize> },
    /// Free-form text, never graded automatically.
    FreeText,
}

impl QuestionKind {
    /// Wire name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "single_choice",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::FreeText => "free_text",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One quiz: a single standalone file or one subsection of a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    /// Title, also used as the subsection name.
    pub title: String,
    /// Questions in display and report order.
    pub questions: Vec<Question>,
    /// Links to remedial material.
    pub study_links: Vec<String>,
}

impl Quiz {
    /// Number of questions that take part in automatic grading.
    pub fn graded_question_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_graded()).count()
    }

    /// A submission array with every question unanswered.
    pub fn empty_submissions(&self) -> Vec<Option<Submission>> {
        vec![None; self.questions.len()]
    }
}

/// A learner's answer to one question.
///
/// An unanswered question is represented by `None` in the submission array,
/// not by a variant of this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "answer", rename_all = "snake_case")]
pub enum Submission {
    /// The selected option, or `None` when nothing was selected.
    SingleChoice(Option<usize>),
    /// Selected options in selection order.
    MultipleChoice(Vec<usize>),
    /// Typed text.
    FreeText(String),
}

impl Submission {
    /// Wire name of this submission's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Submission::SingleChoice(_) => "single_choice",
            Submission::MultipleChoice(_) => "multiple_choice",
            Submission::FreeText(_) => "free_text",
        }
    }

    /// Whether this submission has the same kind as `question`.
    pub fn matches_kind(&self, question: &Question) -> bool {
        matches!(
            (self, &question.kind),
            (Submission::SingleChoice(_), QuestionKind::SingleChoice { .. })
                | (Submission::MultipleChoice(_), QuestionKind::MultipleChoice { .. })
                | (Submission::FreeText(_), QuestionKind::FreeText)
        )
    }

    /// Option indices referenced by this submission.
    pub fn selected_indices(&self) -> Vec<usize> {
        match self {
            Submission::SingleChoice(choice) => choice.iter().copied().collect(),
            Submission::MultipleChoice(choices) => choices.clone(),
            Submission::FreeText(_) => Vec::new(),
        }
    }
}

/// Identifies one quiz page inside a section: a slot (tab), and for
/// partitioned slots, the subsection position in file-name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    /// 1-based slot number.
    pub slot: usize,
    /// 0-based subsection position, `None` for a standalone quiz.
    pub subsection: Option<usize>,
}

impl SlotKey {
    pub fn standalone(slot: usize) -> Self {
        Self {
            slot,
            subsection: None,
        }
    }

    pub fn subsection(slot: usize, subsection: usize) -> Self {
        Self {
            slot,
            subsection: Some(subsection),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subsection {
            Some(sub) => write!(f, "{}.{}", self.slot, sub + 1),
            None => write!(f, "{}", self.slot),
        }
    }
}
