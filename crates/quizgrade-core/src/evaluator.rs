//! Per-question answer evaluation and answer rendering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionKind, Submission};

/// Rendered text for a choice answer with nothing selected.
pub const NOT_SELECTED: &str = "not selected";

/// Decide whether `submission` answers `question` correctly.
///
/// Free-text questions are never correct here: they are excluded from
/// automatic grading altogether (see [`grade`]).
pub fn is_correct(question: &Question, submission: &Submission) -> bool {
    match (&question.kind, submission) {
        (QuestionKind::SingleChoice { correct_answer }, Submission::SingleChoice(choice)) => {
            *choice == Some(*correct_answer)
        }
        (QuestionKind::MultipleChoice { correct_answers }, Submission::MultipleChoice(choices)) => {
            choices.iter().copied().collect::<BTreeSet<_>>() == *correct_answers
        }
        // Free text, or a submission of the wrong kind
        _ => false,
    }
}

/// Grade one question/submission pair.
///
/// Returns `None` when the pair does not take part in scoring: the question
/// is free text or the submission is absent.
pub fn grade(question: &Question, submission: Option<&Submission>) -> Option<bool> {
    if !question.is_graded() {
        return None;
    }
    submission.map(|s| is_correct(question, s))
}

/// Render the learner's answer as option text.
pub fn render_answer_text(question: &Question, submission: &Submission) -> String {
    match submission {
        Submission::SingleChoice(Some(index)) => option_text(question, *index),
        Submission::SingleChoice(None) => NOT_SELECTED.to_string(),
        Submission::MultipleChoice(choices) => {
            let mut seen = BTreeSet::new();
            let texts: Vec<String> = choices
                .iter()
                .filter(|i| seen.insert(**i))
                .map(|i| option_text(question, *i))
                .collect();
            if texts.is_empty() {
                NOT_SELECTED.to_string()
            } else {
                texts.join(", ")
            }
        }
        Submission::FreeText(text) if text.trim().is_empty() => NOT_SELECTED.to_string(),
        Submission::FreeText(text) => text.clone(),
    }
}

/// Render the answer key of a choice question as option text.
pub fn render_correct_answer_text(question: &Question) -> Option<String> {
    match &question.kind {
        QuestionKind::SingleChoice { correct_answer } => {
            Some(option_text(question, *correct_answer))
        }
        QuestionKind::MultipleChoice { correct_answers } => Some(
            correct_answers
                .iter()
                .map(|i| option_text(question, *i))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        QuestionKind::FreeText => None,
    }
}

// Indices are validated when quizzes are parsed and submissions recorded.
fn option_text(question: &Question, index: usize) -> String {
    match question.option(index) {
        Some(text) => text.to_string(),
        None => {
            tracing::error!(
                "question {}: option index {index} out of range ({} options)",
                question.id,
                question.options.len()
            );
            format!("#{index}")
        }
    }
}

/// Outcome of one question after the answers are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Wrong,
    Unanswered,
    Ungraded,
}

/// Detailed per-question result, as listed under the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionVerdict {
    /// 1-based position in the quiz.
    pub question_number: usize,
    pub question_text: String,
    pub verdict: Verdict,
    /// Rendered learner answer, `None` when unanswered.
    pub user_answer_text: Option<String>,
    /// Rendered answer key, `None` for free text.
    pub correct_answer_text: Option<String>,
    pub explanation: String,
}

/// Build the detailed result listing for a quiz page.
///
/// Positions past the end of `submissions` are treated as unanswered.
pub fn verdicts(questions: &[Question], submissions: &[Option<Submission>]) -> Vec<QuestionVerdict> {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let submission = submissions.get(i).and_then(Option::as_ref);
            let verdict = match grade(question, submission) {
                Some(true) => Verdict::Correct,
                Some(false) => Verdict::Wrong,
                None if !question.is_graded() => Verdict::Ungraded,
                None => Verdict::Unanswered,
            };
            QuestionVerdict {
                question_number: i + 1,
                question_text: question.text.clone(),
                verdict,
                user_answer_text: submission.map(|s| render_answer_text(question, s)),
                correct_answer_text: render_correct_answer_text(question),
                explanation: question.explanation.clone(),
            }
        })
        .collect()
}
