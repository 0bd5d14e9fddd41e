//! Score aggregation over a quiz page.
//!
//! Free-text questions and unanswered slots count toward neither the
//! correct nor the total count.

use serde::{Deserialize, Serialize};

use crate::evaluator::grade;
use crate::model::{Question, Submission};

/// Aggregate score for one quiz page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Graded questions answered correctly.
    pub correct_count: usize,
    /// Graded questions that were answered.
    pub total_count: usize,
}

impl ScoreResult {
    /// Percentage of correct answers, 0 when nothing was graded.
    pub fn percentage(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.correct_count as f64 / self.total_count as f64 * 100.0
        }
    }

    /// Whether the page falls short of a perfect score.
    ///
    /// Exactly 100% is the only score without mistakes; an empty or fully
    /// free-text page scores 0% and so has mistakes.
    pub fn has_mistakes(&self) -> bool {
        self.total_count == 0 || self.correct_count < self.total_count
    }

    /// Statistics line used in reports: `correct/total (percentage%)`.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} ({:.1}%)",
            self.correct_count,
            self.total_count,
            self.percentage()
        )
    }
}

/// Score a page of questions against the aligned submission array.
pub fn score(questions: &[Question], submissions: &[Option<Submission>]) -> ScoreResult {
    if submissions.len() != questions.len() {
        tracing::warn!(
            "submission array has {} entries for {} questions",
            submissions.len(),
            questions.len()
        );
    }

    let mut result = ScoreResult::default();
    for (i, question) in questions.iter().enumerate() {
        let submission = submissions.get(i).and_then(Option::as_ref);
        if let Some(correct) = grade(question, submission) {
            result.total_count += 1;
            if correct {
                result.correct_count += 1;
            }
        }
    }
    result
}

/// When study links are offered alongside a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyLinkVisibility {
    /// Mistakes were made: show the links straight away.
    Shown,
    /// Perfect score: offer the links behind an explicit request.
    OnRequest,
}

impl StudyLinkVisibility {
    pub fn for_score(score: &ScoreResult) -> Self {
        if score.has_mistakes() {
            StudyLinkVisibility::Shown
        } else {
            StudyLinkVisibility::OnRequest
        }
    }
}
