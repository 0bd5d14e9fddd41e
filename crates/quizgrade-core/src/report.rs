//! Mistake report blocks.
//!
//! A [`ReportBlock`] describes one checked quiz page: who took it, when,
//! the score, every wrong answer, and the study links. Blocks are appended
//! to a session's report log by [`crate::session::SessionContext`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::evaluator::{is_correct, render_answer_text};
use crate::model::{Question, Submission};
use crate::statistics::{score, ScoreResult};

/// Marker written instead of the mistakes list when every answer is right.
pub const SUCCESS_MARKER: &str = "✅ All answers are correct!";

/// Timestamp format used in report headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR_WIDTH: usize = 60;

/// One wrong answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 1-based position in the quiz.
    pub question_number: usize,
    pub question_text: String,
    pub user_answer_text: String,
}

/// A full report for one (user, section, subsection, timestamp) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBlock {
    pub user_name: String,
    pub section_name: String,
    pub subsection_name: String,
    /// Local wall-clock time the block was built.
    pub timestamp: NaiveDateTime,
    pub score: ScoreResult,
    /// Wrong answers in question order.
    pub entries: Vec<ReportEntry>,
    pub study_links: Vec<String>,
}

impl ReportBlock {
    /// Whether the block lists no mistakes.
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the block to the plain-text form used in the report log.
    pub fn to_text(&self) -> String {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let mut text = String::new();

        text.push_str(&format!("\n{separator}\n"));
        text.push_str(&format!("Quiz results - {}\n", self.user_name));
        text.push_str(&format!(
            "Date: {}\n",
            self.timestamp.format(TIMESTAMP_FORMAT)
        ));
        text.push_str(&format!("Section: {}\n", self.section_name));
        text.push_str(&format!("Subsection: {}\n", self.subsection_name));
        text.push_str("\nStatistics:\n");
        text.push_str(&format!("Correct answers: {}\n\n", self.score.summary()));

        if self.entries.is_empty() {
            text.push_str(SUCCESS_MARKER);
            text.push('\n');
        } else {
            text.push_str("Wrong answers:\n");
        }

        for entry in &self.entries {
            text.push_str(&format!(
                "\nQuestion {}: {}\nYour wrong answer: {}\n",
                entry.question_number, entry.question_text, entry.user_answer_text
            ));
        }

        if !self.study_links.is_empty() {
            text.push_str("\nStudy materials:\n");
            for (i, link) in self.study_links.iter().enumerate() {
                text.push_str(&format!("{}. {link}\n", i + 1));
            }
        }

        text.push_str(&format!("\n{separator}\n"));
        text
    }
}

impl fmt::Display for ReportBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Collect the wrong answers of a page, skipping unanswered and ungraded
/// questions.
pub fn wrong_answers(questions: &[Question], submissions: &[Option<Submission>]) -> Vec<ReportEntry> {
    questions
        .iter()
        .zip(submissions)
        .enumerate()
        .filter_map(|(i, (question, submission))| {
            let submission = submission.as_ref()?;
            if !question.is_graded() || is_correct(question, submission) {
                return None;
            }
            Some(ReportEntry {
                question_number: i + 1,
                question_text: question.text.clone(),
                user_answer_text: render_answer_text(question, submission),
            })
        })
        .collect()
}

/// Build a report block stamped with the current local time.
pub fn build_report(
    user_name: &str,
    section_name: &str,
    subsection_name: &str,
    questions: &[Question],
    submissions: &[Option<Submission>],
    study_links: &[String],
) -> ReportBlock {
    build_report_at(
        user_name,
        section_name,
        subsection_name,
        questions,
        submissions,
        study_links,
        chrono::Local::now().naive_local(),
    )
}

/// Build a report block with an explicit timestamp.
pub fn build_report_at(
    user_name: &str,
    section_name: &str,
    subsection_name: &str,
    questions: &[Question],
    submissions: &[Option<Submission>],
    study_links: &[String],
    timestamp: NaiveDateTime,
) -> ReportBlock {
    ReportBlock {
        user_name: user_name.to_string(),
        section_name: section_name.to_string(),
        subsection_name: subsection_name.to_string(),
        timestamp,
        score: score(questions, submissions),
        entries: wrong_answers(questions, submissions),
        study_links: study_links.to_vec(),
    }
}
