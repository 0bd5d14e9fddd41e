//! Per-user session state.
//!
//! A [`SessionContext`] owns everything that lives for one learner's session:
//! the submission arrays of each quiz page, which pages have their results
//! shown, and the append-only report log offered for download. Nothing here
//! is persisted; dropping the context discards the session.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::error::QuizError;
use crate::evaluator::{verdicts, QuestionVerdict};
use crate::model::{Question, Quiz, SlotKey, Submission};
use crate::report::{build_report, ReportBlock};
use crate::statistics::{score, ScoreResult, StudyLinkVisibility};

/// Result of checking the answers of one quiz page.
#[derive(Debug, Clone, Serialize)]
pub struct PageOutcome {
    pub key: SlotKey,
    pub subsection_name: String,
    pub score: ScoreResult,
    pub verdicts: Vec<QuestionVerdict>,
    pub study_links: Vec<String>,
    pub link_visibility: StudyLinkVisibility,
    /// The block appended to the report log, when the page had mistakes.
    pub report: Option<ReportBlock>,
}

/// One learner's session.
#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    user_name: String,
    report_log: String,
    blocks: Vec<ReportBlock>,
    submissions: HashMap<SlotKey, Vec<Option<Submission>>>,
    shown_results: HashSet<SlotKey>,
}

impl SessionContext {
    /// Start a session for a registered user. The name is trimmed and must
    /// not be empty.
    pub fn new(user_name: &str) -> Result<Self, QuizError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(QuizError::EmptyUserName);
        }
        let session = Self {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            report_log: String::new(),
            blocks: Vec::new(),
            submissions: HashMap::new(),
            shown_results: HashSet::new(),
        };
        tracing::debug!("session {} started for {}", session.id, session.user_name);
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Create the submission array of a page, all unanswered. An existing
    /// array is kept as is.
    pub fn init_slot(&mut self, key: SlotKey, question_count: usize) {
        self.submissions
            .entry(key)
            .or_insert_with(|| vec![None; question_count]);
    }

    /// The submission array of a page.
    pub fn submissions(&self, key: SlotKey) -> Option<&[Option<Submission>]> {
        self.submissions.get(&key).map(Vec::as_slice)
    }

    /// Store the answer to the question at `position` of a page.
    pub fn record_submission(
        &mut self,
        key: SlotKey,
        quiz: &Quiz,
        position: usize,
        submission: Option<Submission>,
    ) -> Result<(), QuizError> {
        let question = quiz
            .questions
            .get(position)
            .ok_or(QuizError::QuestionOutOfRange {
                position,
                question_count: quiz.questions.len(),
            })?;
        if let Some(submission) = &submission {
            check_submission(question, submission)?;
        }

        let slot = self
            .submissions
            .get_mut(&key)
            .ok_or(QuizError::SlotNotInitialized(key))?;
        if slot.len() < quiz.questions.len() {
            slot.resize(quiz.questions.len(), None);
        }
        slot[position] = submission;
        Ok(())
    }

    /// Mark a page's results as shown.
    pub fn check_answers(&mut self, key: SlotKey) {
        self.shown_results.insert(key);
    }

    /// Hide a page's results again.
    pub fn hide_results(&mut self, key: SlotKey) {
        self.shown_results.remove(&key);
    }

    pub fn results_shown(&self, key: SlotKey) -> bool {
        self.shown_results.contains(&key)
    }

    /// Check the answers of a page.
    ///
    /// Computes the score and the detailed verdicts, and when the page falls
    /// short of 100% appends a report block carrying the quiz's study links.
    pub fn submit_page(
        &mut self,
        section_name: &str,
        subsection_name: &str,
        key: SlotKey,
        quiz: &Quiz,
    ) -> PageOutcome {
        self.init_slot(key, quiz.questions.len());
        self.check_answers(key);

        let submissions = self.submissions.get(&key).cloned().unwrap_or_default();
        let page_score = score(&quiz.questions, &submissions);
        let link_visibility = StudyLinkVisibility::for_score(&page_score);

        let report = page_score.has_mistakes().then(|| {
            self.record_report(
                section_name,
                subsection_name,
                &quiz.questions,
                &submissions,
                &quiz.study_links,
            )
            .clone()
        });

        PageOutcome {
            key,
            subsection_name: subsection_name.to_string(),
            score: page_score,
            verdicts: verdicts(&quiz.questions, &submissions),
            study_links: quiz.study_links.clone(),
            link_visibility,
            report,
        }
    }

    /// Build a report block for this session's user and append it.
    pub fn record_report(
        &mut self,
        section_name: &str,
        subsection_name: &str,
        questions: &[Question],
        submissions: &[Option<Submission>],
        study_links: &[String],
    ) -> &ReportBlock {
        let block = build_report(
            &self.user_name,
            section_name,
            subsection_name,
            questions,
            submissions,
            study_links,
        );
        self.append_report(block)
    }

    /// Append a block to the report log. Appended blocks cannot be removed
    /// or edited.
    pub fn append_report(&mut self, block: ReportBlock) -> &ReportBlock {
        self.report_log.push_str(&block.to_text());
        tracing::info!(
            "saved results for {} / {} ({}, {} mistake(s))",
            block.section_name,
            block.subsection_name,
            block.score.summary(),
            block.entries.len()
        );
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// The concatenated text of every block appended so far.
    pub fn report_log(&self) -> &str {
        &self.report_log
    }

    pub fn blocks(&self) -> &[ReportBlock] {
        &self.blocks
    }

    /// File name the report log is offered under. Path separators in the
    /// user name become `_`, so the name is always a single component.
    pub fn export_file_name(&self) -> String {
        let stem: String = self
            .user_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{stem}_results.txt")
    }

    /// Write the report log into `dir`, returning the file path.
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(self.export_file_name());
        std::fs::write(&path, &self.report_log)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
        Ok(path)
    }
}

fn check_submission(question: &Question, submission: &Submission) -> Result<(), QuizError> {
    if !submission.matches_kind(question) {
        return Err(QuizError::KindMismatch {
            question_id: question.id,
            expected: question.kind.name(),
            actual: submission.kind_name(),
        });
    }
    if let Some(index) = submission
        .selected_indices()
        .into_iter()
        .find(|&i| i >= question.options.len())
    {
        return Err(QuizError::InvalidSelection {
            question_id: question.id,
            index,
            option_count: question.options.len(),
        });
    }
    Ok(())
}
