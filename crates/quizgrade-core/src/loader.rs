//! JSON quiz loader.
//!
//! Loads quizzes from JSON files, resolves a slot to either a standalone quiz
//! or its ordered subsections, and validates quiz data.
//!
//! File naming: `<prefix>_<slot>.json` holds a standalone quiz;
//! `<prefix>_<slot>.<suffix>.json` holds one subsection of the slot.
//! Subsections are ordered by file name.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::QuizError;
use crate::model::{Question, QuestionKind, Quiz, SlotKey};

/// Intermediate JSON structure for quiz files.
#[derive(Debug, Deserialize)]
struct JsonQuizFile {
    #[serde(default)]
    quiz_title: String,
    questions: Vec<JsonQuestion>,
    #[serde(default)]
    pdf_links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonQuestion {
    question_id: u32,
    question_text: String,
    question_type: JsonQuestionType,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<usize>,
    #[serde(default)]
    correct_answers: Option<Vec<usize>>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum JsonQuestionType {
    SingleChoice,
    #[serde(alias = "multi_choice")]
    MultipleChoice,
    FreeText,
}

impl JsonQuestion {
    fn into_question(self) -> Result<Question> {
        let kind = match self.question_type {
            JsonQuestionType::SingleChoice => {
                let correct_answer = self.correct_answer.with_context(|| {
                    format!(
                        "question {}: single_choice requires correct_answer",
                        self.question_id
                    )
                })?;
                QuestionKind::SingleChoice { correct_answer }
            }
            JsonQuestionType::MultipleChoice => QuestionKind::MultipleChoice {
                correct_answers: self
                    .correct_answers
                    .unwrap_or_default()
                    .into_iter()
                    .collect(),
            },
            JsonQuestionType::FreeText => QuestionKind::FreeText,
        };

        Ok(Question {
            id: self.question_id,
            text: self.question_text,
            kind,
            options: self.options,
            explanation: self.explanation,
        })
    }
}

/// Parse a quiz file, failing on unreadable, malformed, or inconsistent data.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a JSON string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: JsonQuizFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(JsonQuestion::into_question)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid question in {}", source_path.display()))?;

    let quiz = Quiz {
        title: parsed.quiz_title,
        questions,
        study_links: parsed.pdf_links,
    };

    check_indices(&quiz)
        .with_context(|| format!("inconsistent answer key in {}", source_path.display()))?;

    Ok(quiz)
}

/// Check that every correct-answer index points at an existing option.
pub fn check_indices(quiz: &Quiz) -> Result<(), QuizError> {
    for question in &quiz.questions {
        let key: Vec<usize> = match &question.kind {
            QuestionKind::SingleChoice { correct_answer } => vec![*correct_answer],
            QuestionKind::MultipleChoice { correct_answers } => {
                correct_answers.iter().copied().collect()
            }
            QuestionKind::FreeText => Vec::new(),
        };
        if let Some(&index) = key.iter().find(|&&i| i >= question.options.len()) {
            return Err(QuizError::InconsistentIndex {
                question_id: question.id,
                index,
                option_count: question.options.len(),
            });
        }
    }
    Ok(())
}

/// Load a quiz file, mapping a missing or unusable file to `None`.
pub fn load(path: &Path) -> Option<Quiz> {
    if !path.is_file() {
        tracing::debug!("no quiz file at {}", path.display());
        return None;
    }

    match parse_quiz(path) {
        Ok(quiz) => {
            tracing::debug!(
                "loaded '{}' ({} questions) from {}",
                quiz.title,
                quiz.questions.len(),
                path.display()
            );
            Some(quiz)
        }
        Err(e) => {
            let authoring_defect = e
                .chain()
                .filter_map(|cause| cause.downcast_ref::<QuizError>())
                .any(QuizError::is_authoring_defect);
            if authoring_defect {
                tracing::error!("refusing {}: {e:#}", path.display());
            } else {
                tracing::warn!("skipping {}: {e:#}", path.display());
            }
            None
        }
    }
}

/// File name of the standalone quiz for a slot.
pub fn main_file_name(section_prefix: &str, slot: usize) -> String {
    format!("{section_prefix}_{slot}.json")
}

/// Whether `file_name` names a subsection file of the slot.
pub fn is_subsection_file(file_name: &str, section_prefix: &str, slot: usize) -> bool {
    file_name
        .strip_prefix(&format!("{section_prefix}_{slot}."))
        .and_then(|rest| rest.strip_suffix(".json"))
        .is_some()
}

/// Subsection files of a slot, sorted by file name.
pub fn subsection_files(dir: &Path, section_prefix: &str, slot: usize) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot scan {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            is_subsection_file(&name, section_prefix, slot).then(|| (name, entry.path()))
        })
        .collect();

    files.sort_by(|a, b| a.0.cmp(&b.0));
    files.into_iter().map(|(_, path)| path).collect()
}

/// Load a slot: its standalone quiz, or failing that, its subsections.
///
/// Returns `(Some(quiz), None)` when the standalone file loads,
/// `(None, Some(subsections))` when at least one subsection loads, and
/// `(None, None)` when the slot is not authored yet.
pub fn load_with_subsections(
    dir: &Path,
    section_prefix: &str,
    slot: usize,
) -> (Option<Quiz>, Option<Vec<Quiz>>) {
    let main_file = dir.join(main_file_name(section_prefix, slot));
    if let Some(quiz) = load(&main_file) {
        return (Some(quiz), None);
    }

    let subsections: Vec<Quiz> = subsection_files(dir, section_prefix, slot)
        .iter()
        .filter_map(|path| load(path))
        .collect();

    if subsections.is_empty() {
        (None, None)
    } else {
        (None, Some(subsections))
    }
}

/// What a slot holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Standalone(Quiz),
    Subsections(Vec<Quiz>),
    NotAuthored,
}

/// A quiz page inside a slot.
#[derive(Debug, Clone, Copy)]
pub struct QuizPage<'a> {
    pub key: SlotKey,
    /// Quiz title, or a positional name for an untitled subsection.
    pub name: &'a str,
    pub quiz: &'a Quiz,
}

impl SlotContent {
    /// Every page of the slot in display order.
    pub fn pages(&self, slot: usize) -> Vec<QuizPage<'_>> {
        match self {
            SlotContent::Standalone(quiz) => vec![QuizPage {
                key: SlotKey::standalone(slot),
                name: &quiz.title,
                quiz,
            }],
            SlotContent::Subsections(quizzes) => quizzes
                .iter()
                .enumerate()
                .map(|(i, quiz)| QuizPage {
                    key: SlotKey::subsection(slot, i),
                    name: &quiz.title,
                    quiz,
                })
                .collect(),
            SlotContent::NotAuthored => Vec::new(),
        }
    }

    pub fn is_authored(&self) -> bool {
        !matches!(self, SlotContent::NotAuthored)
    }
}

/// Display name of a subsection page; blank titles fall back to its position.
pub fn page_name(page: &QuizPage<'_>) -> String {
    match page.key.subsection {
        Some(i) if page.name.trim().is_empty() => format!("Subsection {}", i + 1),
        _ => page.name.to_string(),
    }
}

/// Load a slot as a [`SlotContent`].
pub fn load_slot(dir: &Path, section_prefix: &str, slot: usize) -> SlotContent {
    match load_with_subsections(dir, section_prefix, slot) {
        (Some(quiz), _) => SlotContent::Standalone(quiz),
        (None, Some(subsections)) => SlotContent::Subsections(subsections),
        (None, None) => SlotContent::NotAuthored,
    }
}

/// Strictly parse every `.json` file in a directory, sorted by path.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<(PathBuf, Result<Quiz>)>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let parsed = parse_quiz(&path);
            (path, parsed)
        })
        .collect())
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for common authoring issues.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check the quiz header
    if quiz.title.trim().is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "quiz_title is empty".into(),
        });
    }

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "quiz has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &quiz.questions {
        if question.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: "question_text is empty".into(),
            });
        }

        // Choice questions need something to choose between
        if question.is_graded() && question.options.len() < 2 {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: format!(
                    "{} question has {} option(s)",
                    question.kind,
                    question.options.len()
                ),
            });
        }

        // Check for duplicate options
        let distinct: BTreeSet<&str> = question.options.iter().map(String::as_str).collect();
        if distinct.len() != question.options.len() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: "options contain duplicates".into(),
            });
        }

        // An empty key can never be matched by a non-empty selection
        if let QuestionKind::MultipleChoice { correct_answers } = &question.kind {
            if correct_answers.is_empty() {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id),
                    message: "multiple_choice question has no correct_answers".into(),
                });
            }
        }
    }

    // Study links should be web URLs
    for link in &quiz.study_links {
        if !(link.starts_with("http://") || link.starts_with("https://")) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("study link is not an http(s) URL: {link}"),
            });
        }
    }

    warnings
}
