//! End-to-end session tests: quiz files on disk, through the loader and a
//! session, to the exported results file.

use std::path::Path;

use chrono::NaiveDate;
use quizgrade_core::loader::{load_slot, load_with_subsections, page_name, SlotContent};
use quizgrade_core::model::{SlotKey, Submission};
use quizgrade_core::report::{build_report_at, SUCCESS_MARKER};
use quizgrade_core::session::SessionContext;
use quizgrade_core::statistics::StudyLinkVisibility;

const LETTERS_QUIZ: &str = r#"{
  "quiz_title": "Letters",
  "questions": [
    {"question_id": 1, "question_text": "Second letter of AB?", "question_type": "single_choice", "options": ["A", "B"], "correct_answer": 1, "explanation": ""},
    {"question_id": 2, "question_text": "First letter of XY?", "question_type": "single_choice", "options": ["X", "Y"], "correct_answer": 0, "explanation": ""}
  ],
  "pdf_links": ["https://example.org/alphabet.pdf"]
}"#;

fn subsection_quiz(title: &str) -> String {
    format!(
        r#"{{"quiz_title": "{title}", "questions": [
            {{"question_id": 1, "question_text": "Pick all even", "question_type": "multiple_choice", "options": ["0", "1", "2"], "correct_answers": [0, 2]}},
            {{"question_id": 2, "question_text": "Describe parity", "question_type": "free_text"}}
        ]}}"#
    )
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn standalone_slot_with_one_mistake() {
    let data = tempfile::tempdir().unwrap();
    write(data.path(), "sec_1.json", LETTERS_QUIZ);

    let content = load_slot(data.path(), "sec", 1);
    let pages = content.pages(1);
    assert_eq!(pages.len(), 1);
    let page = pages[0];

    let mut session = SessionContext::new("Grace").unwrap();
    session.init_slot(page.key, page.quiz.questions.len());
    for (i, answer) in [1, 1].into_iter().enumerate() {
        session
            .record_submission(page.key, page.quiz, i, Some(Submission::SingleChoice(Some(answer))))
            .unwrap();
    }

    let outcome = session.submit_page("Alphabet", &page_name(&page), page.key, page.quiz);
    assert_eq!(
        (outcome.score.correct_count, outcome.score.total_count),
        (1, 2)
    );
    assert!((outcome.score.percentage() - 50.0).abs() < f64::EPSILON);
    assert_eq!(outcome.link_visibility, StudyLinkVisibility::Shown);

    let block = outcome.report.expect("imperfect page records a report");
    assert_eq!(block.entries.len(), 1);
    assert_eq!(block.entries[0].question_number, 2);
    assert_eq!(block.entries[0].user_answer_text, "Y");

    let out = tempfile::tempdir().unwrap();
    let path = session.write_export(out.path()).unwrap();
    let exported = std::fs::read_to_string(path).unwrap();
    assert!(exported.contains("Subsection: Letters"));
    assert!(exported.contains("Correct answers: 1/2 (50.0%)"));
    assert!(exported.contains("1. https://example.org/alphabet.pdf"));
}

#[test]
fn subsections_are_graded_independently() {
    let data = tempfile::tempdir().unwrap();
    write(data.path(), "sec_2.2.json", &subsection_quiz("Advanced"));
    write(data.path(), "sec_2.1.json", &subsection_quiz("Intro"));

    let (main, subsections) = load_with_subsections(data.path(), "sec", 2);
    assert!(main.is_none());
    assert_eq!(subsections.as_ref().map(Vec::len), Some(2));

    let content = SlotContent::Subsections(subsections.unwrap_or_default());
    let mut session = SessionContext::new("Grace").unwrap();

    let answers = [vec![2, 0], vec![0]];
    for (page, picked) in content.pages(2).into_iter().zip(answers) {
        session.init_slot(page.key, page.quiz.questions.len());
        session
            .record_submission(page.key, page.quiz, 0, Some(Submission::MultipleChoice(picked)))
            .unwrap();
        session
            .record_submission(page.key, page.quiz, 1, Some(Submission::FreeText("even numbers".into())))
            .unwrap();
        session.submit_page("Numbers", &page_name(&page), page.key, page.quiz);
    }

    assert!(session.results_shown(SlotKey::subsection(2, 0)));
    assert!(session.results_shown(SlotKey::subsection(2, 1)));

    // Only the second subsection had a mistake
    assert_eq!(session.blocks().len(), 1);
    let block = &session.blocks()[0];
    assert_eq!(block.subsection_name, "Advanced");
    assert_eq!(block.score.summary(), "0/1 (0.0%)");
    assert_eq!(block.entries[0].user_answer_text, "0");
}

#[test]
fn unauthored_slot_yields_no_pages() {
    let data = tempfile::tempdir().unwrap();
    write(data.path(), "sec_1.json", LETTERS_QUIZ);

    assert_eq!(load_with_subsections(data.path(), "sec", 9), (None, None));
    let content = load_slot(data.path(), "sec", 9);
    assert!(!content.is_authored());
    assert!(content.pages(9).is_empty());
}

#[test]
fn perfect_block_round_trip() {
    let data = tempfile::tempdir().unwrap();
    write(data.path(), "sec_1.json", LETTERS_QUIZ);
    let SlotContent::Standalone(quiz) = load_slot(data.path(), "sec", 1) else {
        panic!("expected a standalone quiz");
    };

    let submissions = vec![
        Some(Submission::SingleChoice(Some(1))),
        Some(Submission::SingleChoice(Some(0))),
    ];
    let timestamp = NaiveDate::from_ymd_opt(2026, 10, 14)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let block = build_report_at(
        "Grace",
        "Alphabet",
        &quiz.title,
        &quiz.questions,
        &submissions,
        &quiz.study_links,
        timestamp,
    );

    assert!(block.entries.is_empty());
    let text = block.to_text();
    assert!(text.contains(SUCCESS_MARKER));
    assert!(text.contains("Date: 2026-10-14 09:30:00"));
    assert!(text.contains("Study materials:"));

    let mut session = SessionContext::new("Grace").unwrap();
    session.append_report(block);
    assert_eq!(session.report_log(), text);
}
