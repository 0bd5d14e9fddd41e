//! The `quizgrade grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgrade_core::config::load_config_from;
use quizgrade_core::evaluator::Verdict;
use quizgrade_core::loader::{load_slot, page_name};
use quizgrade_core::model::Submission;
use quizgrade_core::session::{PageOutcome, SessionContext};
use quizgrade_core::statistics::StudyLinkVisibility;

pub struct GradeArgs {
    pub user: String,
    pub section: Option<String>,
    pub slot: usize,
    pub answers: PathBuf,
    pub output: Option<PathBuf>,
    pub format: String,
    pub show_materials: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    anyhow::ensure!(args.slot >= 1, "slot numbers start at 1");
    anyhow::ensure!(
        matches!(args.format.as_str(), "text" | "json"),
        "unknown format: {}",
        args.format
    );

    let config = load_config_from(args.config.as_deref())?;
    let mut session = SessionContext::new(&args.user)?;

    let section = match &args.section {
        Some(name) => config.section(name).with_context(|| {
            format!(
                "section '{name}' not found. Available: {:?}",
                config.sections.iter().map(|s| &s.name).collect::<Vec<_>>()
            )
        })?,
        None => config
            .default_section()
            .context("no sections configured; run `quizgrade init` or add [[sections]]")?,
    };

    tracing::debug!(
        "session {}: loading {} slot {} from {}",
        session.id(),
        section.prefix,
        args.slot,
        config.data_dir.display()
    );
    let content = load_slot(&config.data_dir, &section.prefix, args.slot);
    if !content.is_authored() {
        println!("Data for slot {} is not available yet.", args.slot);
        return Ok(());
    }

    let answers_text = std::fs::read_to_string(&args.answers)
        .with_context(|| format!("failed to read answers: {}", args.answers.display()))?;
    let answers: Vec<Vec<Option<Submission>>> = serde_json::from_str(&answers_text)
        .with_context(|| format!("failed to parse answers: {}", args.answers.display()))?;

    let pages = content.pages(args.slot);
    anyhow::ensure!(
        answers.len() <= pages.len(),
        "answers file has {} page(s) but slot {} has {}",
        answers.len(),
        args.slot,
        pages.len()
    );

    let mut outcomes = Vec::new();
    for (page, page_answers) in pages.iter().zip(answers) {
        let name = page_name(page);
        anyhow::ensure!(
            page_answers.len() <= page.quiz.questions.len(),
            "page '{name}' has {} question(s) but {} answer(s) were given",
            page.quiz.questions.len(),
            page_answers.len()
        );

        session.init_slot(page.key, page.quiz.questions.len());
        for (position, submission) in page_answers.into_iter().enumerate() {
            session
                .record_submission(page.key, page.quiz, position, submission)
                .with_context(|| format!("page '{name}', answer {}", position + 1))?;
        }

        outcomes.push(session.submit_page(&section.name, &name, page.key, page.quiz));
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        println!("Section: {}: {}", section.name, section.description);
        if let Some(tab) = section.slot_name(args.slot) {
            println!("Slot: {tab}");
        }
        for outcome in &outcomes {
            print_outcome(outcome, args.show_materials);
        }
    }

    if session.report_log().is_empty() {
        eprintln!("No mistakes, nothing saved.");
    } else {
        let dir = args.output.unwrap_or_else(|| config.results_dir.clone());
        let path = session.write_export(&dir)?;
        eprintln!("Results saved to: {}", path.display());
    }

    Ok(())
}

fn print_outcome(outcome: &PageOutcome, show_materials: bool) {
    println!("\n### {}", outcome.subsection_name);
    println!("Correct answers: {}", outcome.score.summary());
    println!();

    for v in &outcome.verdicts {
        let answer = v.user_answer_text.as_deref().unwrap_or("not answered");
        match v.verdict {
            Verdict::Correct => {
                println!("  Question {}: correct. Your answer: {answer}", v.question_number)
            }
            Verdict::Wrong => {
                println!("  Question {}: wrong. Your answer: {answer}", v.question_number);
                if let Some(key) = &v.correct_answer_text {
                    println!("    Correct answer: {key}");
                }
            }
            Verdict::Unanswered => println!("  Question {}: not answered", v.question_number),
            Verdict::Ungraded => {
                println!("  Question {}: not graded. Your answer: {answer}", v.question_number)
            }
        }
        if !v.explanation.is_empty() && v.verdict != Verdict::Ungraded {
            println!("    Explanation: {}", v.explanation);
        }
    }

    if outcome.study_links.is_empty() {
        return;
    }
    match outcome.link_visibility {
        StudyLinkVisibility::Shown => {
            println!("\nYou have mistakes. Recommended study materials:");
            print_links(&outcome.study_links);
        }
        StudyLinkVisibility::OnRequest if show_materials => {
            println!("\nFurther study materials:");
            print_links(&outcome.study_links);
        }
        StudyLinkVisibility::OnRequest => {
            println!(
                "\n{} study material(s) available, pass --show-materials to list them",
                outcome.study_links.len()
            );
        }
    }
}

fn print_links(links: &[String]) {
    for (i, link) in links.iter().enumerate() {
        println!("  Material {}: {link}", i + 1);
    }
}
