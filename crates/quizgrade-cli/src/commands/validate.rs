//! The `quizgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgrade_core::config::load_config_from;
use quizgrade_core::loader::{load_quiz_directory, parse_quiz, validate_quiz};

pub fn execute(
    data_dir: Option<PathBuf>,
    quiz_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let results = match quiz_path {
        Some(path) => {
            let parsed = parse_quiz(&path);
            vec![(path, parsed)]
        }
        None => {
            let dir = match data_dir {
                Some(dir) => dir,
                None => load_config_from(config_path.as_deref())?.data_dir,
            };
            load_quiz_directory(&dir)?
        }
    };

    let mut total_warnings = 0;
    let mut total_errors = 0;

    for (path, parsed) in &results {
        match parsed {
            Ok(quiz) => {
                println!(
                    "{}: {} ({} questions)",
                    path.display(),
                    quiz.title,
                    quiz.questions.len()
                );
                let warnings = validate_quiz(quiz);
                for w in &warnings {
                    let prefix = w
                        .question_id
                        .map(|id| format!("  [question {id}]"))
                        .unwrap_or_else(|| "  ".to_string());
                    println!("{prefix} WARNING: {}", w.message);
                }
                total_warnings += warnings.len();
            }
            Err(e) => {
                println!("{}: ERROR: {e:#}", path.display());
                total_errors += 1;
            }
        }
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} quiz file(s) failed validation");
    }

    if total_warnings == 0 {
        println!("All quiz files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
