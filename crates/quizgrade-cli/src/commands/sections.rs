//! The `quizgrade sections` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizgrade_core::config::load_config_from;
use quizgrade_core::loader::{load_slot, SlotContent};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    if config.sections.is_empty() {
        println!("No sections configured.");
        return Ok(());
    }

    for section in &config.sections {
        println!("{}: {}", section.name, section.description);

        let mut table = Table::new();
        table.set_header(vec!["Slot", "Name", "Quiz data"]);

        for (i, slot_name) in section.slot_names().iter().enumerate() {
            let slot = i + 1;
            let status = match load_slot(&config.data_dir, &section.prefix, slot) {
                SlotContent::Standalone(quiz) => {
                    format!("{} ({} questions)", quiz.title, quiz.questions.len())
                }
                SlotContent::Subsections(quizzes) => {
                    let titles: Vec<&str> = quizzes.iter().map(|q| q.title.as_str()).collect();
                    format!("{} subsections: {}", quizzes.len(), titles.join(", "))
                }
                SlotContent::NotAuthored => "not yet available".to_string(),
            };
            table.add_row(vec![
                Cell::new(slot),
                Cell::new(slot_name),
                Cell::new(status),
            ]);
        }

        println!("{table}\n");
    }

    Ok(())
}
