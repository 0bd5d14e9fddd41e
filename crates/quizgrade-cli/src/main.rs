//! quizgrade CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizgrade", version, about = "Quiz scoring and mistake reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check answers for a quiz slot and save the mistake report
    Grade {
        /// Learner name, used in reports and the results file name
        #[arg(long)]
        user: String,

        /// Section name or file prefix (default: configured default section)
        #[arg(long)]
        section: Option<String>,

        /// 1-based slot (tab) number within the section
        #[arg(long)]
        slot: usize,

        /// JSON file with one submission array per quiz page
        #[arg(long)]
        answers: PathBuf,

        /// Directory the results file is written to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// List study materials even when every answer is correct
        #[arg(long)]
        show_materials: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List sections, slots, and which quizzes are authored
    Sections {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz JSON files
    Validate {
        /// Directory of quiz files (default: configured data directory)
        #[arg(long, conflicts_with = "quiz")]
        data_dir: Option<PathBuf>,

        /// A single quiz file
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example quiz data
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizgrade=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            user,
            section,
            slot,
            answers,
            output,
            format,
            show_materials,
            config,
        } => commands::grade::execute(commands::grade::GradeArgs {
            user,
            section,
            slot,
            answers,
            output,
            format,
            show_materials,
            config,
        }),
        Commands::Sections { config } => commands::sections::execute(config),
        Commands::Validate {
            data_dir,
            quiz,
            config,
        } => commands::validate::execute(data_dir, quiz, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
