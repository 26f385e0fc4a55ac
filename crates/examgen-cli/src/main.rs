//! examgen CLI: build exams from a question bank.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examgen",
    version,
    about = "Distribution-driven exam generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select questions for an exam
    Generate {
        /// Path to a question bank file or directory of banks
        #[arg(long)]
        bank: PathBuf,

        /// Distribution file (.toml or .json)
        #[arg(long, conflicts_with = "template")]
        distribution: Option<PathBuf>,

        /// Named distribution template from the config file
        #[arg(long)]
        template: Option<String>,

        /// Shuffle candidates within each category
        #[arg(long)]
        randomize: bool,

        /// Seed for a reproducible shuffle (implies --randomize)
        #[arg(long)]
        seed: Option<String>,

        /// Ordering when not randomizing: pool-order, least-used
        #[arg(long)]
        tie_break: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Save a JSON report (to --output, or the configured output_dir)
        #[arg(long)]
        save: bool,

        /// Output directory for saved reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit code 1 if the distribution could not be met
        #[arg(long)]
        fail_on_shortfall: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show what a question bank contains
    Preview {
        /// Path to a question bank file or directory of banks
        #[arg(long)]
        bank: PathBuf,

        /// Check a distribution file against the bank without selecting
        #[arg(long, conflicts_with = "template")]
        distribution: Option<PathBuf>,

        /// Check a named template against the bank without selecting
        #[arg(long)]
        template: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank files
    Validate {
        /// Path to a question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examgen=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            bank,
            distribution,
            template,
            randomize,
            seed,
            tie_break,
            format,
            save,
            output,
            fail_on_shortfall,
            config,
        } => commands::generate::execute(
            bank,
            distribution,
            template,
            randomize,
            seed,
            tie_break,
            format,
            save,
            output,
            fail_on_shortfall,
            config,
        ),
        Commands::Preview {
            bank,
            distribution,
            template,
            format,
            config,
        } => commands::preview::execute(bank, distribution, template, format, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
