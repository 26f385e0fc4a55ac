//! The `examgen generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examgen_core::config::load_config_from;
use examgen_core::parser;
use examgen_core::report::GenerationReport;
use examgen_core::selection::SelectionResult;
use examgen_core::{generate, TieBreak};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    bank_path: PathBuf,
    distribution_path: Option<PathBuf>,
    template: Option<String>,
    randomize: bool,
    seed: Option<String>,
    tie_break: Option<String>,
    format: String,
    save: bool,
    output: Option<PathBuf>,
    fail_on_shortfall: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}': expected text or json"
    );

    let config = load_config_from(config_path.as_deref())?;

    let template = super::load_distribution(distribution_path, template, &config)?
        .context("no distribution given: pass --distribution <file> or --template <name>")?;

    let bank = parser::load_pool(&bank_path)?;

    let mut options = config.generate_options();
    if randomize {
        options.randomize = true;
    }
    if let Some(seed) = seed {
        options.randomize = true;
        options.seed = Some(seed);
    }
    if let Some(tie_break) = tie_break {
        options.tie_break = tie_break
            .parse::<TieBreak>()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }
    if options.randomize && options.tie_break == TieBreak::LeastUsed {
        eprintln!("Warning: --tie-break least-used has no effect when randomizing.");
    }

    tracing::debug!(?options, template = %template.name, "generation options");

    let result = generate(&bank.questions, &template.distribution, &options)
        .with_context(|| format!("cannot generate from {}", bank_path.display()))?;

    let met = result.metadata.distribution_met;
    let report = GenerationReport::new(
        &bank,
        Some(template.name.clone()),
        template.distribution.clone(),
        &options,
        result,
    );

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }

    if save {
        let dir = output.unwrap_or_else(|| config.output_dir.clone());
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("exam-{timestamp}-{}.json", report.id.simple()));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    if fail_on_shortfall && !met {
        std::process::exit(1);
    }

    Ok(())
}

fn print_text(report: &GenerationReport) {
    let result = &report.result;
    println!(
        "Exam from {} using {} ({} of {} questions, {} points)",
        report.bank.name,
        report.template.as_deref().unwrap_or("ad-hoc distribution"),
        result.metadata.selected_total,
        result.metadata.requested_total,
        result.metadata.total_points,
    );
    if report.randomize && !report.reproducible {
        println!("Unseeded shuffle: this selection cannot be reproduced.");
    }

    if !result.selected_questions.is_empty() {
        println!("\n{}", selection_table(result));
    }

    if result.metadata.distribution_met {
        println!("\nDistribution met.");
    } else {
        println!("\nDistribution NOT met. Missing:");
        for category in &result.metadata.missing_categories {
            println!("  {category}");
        }
    }
}

fn selection_table(result: &SelectionResult) -> comfy_table::Table {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "ID", "Type", "Difficulty", "Bloom", "Points"]);

    for (position, q) in result.selected_questions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&q.id),
            Cell::new(q.question_type),
            Cell::new(q.difficulty),
            Cell::new(q.bloom_level.map_or_else(|| "-".to_string(), |b| b.to_string())),
            Cell::new(q.points),
        ]);
    }

    table
}
