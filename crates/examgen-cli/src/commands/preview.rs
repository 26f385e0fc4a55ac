//! The `examgen preview` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examgen_core::config::load_config_from;
use examgen_core::parser;
use examgen_core::{preview, BloomLevel, Difficulty, PreviewSummary, QuestionType};

pub fn execute(
    bank_path: PathBuf,
    distribution_path: Option<PathBuf>,
    template: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}': expected text or json"
    );

    let bank = parser::load_pool(&bank_path)?;
    let summary = preview(&bank.questions);

    let check = if distribution_path.is_some() || template.is_some() {
        let config = load_config_from(config_path.as_deref())?;
        super::load_distribution(distribution_path, template, &config)?
    } else {
        None
    };
    let shortfalls = check
        .as_ref()
        .map(|t| {
            summary
                .shortfalls_for(&t.distribution)
                .with_context(|| format!("cannot check distribution '{}'", t.name))
        })
        .transpose()?;

    if format == "json" {
        let json = serde_json::json!({
            "bank": { "id": bank.id, "name": bank.name },
            "summary": summary,
            "shortfalls": shortfalls,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!(
        "Bank: {} ({} questions, {} points)",
        bank.name, summary.total_questions, summary.total_points
    );
    println!("\n{}", composition_table(&summary));
    println!("\n{}", bloom_table(&summary));

    if let (Some(template), Some(shortfalls)) = (check, shortfalls) {
        if shortfalls.is_empty() {
            println!("\n'{}' can be fully satisfied.", template.name);
        } else {
            println!("\n'{}' cannot be fully satisfied. Missing:", template.name);
            for s in &shortfalls {
                println!("  {s}");
            }
        }
    }

    Ok(())
}

fn composition_table(summary: &PreviewSummary) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Type".to_string()];
    header.extend(Difficulty::ALL.iter().map(|d| d.to_string()));
    header.push("Total".to_string());
    table.set_header(header);

    for question_type in QuestionType::ALL {
        let mut row = vec![Cell::new(question_type)];
        row.extend(
            Difficulty::ALL
                .iter()
                .map(|d| Cell::new(summary.count(question_type, *d))),
        );
        row.push(Cell::new(summary.count_by_type(question_type)));
        table.add_row(row);
    }

    table
}

fn bloom_table(summary: &PreviewSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Bloom level", "Questions"]);

    for level in BloomLevel::ALL {
        let count = summary.by_bloom_level.get(&level).copied().unwrap_or(0);
        table.add_row(vec![Cell::new(level), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("(none)"),
        Cell::new(summary.without_bloom_level),
    ]);

    table
}
