//! The `examgen validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examgen_core::parser::{self, Severity};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        vec![parser::parse_bank(&bank_path)?]
    };

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for bank in &banks {
        println!("Bank: {} ({} questions)", bank.name, bank.questions.len());

        for issue in parser::validate_bank(bank) {
            let prefix = issue
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            match issue.severity {
                Severity::Error => {
                    println!("{prefix} ERROR: {}", issue.message);
                    total_errors += 1;
                }
                Severity::Warning => {
                    println!("{prefix} WARNING: {}", issue.message);
                    total_warnings += 1;
                }
            }
        }
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} error(s), {total_warnings} warning(s) found");
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
