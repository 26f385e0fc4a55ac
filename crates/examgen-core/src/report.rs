//! Generation report types with JSON persistence.
//!
//! The selection engine never writes anything; these types let the CLI keep
//! an auditable record of what was generated and with which inputs.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::distribution::Distribution;
use crate::parser::QuestionBank;
use crate::selection::{GenerateOptions, SelectionResult, TieBreak};

/// A complete generation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the bank the pool came from.
    pub bank: BankSummary,
    /// Template name, when the distribution came from one.
    #[serde(default)]
    pub template: Option<String>,
    pub distribution: Distribution,
    pub randomize: bool,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub tie_break: TieBreak,
    /// False when the selection cannot be reproduced from these inputs.
    pub reproducible: bool,
    pub result: SelectionResult,
}

/// Summary of a question bank (without the questions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl From<&QuestionBank> for BankSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.questions.len(),
        }
    }
}

impl GenerationReport {
    pub fn new(
        bank: &QuestionBank,
        template: Option<String>,
        distribution: Distribution,
        options: &GenerateOptions,
        result: SelectionResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: BankSummary::from(bank),
            template,
            distribution,
            randomize: options.randomize,
            seed: options.seed.clone(),
            tie_break: options.tie_break,
            reproducible: options.is_reproducible(),
            result,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GenerationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
