//! Question bank and distribution file loading.
//!
//! Banks and distributions are read from TOML, or from JSON when the file
//! extension is `.json`. Enumerated fields are parsed leniently (any case,
//! `-` or `_` separators, common aliases) and unknown names are errors.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::distribution::DistributionTemplate;
use crate::model::{BloomLevel, Difficulty, QuestionCandidate, QuestionType, UsageStats};

/// A named collection of question candidates loaded from one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<QuestionCandidate>,
}

impl QuestionBank {
    /// Concatenate several banks into one pool, keeping file order.
    pub fn merge(id: impl Into<String>, name: impl Into<String>, banks: Vec<QuestionBank>) -> Self {
        let description = banks
            .iter()
            .map(|b| b.id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: id.into(),
            name: name.into(),
            description,
            questions: banks.into_iter().flat_map(|b| b.questions).collect(),
        }
    }
}

/// Intermediate file structure for question banks.
#[derive(Debug, Deserialize)]
struct BankFile {
    bank: BankHeader,
    #[serde(default)]
    questions: Vec<FileQuestion>,
}

#[derive(Debug, Deserialize)]
struct BankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct FileQuestion {
    id: String,
    question_type: String,
    difficulty: String,
    #[serde(default)]
    bloom_level: Option<String>,
    #[serde(default = "default_points")]
    points: f64,
    #[serde(default)]
    usage_stats: Option<UsageStats>,
}

fn default_points() -> f64 {
    1.0
}

/// Source format of a bank or distribution file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// JSON for `.json` files, TOML otherwise.
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "json") {
            FileFormat::Json
        } else {
            FileFormat::Toml
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    content: &str,
    format: FileFormat,
    source_path: &Path,
) -> Result<T> {
    match format {
        FileFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display())),
        FileFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display())),
    }
}

/// Parse a single bank file.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, FileFormat::from_path(path), path)
}

/// Parse bank file contents (useful for testing).
pub fn parse_bank_str(content: &str, format: FileFormat, source_path: &Path) -> Result<QuestionBank> {
    let parsed: BankFile = decode(content, format, source_path)?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let bloom_level = q
                .bloom_level
                .map(|b| b.parse::<BloomLevel>())
                .transpose()
                .with_context(|| format!("question {}", q.id))?;
            Ok(QuestionCandidate {
                question_type: q
                    .question_type
                    .parse::<QuestionType>()
                    .with_context(|| format!("question {}", q.id))?,
                difficulty: q
                    .difficulty
                    .parse::<Difficulty>()
                    .with_context(|| format!("question {}", q.id))?,
                bloom_level,
                points: q.points,
                usage_stats: q.usage_stats,
                id: q.id,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` and `.json` banks from a directory.
///
/// Files that fail to parse are skipped with a warning. Files are visited in
/// sorted path order so the merged pool order is stable.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let mut banks = Vec::new();
    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank file, or merge every bank in a directory into one pool.
pub fn load_pool(path: &Path) -> Result<QuestionBank> {
    if path.is_dir() {
        let banks = load_bank_directory(path)?;
        anyhow::ensure!(
            !banks.is_empty(),
            "no question banks found in {}",
            path.display()
        );
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pool".to_string());
        Ok(QuestionBank::merge(name.clone(), name, banks))
    } else {
        parse_bank(path)
    }
}

/// Parse a distribution file.
pub fn parse_distribution(path: &Path) -> Result<DistributionTemplate> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read distribution: {}", path.display()))?;

    parse_distribution_str(&content, FileFormat::from_path(path), path)
}

/// Parse distribution file contents.
pub fn parse_distribution_str(
    content: &str,
    format: FileFormat,
    source_path: &Path,
) -> Result<DistributionTemplate> {
    let mut template: DistributionTemplate = decode(content, format, source_path)?;
    if template.name.is_empty() {
        template.name = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(template)
}

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Generation will refuse this bank.
    Error,
    /// Generation works, but something looks off.
    Warning,
}

/// A finding from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(question_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            question_id: question_id.map(str::to_string),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(question_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            question_id: question_id.map(str::to_string),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Validate a bank, reporting every problem rather than stopping at the first.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if bank.questions.is_empty() {
        issues.push(ValidationIssue::warning(None, "bank has no questions"));
    }

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        let id = Some(q.id.as_str());
        if q.id.trim().is_empty() {
            issues.push(ValidationIssue::error(None, "question with empty id"));
        } else if !seen_ids.insert(q.id.as_str()) {
            issues.push(ValidationIssue::error(id, format!("duplicate question ID: {}", q.id)));
        }

        if !q.points.is_finite() || q.points <= 0.0 {
            issues.push(ValidationIssue::error(
                id,
                format!("points must be positive, got {}", q.points),
            ));
        }

        if let Some(rate) = q.usage_stats.as_ref().and_then(|u| u.success_rate) {
            if !(0.0..=1.0).contains(&rate) {
                issues.push(ValidationIssue::error(
                    id,
                    format!("success_rate {rate} is outside [0, 1]"),
                ));
            }
        }

        if q.bloom_level.is_none() {
            issues.push(ValidationIssue::warning(id, "no bloom_level set"));
        }
    }

    issues
}
