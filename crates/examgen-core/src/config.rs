//! Configuration loading and named distribution templates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::distribution::DistributionTemplate;
use crate::selection::{GenerateOptions, TieBreak};

/// Top-level examgen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamgenConfig {
    /// Shuffle candidates by default.
    #[serde(default)]
    pub randomize: bool,
    /// Default seed for reproducible shuffles. Supports `${VAR}` references.
    #[serde(default)]
    pub seed: Option<String>,
    /// Ordering among equally matching candidates when not randomizing.
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Where generation reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Reusable distributions keyed by name.
    #[serde(default)]
    pub templates: BTreeMap<String, DistributionTemplate>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./examgen-results")
}

impl Default for ExamgenConfig {
    fn default() -> Self {
        Self {
            randomize: false,
            seed: None,
            tie_break: TieBreak::default(),
            output_dir: default_output_dir(),
            templates: BTreeMap::new(),
        }
    }
}

impl ExamgenConfig {
    /// Look up a named template.
    pub fn template(&self, name: &str) -> Result<&DistributionTemplate> {
        self.templates.get(name).with_context(|| {
            format!(
                "template '{}' not found. Available: {:?}",
                name,
                self.templates.keys().collect::<Vec<_>>()
            )
        })
    }

    /// Generation options implied by this config.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            randomize: self.randomize,
            seed: self.seed.clone(),
            tie_break: self.tie_break,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examgen.toml` in the current directory
/// 2. `~/.config/examgen/config.toml`
///
/// Environment variable overrides: `EXAMGEN_SEED`, `EXAMGEN_RANDOMIZE`.
pub fn load_config() -> Result<ExamgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examgen.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ExamgenConfig::default(),
    };

    Ok(apply_env_overrides(config))
}

/// Parse config contents and name each template after its key when unnamed.
pub fn parse_config_str(content: &str) -> Result<ExamgenConfig> {
    let mut config: ExamgenConfig = toml::from_str(content)?;
    for (key, template) in config.templates.iter_mut() {
        if template.name.is_empty() {
            template.name = key.clone();
        }
    }
    Ok(config)
}

fn apply_env_overrides(mut config: ExamgenConfig) -> ExamgenConfig {
    if let Ok(seed) = std::env::var("EXAMGEN_SEED") {
        config.seed = Some(seed);
    }

    if let Ok(value) = std::env::var("EXAMGEN_RANDOMIZE") {
        match parse_bool(&value) {
            Some(randomize) => config.randomize = randomize,
            None => tracing::warn!("ignoring EXAMGEN_RANDOMIZE={value:?}: expected a boolean"),
        }
    }

    config.seed = config.seed.as_deref().map(resolve_env_vars);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examgen"))
}
