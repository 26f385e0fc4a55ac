pub mod generate;
pub mod init;
pub mod preview;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use examgen_core::config::ExamgenConfig;
use examgen_core::parser;
use examgen_core::DistributionTemplate;

/// Pick the distribution from `--distribution` or `--template`, if either was given.
pub fn load_distribution(
    distribution_path: Option<PathBuf>,
    template: Option<String>,
    config: &ExamgenConfig,
) -> Result<Option<DistributionTemplate>> {
    match (distribution_path, template) {
        (Some(_), Some(_)) => anyhow::bail!("use either --distribution or --template, not both"),
        (Some(path), None) => Ok(Some(parser::parse_distribution(&path)?)),
        (None, Some(name)) => Ok(Some(config.template(&name)?.clone())),
        (None, None) => Ok(None),
    }
}
