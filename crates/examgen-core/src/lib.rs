//! examgen-core: distribution-driven exam question selection.
//!
//! This crate defines the question data model, the distribution resolver,
//! the selection engine and its feasibility reporting, plus the file loading,
//! configuration and report types the `examgen` CLI builds on.

pub mod config;
pub mod distribution;
pub mod error;
pub mod feasibility;
pub mod model;
pub mod parser;
pub mod preview;
pub mod report;
pub mod rng;
pub mod selection;

pub use distribution::{resolve, Distribution, DistributionCell, DistributionTemplate};
pub use error::SelectionError;
pub use model::{BloomLevel, Difficulty, QuestionCandidate, QuestionType, UsageStats};
pub use preview::{preview, PreviewSummary};
pub use selection::{generate, select, GenerateOptions, SelectionResult, TieBreak};
