//! Feasibility reporting.
//!
//! Turns per-cell shortfalls into a verdict and the user-facing list of unmet
//! categories. Label rendering sits behind [`ShortfallFormatter`] so the
//! message format can change without touching selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distribution::DistributionCell;
use crate::model::{BloomLevel, Difficulty, QuestionType};

/// The gap between what a cell asked for and what the pool could supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    /// Set when the cell was bucketed by Bloom level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_level: Option<BloomLevel>,
    pub requested: u32,
    pub available: u32,
    /// `requested - available`.
    pub deficit: u32,
}

impl Shortfall {
    pub fn new(
        question_type: QuestionType,
        difficulty: Difficulty,
        requested: u32,
        available: u32,
    ) -> Self {
        Self {
            question_type,
            difficulty,
            bloom_level: None,
            requested,
            available,
            deficit: requested.saturating_sub(available),
        }
    }

    /// Shortfall for a resolved cell, carrying its Bloom bucket.
    pub fn for_cell(cell: &DistributionCell, available: u32) -> Self {
        Self {
            bloom_level: cell.bloom_level,
            ..Self::new(
                cell.question_type,
                cell.difficulty,
                cell.requested_count,
                available,
            )
        }
    }

    /// `"TYPE/DIFFICULTY"`, or `"TYPE/DIFFICULTY/BLOOM"` for a bucketed cell.
    pub fn category(&self) -> String {
        match self.bloom_level {
            Some(bloom) => format!("{}/{}/{}", self.question_type, self.difficulty, bloom),
            None => format!("{}/{}", self.question_type, self.difficulty),
        }
    }
}

/// Default label: `"MULTIPLE_CHOICE/EASY: need 10, have 6"`.
impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: need {}, have {}",
            self.category(),
            self.requested,
            self.available
        )
    }
}

/// Renders a shortfall into a label shown directly to end users.
pub trait ShortfallFormatter {
    fn label(&self, shortfall: &Shortfall) -> String;
}

/// Formatter producing the [`Shortfall`] `Display` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl ShortfallFormatter for DefaultFormatter {
    fn label(&self, shortfall: &Shortfall) -> String {
        shortfall.to_string()
    }
}

/// Pass/fail verdict plus ordered labels for unmet categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeasibilityReport {
    pub distribution_met: bool,
    pub missing_categories: Vec<String>,
}

impl FeasibilityReport {
    /// Aggregate shortfalls, preserving the order of the cells that produced them.
    pub fn from_shortfalls(shortfalls: &[Shortfall], formatter: &dyn ShortfallFormatter) -> Self {
        for s in shortfalls {
            tracing::warn!(
                category = %s.category(),
                requested = s.requested,
                available = s.available,
                deficit = s.deficit,
                "distribution cell not satisfied"
            );
        }
        Self {
            distribution_met: shortfalls.is_empty(),
            missing_categories: shortfalls.iter().map(|s| formatter.label(s)).collect(),
        }
    }
}
