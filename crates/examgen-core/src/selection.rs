//! Selection engine.
//!
//! Fills distribution cells one at a time, in resolved order, from a read-only
//! question pool. Each cell takes the first `requested_count` unconsumed
//! matches (after an optional seeded shuffle) and records a shortfall when the
//! pool runs dry. Cells never borrow from each other.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distribution::{resolve, Distribution, DistributionCell};
use crate::error::SelectionError;
use crate::feasibility::{DefaultFormatter, FeasibilityReport, Shortfall, ShortfallFormatter};
use crate::model::{validate_pool, QuestionCandidate};
use crate::rng::{effective_seed, rng_for_seed, shuffle};

/// How equally-matching candidates are ordered when not randomizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the pool's relative order.
    #[default]
    PoolOrder,
    /// Prefer questions used in fewer exams; ties keep pool order.
    LeastUsed,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::PoolOrder => write!(f, "pool-order"),
            TieBreak::LeastUsed => write!(f, "least-used"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pool-order" | "pool" => Ok(TieBreak::PoolOrder),
            "least-used" | "usage" => Ok(TieBreak::LeastUsed),
            other => Err(format!("unknown tie-break: {other}")),
        }
    }
}

/// Options for one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Shuffle each cell's candidates before taking from them.
    pub randomize: bool,
    /// Seed for reproducible shuffles. Blank seeds count as none.
    pub seed: Option<String>,
    /// Ordering among candidates when `randomize` is false.
    pub tie_break: TieBreak,
}

impl GenerateOptions {
    /// Seeded, randomized generation.
    pub fn seeded(seed: impl Into<String>) -> Self {
        Self {
            randomize: true,
            seed: Some(seed.into()),
            tie_break: TieBreak::PoolOrder,
        }
    }

    /// Whether two calls with these options and the same input agree.
    pub fn is_reproducible(&self) -> bool {
        !self.randomize || effective_seed(self.seed.as_deref()).is_some()
    }
}

/// Verdict and accounting for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    /// True iff every cell was fully satisfied.
    pub distribution_met: bool,
    /// One label per unsatisfied cell, in cell order.
    pub missing_categories: Vec<String>,
    /// Structured form of `missing_categories`.
    pub shortfalls: Vec<Shortfall>,
    /// Sum of requested counts over all cells.
    pub requested_total: u64,
    /// Number of questions selected.
    pub selected_total: usize,
    /// Sum of points over the selected questions.
    pub total_points: f64,
}

/// Output of one generation call. Nothing here outlives the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Selected questions in the order they were taken; ids are distinct.
    pub selected_questions: Vec<QuestionCandidate>,
    pub metadata: SelectionMetadata,
}

impl SelectionResult {
    pub fn ids(&self) -> Vec<&str> {
        self.selected_questions.iter().map(|q| q.id.as_str()).collect()
    }
}

/// Resolve `distribution` and select questions for it from `pool`.
pub fn generate(
    pool: &[QuestionCandidate],
    distribution: &Distribution,
    options: &GenerateOptions,
) -> Result<SelectionResult, SelectionError> {
    generate_with_formatter(pool, distribution, options, &DefaultFormatter)
}

/// [`generate`] with a custom shortfall label format.
pub fn generate_with_formatter(
    pool: &[QuestionCandidate],
    distribution: &Distribution,
    options: &GenerateOptions,
    formatter: &dyn ShortfallFormatter,
) -> Result<SelectionResult, SelectionError> {
    let cells = resolve(distribution)?;
    let result = select_with_options(pool, &cells, options, formatter)?;

    tracing::info!(
        pool = pool.len(),
        cells = cells.len(),
        selected = result.metadata.selected_total,
        requested = result.metadata.requested_total,
        distribution_met = result.metadata.distribution_met,
        reproducible = options.is_reproducible(),
        "generated exam selection"
    );
    Ok(result)
}

/// Select questions for already-resolved cells.
pub fn select(
    pool: &[QuestionCandidate],
    cells: &[DistributionCell],
    randomize: bool,
    seed: Option<&str>,
) -> Result<SelectionResult, SelectionError> {
    let options = GenerateOptions {
        randomize,
        seed: seed.map(str::to_string),
        tie_break: TieBreak::PoolOrder,
    };
    select_with_options(pool, cells, &options, &DefaultFormatter)
}

/// Select with full options. The generator, if any, lives only for this call.
pub fn select_with_options(
    pool: &[QuestionCandidate],
    cells: &[DistributionCell],
    options: &GenerateOptions,
    formatter: &dyn ShortfallFormatter,
) -> Result<SelectionResult, SelectionError> {
    if !options.randomize && options.seed.is_some() {
        tracing::debug!("seed ignored because randomize is off");
    }
    let mut rng = options
        .randomize
        .then(|| rng_for_seed(options.seed.as_deref()));
    select_with_rng(pool, cells, rng.as_mut(), options.tie_break, formatter)
}

/// Core selection loop over an explicitly passed generator.
///
/// `rng = None` means no randomization: candidates keep pool order, or are
/// stably reordered by usage under [`TieBreak::LeastUsed`].
pub fn select_with_rng<R: Rng + ?Sized>(
    pool: &[QuestionCandidate],
    cells: &[DistributionCell],
    mut rng: Option<&mut R>,
    tie_break: TieBreak,
    formatter: &dyn ShortfallFormatter,
) -> Result<SelectionResult, SelectionError> {
    validate_pool(pool)?;

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut selected: Vec<QuestionCandidate> = Vec::new();
    let mut shortfalls = Vec::new();
    let mut requested_total = 0u64;

    for cell in cells {
        requested_total += u64::from(cell.requested_count);
        if cell.requested_count == 0 {
            continue;
        }

        let mut candidates: Vec<&QuestionCandidate> = pool
            .iter()
            .filter(|q| cell.accepts(q))
            .filter(|q| !consumed.contains(q.id.as_str()))
            .collect();

        match rng.as_deref_mut() {
            Some(rng) => shuffle(&mut candidates, rng),
            None if tie_break == TieBreak::LeastUsed => {
                candidates.sort_by_key(|q| q.times_used());
            }
            None => {}
        }

        let available = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        let take = cell.requested_count.min(available) as usize;
        for q in candidates.into_iter().take(take) {
            if consumed.insert(q.id.as_str()) {
                selected.push(q.clone());
            }
        }

        tracing::debug!(cell = %cell, available, taken = take, "filled cell");

        if available < cell.requested_count {
            shortfalls.push(Shortfall::for_cell(cell, available));
        }
    }

    let report = FeasibilityReport::from_shortfalls(&shortfalls, formatter);
    let total_points = selected.iter().map(|q| q.points).sum();

    Ok(SelectionResult {
        metadata: SelectionMetadata {
            distribution_met: report.distribution_met,
            missing_categories: report.missing_categories,
            shortfalls,
            requested_total,
            selected_total: selected.len(),
            total_points,
        },
        selected_questions: selected,
    })
}
