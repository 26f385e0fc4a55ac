//! Pool composition preview.
//!
//! Answers "what could I build from this pool right now" without a
//! distribution. Pure aggregation: no selection, no randomness.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distribution::{resolve, Distribution, DistributionCell};
use crate::error::SelectionError;
use crate::feasibility::Shortfall;
use crate::model::{BloomLevel, Difficulty, QuestionCandidate, QuestionType};

/// Count of questions in one (type, difficulty) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewGroup {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: usize,
    pub points: f64,
    /// Questions in this group per Bloom level.
    #[serde(default)]
    pub by_bloom_level: BTreeMap<BloomLevel, usize>,
}

/// Composition of a question pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSummary {
    pub total_questions: usize,
    pub total_points: f64,
    /// Non-empty groups in canonical (type, difficulty) order.
    pub groups: Vec<PreviewGroup>,
    /// Questions per Bloom level; levels with no questions are omitted.
    pub by_bloom_level: BTreeMap<BloomLevel, usize>,
    /// Questions carrying no Bloom level.
    pub without_bloom_level: usize,
}

impl PreviewSummary {
    /// Questions available for one (type, difficulty) group.
    pub fn count(&self, question_type: QuestionType, difficulty: Difficulty) -> usize {
        self.groups
            .iter()
            .find(|g| g.question_type == question_type && g.difficulty == difficulty)
            .map_or(0, |g| g.count)
    }

    /// Questions of a type across all difficulties.
    pub fn count_by_type(&self, question_type: QuestionType) -> usize {
        self.groups
            .iter()
            .filter(|g| g.question_type == question_type)
            .map(|g| g.count)
            .sum()
    }

    /// Questions that could fill `cell`, honoring its Bloom bucket.
    pub fn count_cell(&self, cell: &DistributionCell) -> usize {
        let group = self
            .groups
            .iter()
            .find(|g| g.question_type == cell.question_type && g.difficulty == cell.difficulty);
        match (group, cell.bloom_level) {
            (None, _) => 0,
            (Some(g), None) => g.count,
            (Some(g), Some(bloom)) => g.by_bloom_level.get(&bloom).copied().unwrap_or(0),
        }
    }

    /// Cells of `distribution` this pool could not fill, in canonical order.
    ///
    /// The distribution is resolved exactly as [`crate::generate`] resolves
    /// it, so malformed counts are errors here too. Distinct cells never
    /// compete for the same question, which makes this dry run match what
    /// `generate` reports.
    pub fn shortfalls_for(
        &self,
        distribution: &Distribution,
    ) -> Result<Vec<Shortfall>, SelectionError> {
        let shortfalls = resolve(distribution)?
            .iter()
            .filter_map(|cell| {
                let available = u32::try_from(self.count_cell(cell)).unwrap_or(u32::MAX);
                (available < cell.requested_count).then(|| Shortfall::for_cell(cell, available))
            })
            .collect();
        Ok(shortfalls)
    }
}

/// Group the pool by (type, difficulty) and Bloom level.
pub fn preview(pool: &[QuestionCandidate]) -> PreviewSummary {
    let mut grouped: BTreeMap<(QuestionType, Difficulty), PreviewGroup> = BTreeMap::new();
    let mut by_bloom_level: BTreeMap<BloomLevel, usize> = BTreeMap::new();
    let mut without_bloom_level = 0usize;

    for q in pool {
        let group = grouped
            .entry((q.question_type, q.difficulty))
            .or_insert_with(|| PreviewGroup {
                question_type: q.question_type,
                difficulty: q.difficulty,
                count: 0,
                points: 0.0,
                by_bloom_level: BTreeMap::new(),
            });
        group.count += 1;
        group.points += q.points;

        match q.bloom_level {
            Some(level) => {
                *group.by_bloom_level.entry(level).or_default() += 1;
                *by_bloom_level.entry(level).or_default() += 1;
            }
            None => without_bloom_level += 1,
        }
    }

    let groups = grouped.into_values().collect();

    PreviewSummary {
        total_questions: pool.len(),
        total_points: pool.iter().map(|q| q.points).sum(),
        groups,
        by_bloom_level,
        without_bloom_level,
    }
}
