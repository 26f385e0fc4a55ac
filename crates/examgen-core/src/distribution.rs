//! Distribution resolver.
//!
//! A [`Distribution`] is the nested "type -> difficulty -> count" mapping that
//! templates and ad-hoc requests share. A difficulty may instead hold a
//! "Bloom level -> count" table, which buckets that cell by cognitive level.
//! [`resolve`] flattens it into the ordered list of [`DistributionCell`]s the
//! selection engine fills.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::model::{BloomLevel, Difficulty, QuestionCandidate, QuestionType};

/// String-keyed wire shape of one difficulty entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Total(i64),
    ByBloom(BTreeMap<String, i64>),
}

/// String-keyed wire shape of a distribution.
pub type RawDistribution = BTreeMap<String, BTreeMap<String, RawCount>>;

/// What one (type, difficulty) pair asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellCount {
    /// Questions of any Bloom level.
    Total(i64),
    /// Questions per Bloom level.
    ByBloom(BTreeMap<BloomLevel, i64>),
}

/// How many questions of each (type, difficulty) an exam should contain,
/// optionally split by Bloom level.
///
/// Keys are held in canonical order, so iteration is reproducible. Counts are
/// signed so that negative input survives parsing and is rejected by
/// [`resolve`] with a precise error instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution", into = "RawDistribution")]
pub struct Distribution {
    cells: BTreeMap<QuestionType, BTreeMap<Difficulty, CellCount>>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for one cell, replacing any previous value or Bloom split.
    pub fn set(&mut self, question_type: QuestionType, difficulty: Difficulty, count: i64) {
        self.cells
            .entry(question_type)
            .or_default()
            .insert(difficulty, CellCount::Total(count));
    }

    /// Set the count for one Bloom bucket of a cell. A plain count previously
    /// set for the same cell is replaced by the split.
    pub fn set_bloom(
        &mut self,
        question_type: QuestionType,
        difficulty: Difficulty,
        bloom_level: BloomLevel,
        count: i64,
    ) {
        let entry = self
            .cells
            .entry(question_type)
            .or_default()
            .entry(difficulty)
            .or_insert_with(|| CellCount::ByBloom(BTreeMap::new()));
        if let CellCount::Total(_) = entry {
            *entry = CellCount::ByBloom(BTreeMap::new());
        }
        if let CellCount::ByBloom(by_bloom) = entry {
            by_bloom.insert(bloom_level, count);
        }
    }

    /// Builder-style [`Distribution::set`].
    pub fn with(mut self, question_type: QuestionType, difficulty: Difficulty, count: i64) -> Self {
        self.set(question_type, difficulty, count);
        self
    }

    /// Builder-style [`Distribution::set_bloom`].
    pub fn with_bloom(
        mut self,
        question_type: QuestionType,
        difficulty: Difficulty,
        bloom_level: BloomLevel,
        count: i64,
    ) -> Self {
        self.set_bloom(question_type, difficulty, bloom_level, count);
        self
    }

    /// Requested count for a cell, summed over its Bloom buckets if split.
    /// Absent keys mean zero.
    pub fn get(&self, question_type: QuestionType, difficulty: Difficulty) -> i64 {
        match self.cell(question_type, difficulty) {
            Some(CellCount::Total(count)) => *count,
            Some(CellCount::ByBloom(by_bloom)) => by_bloom.values().sum(),
            None => 0,
        }
    }

    /// Requested count for one Bloom bucket; zero unless the cell is split.
    pub fn get_bloom(
        &self,
        question_type: QuestionType,
        difficulty: Difficulty,
        bloom_level: BloomLevel,
    ) -> i64 {
        match self.cell(question_type, difficulty) {
            Some(CellCount::ByBloom(by_bloom)) => by_bloom.get(&bloom_level).copied().unwrap_or(0),
            _ => 0,
        }
    }

    fn cell(&self, question_type: QuestionType, difficulty: Difficulty) -> Option<&CellCount> {
        self.cells
            .get(&question_type)
            .and_then(|by_difficulty| by_difficulty.get(&difficulty))
    }

    /// Sum of all positive counts.
    pub fn total_requested(&self) -> u64 {
        self.entries()
            .filter(|(_, _, _, count)| *count > 0)
            .map(|(_, _, _, count)| count as u64)
            .sum()
    }

    /// Whether no cell asks for any question.
    pub fn is_empty(&self) -> bool {
        self.total_requested() == 0
    }

    /// All stored entries in canonical order, including zero and negative
    /// ones. Bloom buckets of a split cell follow Bloom order.
    pub fn entries(
        &self,
    ) -> impl Iterator<Item = (QuestionType, Difficulty, Option<BloomLevel>, i64)> + '_ {
        self.cells.iter().flat_map(|(question_type, by_difficulty)| {
            by_difficulty
                .iter()
                .flat_map(move |(difficulty, count)| match count {
                    CellCount::Total(n) => vec![(*question_type, *difficulty, None, *n)],
                    CellCount::ByBloom(by_bloom) => by_bloom
                        .iter()
                        .map(|(bloom, n)| (*question_type, *difficulty, Some(*bloom), *n))
                        .collect(),
                })
        })
    }
}

impl TryFrom<RawDistribution> for Distribution {
    type Error = SelectionError;

    fn try_from(raw: RawDistribution) -> Result<Self, Self::Error> {
        let mut distribution = Distribution::new();
        for (type_key, by_difficulty) in raw {
            let question_type: QuestionType = type_key.parse()?;
            for (difficulty_key, count) in by_difficulty {
                let difficulty: Difficulty = difficulty_key.parse()?;
                if distribution.cell(question_type, difficulty).is_some() {
                    return Err(SelectionError::DuplicateCell(category_label(
                        question_type,
                        difficulty,
                        None,
                    )));
                }
                let count = match count {
                    RawCount::Total(n) => CellCount::Total(n),
                    RawCount::ByBloom(raw_by_bloom) => {
                        let mut by_bloom = BTreeMap::new();
                        for (bloom_key, n) in raw_by_bloom {
                            let bloom_level: BloomLevel = bloom_key.parse()?;
                            if by_bloom.insert(bloom_level, n).is_some() {
                                return Err(SelectionError::DuplicateCell(category_label(
                                    question_type,
                                    difficulty,
                                    Some(bloom_level),
                                )));
                            }
                        }
                        CellCount::ByBloom(by_bloom)
                    }
                };
                distribution
                    .cells
                    .entry(question_type)
                    .or_default()
                    .insert(difficulty, count);
            }
        }
        Ok(distribution)
    }
}

impl From<Distribution> for RawDistribution {
    fn from(distribution: Distribution) -> Self {
        distribution
            .cells
            .into_iter()
            .map(|(question_type, by_difficulty)| {
                let inner = by_difficulty
                    .into_iter()
                    .map(|(difficulty, count)| {
                        let raw = match count {
                            CellCount::Total(n) => RawCount::Total(n),
                            CellCount::ByBloom(by_bloom) => RawCount::ByBloom(
                                by_bloom
                                    .into_iter()
                                    .map(|(bloom, n)| (bloom.to_string(), n))
                                    .collect(),
                            ),
                        };
                        (difficulty.to_string(), raw)
                    })
                    .collect();
                (question_type.to_string(), inner)
            })
            .collect()
    }
}

/// A reusable, named distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub distribution: Distribution,
}

/// One (type, difficulty, optional Bloom level, count) entry to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionCell {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    /// When set, only questions at this Bloom level fill the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_level: Option<BloomLevel>,
    pub requested_count: u32,
}

impl DistributionCell {
    pub fn new(question_type: QuestionType, difficulty: Difficulty, requested_count: u32) -> Self {
        Self {
            question_type,
            difficulty,
            bloom_level: None,
            requested_count,
        }
    }

    pub fn with_bloom(mut self, bloom_level: BloomLevel) -> Self {
        self.bloom_level = Some(bloom_level);
        self
    }

    /// Whether `question` can fill this cell.
    pub fn accepts(&self, question: &QuestionCandidate) -> bool {
        question.matches(self.question_type, self.difficulty)
            && self
                .bloom_level
                .map_or(true, |bloom| question.bloom_level == Some(bloom))
    }

    /// `"TYPE/DIFFICULTY"` or `"TYPE/DIFFICULTY/BLOOM"`.
    pub fn category(&self) -> String {
        category_label(self.question_type, self.difficulty, self.bloom_level)
    }
}

impl fmt::Display for DistributionCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.category(), self.requested_count)
    }
}

pub(crate) fn category_label(
    question_type: QuestionType,
    difficulty: Difficulty,
    bloom_level: Option<BloomLevel>,
) -> String {
    match bloom_level {
        Some(bloom) => format!("{question_type}/{difficulty}/{bloom}"),
        None => format!("{question_type}/{difficulty}"),
    }
}

/// Flatten a distribution into cells with a positive count.
///
/// Cells come out ordered by question type, then difficulty, then Bloom
/// level, each in its canonical order. That order decides which cell is
/// filled first and is part of the reproducibility guarantee under a fixed
/// seed.
pub fn resolve(distribution: &Distribution) -> Result<Vec<DistributionCell>, SelectionError> {
    let mut cells = Vec::new();
    for (question_type, difficulty, bloom_level, count) in distribution.entries() {
        if count < 0 {
            return Err(SelectionError::NegativeCount {
                category: category_label(question_type, difficulty, bloom_level),
                count,
            });
        }
        if count == 0 {
            continue;
        }
        let requested_count =
            u32::try_from(count).map_err(|_| SelectionError::CountTooLarge {
                category: category_label(question_type, difficulty, bloom_level),
                count,
            })?;
        cells.push(DistributionCell {
            question_type,
            difficulty,
            bloom_level,
            requested_count,
        });
    }
    tracing::debug!(cells = cells.len(), "resolved distribution");
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_orders_cells_canonically() {
        let distribution = Distribution::new()
            .with(QuestionType::Essay, Difficulty::Hard, 2)
            .with(QuestionType::MultipleChoice, Difficulty::Hard, 1)
            .with(QuestionType::MultipleChoice, Difficulty::Easy, 3);

        let cells = resolve(&distribution).unwrap();
        assert_eq!(
            cells,
            vec![
                DistributionCell::new(QuestionType::MultipleChoice, Difficulty::Easy, 3),
                DistributionCell::new(QuestionType::MultipleChoice, Difficulty::Hard, 1),
                DistributionCell::new(QuestionType::Essay, Difficulty::Hard, 2),
            ]
        );
    }

    #[test]
    fn resolve_skips_zero_counts() {
        let distribution = Distribution::new()
            .with(QuestionType::TrueFalse, Difficulty::Easy, 0)
            .with(QuestionType::TrueFalse, Difficulty::Medium, 0);
        assert!(resolve(&distribution).unwrap().is_empty());
        assert!(distribution.is_empty());
    }

    #[test]
    fn resolve_rejects_negative_counts() {
        let distribution = Distribution::new().with(QuestionType::Essay, Difficulty::Easy, -1);
        let err = resolve(&distribution).unwrap_err();
        assert!(matches!(err, SelectionError::NegativeCount { count: -1, .. }));
        assert!(err.to_string().contains("ESSAY/EASY"));
    }

    #[test]
    fn resolve_rejects_oversized_counts() {
        let distribution =
            Distribution::new().with(QuestionType::Essay, Difficulty::Easy, i64::from(u32::MAX) + 1);
        assert!(matches!(
            resolve(&distribution),
            Err(SelectionError::CountTooLarge { .. })
        ));
    }

    #[test]
    fn absent_keys_count_as_zero() {
        let distribution = Distribution::new().with(QuestionType::Essay, Difficulty::Easy, 4);
        assert_eq!(distribution.get(QuestionType::Essay, Difficulty::Easy), 4);
        assert_eq!(distribution.get(QuestionType::Essay, Difficulty::Hard), 0);
        assert_eq!(distribution.get(QuestionType::TrueFalse, Difficulty::Hard), 0);
        assert_eq!(distribution.total_requested(), 4);
    }

    #[test]
    fn deserialize_from_string_keys() {
        let json = r#"{"multiple-choice": {"easy": 8}, "ESSAY": {"HARD": 7, "medium": 0}}"#;
        let distribution: Distribution = serde_json::from_str(json).unwrap();
        assert_eq!(distribution.get(QuestionType::MultipleChoice, Difficulty::Easy), 8);
        assert_eq!(distribution.get(QuestionType::Essay, Difficulty::Hard), 7);
        assert_eq!(distribution.total_requested(), 15);
    }

    #[test]
    fn deserialize_rejects_unknown_keys() {
        let json = r#"{"MATCHING": {"EASY": 1}}"#;
        let err = serde_json::from_str::<Distribution>(json).unwrap_err();
        assert!(err.to_string().contains("unknown question type"));

        let json = r#"{"ESSAY": {"TRIVIAL": 1}}"#;
        let err = serde_json::from_str::<Distribution>(json).unwrap_err();
        assert!(err.to_string().contains("unknown difficulty"));
    }

    #[test]
    fn deserialize_rejects_aliased_duplicates() {
        let json = r#"{"mcq": {"EASY": 1}, "MULTIPLE_CHOICE": {"easy": 2}}"#;
        let err = serde_json::from_str::<Distribution>(json).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn bloom_buckets_resolve_in_bloom_order() {
        let json = r#"{"ESSAY": {"HARD": {"create": 1, "EVALUATE": 2}}, "TRUE_FALSE": {"EASY": 3}}"#;
        let distribution: Distribution = serde_json::from_str(json).unwrap();
        assert_eq!(distribution.get(QuestionType::Essay, Difficulty::Hard), 3);
        assert_eq!(
            distribution.get_bloom(QuestionType::Essay, Difficulty::Hard, BloomLevel::Evaluate),
            2
        );
        assert_eq!(distribution.total_requested(), 6);

        let cells = resolve(&distribution).unwrap();
        assert_eq!(
            cells,
            vec![
                DistributionCell::new(QuestionType::TrueFalse, Difficulty::Easy, 3),
                DistributionCell::new(QuestionType::Essay, Difficulty::Hard, 2)
                    .with_bloom(BloomLevel::Evaluate),
                DistributionCell::new(QuestionType::Essay, Difficulty::Hard, 1)
                    .with_bloom(BloomLevel::Create),
            ]
        );
        assert_eq!(cells[1].to_string(), "ESSAY/HARD/EVALUATE x2");
    }

    #[test]
    fn bloom_buckets_from_toml() {
        let toml_str = "[ESSAY.HARD]\nANALYZE = 1\n\n[MULTIPLE_CHOICE]\nEASY = 4\n";
        let distribution: Distribution = toml::from_str(toml_str).unwrap();
        assert_eq!(
            distribution.get_bloom(QuestionType::Essay, Difficulty::Hard, BloomLevel::Analyze),
            1
        );
        assert_eq!(distribution.get(QuestionType::MultipleChoice, Difficulty::Easy), 4);
    }

    #[test]
    fn bloom_bucket_errors_name_the_bucket() {
        let distribution = Distribution::new().with_bloom(
            QuestionType::Essay,
            Difficulty::Hard,
            BloomLevel::Apply,
            -2,
        );
        let err = resolve(&distribution).unwrap_err();
        assert_eq!(err.to_string(), "negative count -2 requested for ESSAY/HARD/APPLY");

        let json = r#"{"ESSAY": {"HARD": {"analyse": 1, "ANALYZE": 2}}}"#;
        let err = serde_json::from_str::<Distribution>(json).unwrap_err();
        assert!(err.to_string().contains("ESSAY/HARD/ANALYZE more than once"));

        let json = r#"{"ESSAY": {"HARD": {"MEMORIZE": 1}}}"#;
        let err = serde_json::from_str::<Distribution>(json).unwrap_err();
        assert!(err.to_string().contains("unknown bloom level"));
    }

    #[test]
    fn set_replaces_bloom_split_and_back() {
        let mut distribution = Distribution::new()
            .with_bloom(QuestionType::Essay, Difficulty::Hard, BloomLevel::Create, 2);
        distribution.set(QuestionType::Essay, Difficulty::Hard, 5);
        assert_eq!(distribution.get(QuestionType::Essay, Difficulty::Hard), 5);
        assert_eq!(
            distribution.get_bloom(QuestionType::Essay, Difficulty::Hard, BloomLevel::Create),
            0
        );

        distribution.set_bloom(QuestionType::Essay, Difficulty::Hard, BloomLevel::Apply, 1);
        assert_eq!(distribution.get(QuestionType::Essay, Difficulty::Hard), 1);
    }

    #[test]
    fn cell_accepts_only_its_bloom_level() {
        let cell = DistributionCell::new(QuestionType::Essay, Difficulty::Hard, 1)
            .with_bloom(BloomLevel::Evaluate);
        let evaluate = QuestionCandidate::new("e", QuestionType::Essay, Difficulty::Hard)
            .with_bloom(BloomLevel::Evaluate);
        let create = QuestionCandidate::new("c", QuestionType::Essay, Difficulty::Hard)
            .with_bloom(BloomLevel::Create);
        let unset = QuestionCandidate::new("u", QuestionType::Essay, Difficulty::Hard);
        assert!(cell.accepts(&evaluate));
        assert!(!cell.accepts(&create));
        assert!(!cell.accepts(&unset));

        let any = DistributionCell::new(QuestionType::Essay, Difficulty::Hard, 1);
        assert!(any.accepts(&create) && any.accepts(&unset));
    }

    #[test]
    fn serializes_bloom_split() {
        let distribution = Distribution::new().with_bloom(
            QuestionType::Essay,
            Difficulty::Hard,
            BloomLevel::Create,
            2,
        );
        let json = serde_json::to_string(&distribution).unwrap();
        assert_eq!(json, r#"{"ESSAY":{"HARD":{"CREATE":2}}}"#);
        let back: Distribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, distribution);
    }

    #[test]
    fn serializes_with_canonical_names() {
        let distribution = Distribution::new().with(QuestionType::FillBlank, Difficulty::Medium, 2);
        let json = serde_json::to_string(&distribution).unwrap();
        assert_eq!(json, r#"{"FILL_BLANK":{"MEDIUM":2}}"#);
    }
}
