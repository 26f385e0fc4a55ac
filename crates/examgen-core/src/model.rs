//! Core data model types for examgen.
//!
//! These are the read-only views of question-bank entries that the selection
//! engine consumes, together with the closed enumerations that classify them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

/// The kind of question. Declaration order is the canonical fill order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    /// All question types in canonical order.
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::FillBlank,
        QuestionType::ShortAnswer,
        QuestionType::Essay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::TrueFalse => "TRUE_FALSE",
            QuestionType::FillBlank => "FILL_BLANK",
            QuestionType::ShortAnswer => "SHORT_ANSWER",
            QuestionType::Essay => "ESSAY",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "multiple_choice" | "multiplechoice" | "mcq" | "mc" => Ok(QuestionType::MultipleChoice),
            "true_false" | "truefalse" | "tf" | "boolean" => Ok(QuestionType::TrueFalse),
            "fill_blank" | "fill_in_the_blank" | "fill_in_blank" | "fib" => {
                Ok(QuestionType::FillBlank)
            }
            "short_answer" | "shortanswer" | "short" => Ok(QuestionType::ShortAnswer),
            "essay" | "long_answer" => Ok(QuestionType::Essay),
            _ => Err(SelectionError::UnknownQuestionType(s.to_string())),
        }
    }
}

/// How hard a question is. Ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "moderate" => Ok(Difficulty::Medium),
            "hard" | "difficult" => Ok(Difficulty::Hard),
            _ => Err(SelectionError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Cognitive level of a question (Bloom's taxonomy), lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
        BloomLevel::Evaluate,
        BloomLevel::Create,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BloomLevel::Remember => "REMEMBER",
            BloomLevel::Understand => "UNDERSTAND",
            BloomLevel::Apply => "APPLY",
            BloomLevel::Analyze => "ANALYZE",
            BloomLevel::Evaluate => "EVALUATE",
            BloomLevel::Create => "CREATE",
        }
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloomLevel {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "remember" => Ok(BloomLevel::Remember),
            "understand" => Ok(BloomLevel::Understand),
            "apply" => Ok(BloomLevel::Apply),
            "analyze" | "analyse" => Ok(BloomLevel::Analyze),
            "evaluate" => Ok(BloomLevel::Evaluate),
            "create" => Ok(BloomLevel::Create),
            _ => Err(SelectionError::UnknownBloomLevel(s.to_string())),
        }
    }
}

/// Lowercase and unify `-`/space separators to `_`.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Aggregate analytics for a question. Never required for correctness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// How many exams have included this question.
    #[serde(default)]
    pub times_used: u32,
    /// Fraction of correct answers, if known.
    #[serde(default)]
    pub success_rate: Option<f64>,
}

/// A read-only view of a question-bank entry relevant to selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionCandidate {
    /// Opaque identifier, unique within one pool.
    pub id: String,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_level: Option<BloomLevel>,
    /// Weight assigned to the question when included in an exam.
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_stats: Option<UsageStats>,
}

impl QuestionCandidate {
    /// Convenience constructor with one point and no optional data.
    pub fn new(id: impl Into<String>, question_type: QuestionType, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            question_type,
            difficulty,
            bloom_level: None,
            points: 1.0,
            usage_stats: None,
        }
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_bloom(mut self, level: BloomLevel) -> Self {
        self.bloom_level = Some(level);
        self
    }

    pub fn with_usage(mut self, times_used: u32, success_rate: Option<f64>) -> Self {
        self.usage_stats = Some(UsageStats {
            times_used,
            success_rate,
        });
        self
    }

    /// Times used, treating missing stats as never used.
    pub fn times_used(&self) -> u32 {
        self.usage_stats.as_ref().map_or(0, |u| u.times_used)
    }

    /// Whether this question fills the given (type, difficulty) cell.
    pub fn matches(&self, question_type: QuestionType, difficulty: Difficulty) -> bool {
        self.question_type == question_type && self.difficulty == difficulty
    }
}

/// Check the pool's input contract: non-empty unique ids, positive finite
/// points, and success rates within `[0, 1]`.
pub fn validate_pool(pool: &[QuestionCandidate]) -> Result<(), SelectionError> {
    let mut seen = HashSet::with_capacity(pool.len());
    for (index, q) in pool.iter().enumerate() {
        if q.id.trim().is_empty() {
            return Err(SelectionError::EmptyId { index });
        }
        if !seen.insert(q.id.as_str()) {
            return Err(SelectionError::DuplicateId(q.id.clone()));
        }
        if !q.points.is_finite() || q.points <= 0.0 {
            return Err(SelectionError::InvalidPoints {
                id: q.id.clone(),
                points: q.points,
            });
        }
        if let Some(rate) = q.usage_stats.as_ref().and_then(|u| u.success_rate) {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SelectionError::InvalidSuccessRate {
                    id: q.id.clone(),
                    rate,
                });
            }
        }
    }
    Ok(())
}
