//! Input contract errors.
//!
//! These represent caller bugs (malformed pools or distributions). An
//! unsatisfiable distribution is never an error; it is reported through
//! [`crate::selection::SelectionMetadata`].

use thiserror::Error;

/// Errors raised when the pool or distribution handed to the engine is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// A question in the pool has an empty or whitespace-only id.
    #[error("question at pool index {index} has an empty id")]
    EmptyId { index: usize },

    /// The same id appears more than once in one pool.
    #[error("duplicate question id in pool: {0}")]
    DuplicateId(String),

    /// Points must be a finite, strictly positive number.
    #[error("question {id} has invalid points {points} (must be finite and > 0)")]
    InvalidPoints { id: String, points: f64 },

    /// Success rates are fractions in `[0, 1]`.
    #[error("question {id} has success rate {rate} outside [0, 1]")]
    InvalidSuccessRate { id: String, rate: f64 },

    /// A distribution cell requested a negative number of questions.
    #[error("negative count {count} requested for {category}")]
    NegativeCount { category: String, count: i64 },

    /// A count does not fit the engine's counter width.
    #[error("count {count} requested for {category} is too large")]
    CountTooLarge { category: String, count: i64 },

    /// Two keys of one distribution name the same cell.
    #[error("distribution lists {0} more than once")]
    DuplicateCell(String),

    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown bloom level: {0}")]
    UnknownBloomLevel(String),
}
