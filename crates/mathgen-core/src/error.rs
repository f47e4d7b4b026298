//! Error types for request validation and block extraction.

use thiserror::Error;

/// A specialized `Result` type for request validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A question request field fell outside its accepted domain.
///
/// Raised before any prompt is built, so a rejected request never reaches
/// the completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Year level outside 1-6.
    #[error("year_level must be between 1 and 6, got {value}")]
    YearLevelOutOfRange {
        /// The rejected value.
        value: i64,
    },

    /// Unrecognised difficulty name.
    #[error("unknown difficulty '{value}': expected one of 'easy', 'medium', 'hard'")]
    UnknownDifficulty {
        /// The rejected value.
        value: String,
    },

    /// Unrecognised question type name.
    #[error("unknown question_type '{value}': expected one of 'multiple_choice', 'numerical', 'comparison', 'problem_solving'")]
    UnknownQuestionType {
        /// The rejected value.
        value: String,
    },

    /// Unrecognised topic name.
    #[error("unknown topic '{value}': expected one of 'arithmetic', 'algebra', 'geometry'")]
    UnknownTopic {
        /// The rejected value.
        value: String,
    },

    /// Question count is zero or negative.
    #[error("num_questions must be a positive integer, got {value}")]
    InvalidQuestionCount {
        /// The rejected value.
        value: i64,
    },
}

impl ValidationError {
    /// Returns the name of the request field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::YearLevelOutOfRange { .. } => "year_level",
            Self::UnknownDifficulty { .. } => "difficulty",
            Self::UnknownQuestionType { .. } => "question_type",
            Self::UnknownTopic { .. } => "topic",
            Self::InvalidQuestionCount { .. } => "num_questions",
        }
    }
}

/// Why a single question block was dropped by the parser.
///
/// These never abort a batch; they are reported alongside the parsed
/// questions and logged as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockError {
    /// No non-empty `Q:` line (and no comparison quantities to build one from).
    #[error("block has no question text")]
    MissingQuestion,

    /// No non-empty `Answer:` line.
    #[error("block has no answer")]
    MissingAnswer,
}
