//! Structured question records produced by the parser.

use serde::{Deserialize, Serialize};

use crate::request::QuestionType;

/// The four fixed choices attached to every comparison question.
pub const COMPARISON_OPTIONS: [&str; 4] = [
    "A) Quantity A is greater",
    "B) Quantity B is greater",
    "C) They are equal",
    "D) Cannot be determined",
];

/// A single generated question.
///
/// Only emitted when both `question` and `correct_answer` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text.
    pub question: String,
    /// Lettered options `A)` to `D)`, in order. `None` for free-answer types.
    pub options: Option<Vec<String>>,
    /// Option letter for choice types, otherwise the expected value.
    pub correct_answer: String,
    /// Worked explanation; may be empty.
    pub explanation: String,
    /// Type of the request that produced this question.
    pub question_type: QuestionType,
}

impl Question {
    /// Returns the comparison choices as owned strings.
    #[must_use]
    pub fn comparison_options() -> Vec<String> {
        COMPARISON_OPTIONS.iter().map(ToString::to_string).collect()
    }
}

/// Questions returned from one pipeline run.
///
/// `count` can be lower than the number requested when the model produced
/// fewer blocks or some were malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBatch {
    /// Parsed questions in the order the model produced them.
    pub questions: Vec<Question>,
    /// Number of entries in `questions`.
    pub count: usize,
}

impl From<Vec<Question>> for QuestionBatch {
    fn from(questions: Vec<Question>) -> Self {
        let count = questions.len();
        Self { questions, count }
    }
}
