//! Question request model and validation.
//!
//! [`GenerateRequest`] is the loose shape callers send over the wire.
//! [`QuestionRequest`] is its validated form; the only way to obtain one from
//! caller input is [`QuestionRequest::try_from`], which rejects anything
//! outside the known curriculum and format mappings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Number of questions requested when the caller does not say.
pub const DEFAULT_NUM_QUESTIONS: u32 = 20;

fn default_num_questions() -> i64 {
    i64::from(DEFAULT_NUM_QUESTIONS)
}

/// Unvalidated question request, as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// School year, expected 1-6.
    pub year_level: i64,
    /// Difficulty name (`easy`, `medium`, `hard`).
    pub difficulty: String,
    /// Question format name.
    pub question_type: String,
    /// Topic name.
    pub topic: String,
    /// How many questions to ask the model for.
    #[serde(default = "default_num_questions")]
    pub num_questions: i64,
}

/// A validated question request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRequest {
    /// School year.
    pub year_level: YearLevel,
    /// Requested difficulty.
    pub difficulty: Difficulty,
    /// Requested output format.
    pub question_type: QuestionType,
    /// Requested topic.
    pub topic: Topic,
    /// Number of questions to ask for. Always at least 1.
    pub num_questions: u32,
}

impl TryFrom<&GenerateRequest> for QuestionRequest {
    type Error = ValidationError;

    fn try_from(request: &GenerateRequest) -> Result<Self> {
        let year_level = YearLevel::new(request.year_level)?;
        let difficulty = request.difficulty.parse()?;
        let question_type = request.question_type.parse()?;
        let topic = request.topic.parse()?;
        let num_questions = u32::try_from(request.num_questions)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ValidationError::InvalidQuestionCount {
                value: request.num_questions,
            })?;

        Ok(Self {
            year_level,
            difficulty,
            question_type,
            topic,
            num_questions,
        })
    }
}

impl TryFrom<GenerateRequest> for QuestionRequest {
    type Error = ValidationError;

    fn try_from(request: GenerateRequest) -> Result<Self> {
        Self::try_from(&request)
    }
}

// ============================================================================
// Year Level
// ============================================================================

/// A primary school year between 1 and 6 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct YearLevel(u8);

impl YearLevel {
    /// Lowest supported year.
    pub const MIN: u8 = 1;
    /// Highest supported year.
    pub const MAX: u8 = 6;

    /// Validates a raw year number.
    pub fn new(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|year| (Self::MIN..=Self::MAX).contains(year))
            .map(Self)
            .ok_or(ValidationError::YearLevelOutOfRange { value })
    }

    /// Returns the year as a number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Typical student age range for this year.
    #[must_use]
    pub const fn age_range(self) -> (u8, u8) {
        (self.0 + 4, self.0 + 5)
    }

    /// Curriculum band describing the maths expected at this year.
    #[must_use]
    pub const fn curriculum(self) -> &'static str {
        match self.0 {
            1 => "Basic counting 1-20, simple addition/subtraction up to 10, basic shapes (circle, square, triangle)",
            2 => "Addition/subtraction up to 100, basic multiplication by 2, 5, 10, simple fractions (halves, quarters)",
            3 => "Multiplication tables 2-12, division, simple fractions, basic measurement (cm, m), time",
            4 => "Larger numbers up to 10,000, decimals (tenths, hundredths), area and perimeter, data interpretation",
            5 => "Advanced fractions, percentages, negative numbers, coordinate geometry, basic statistics",
            _ => "Ratios, algebra basics (simple equations), complex geometry, probability, problem solving",
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Year {}", self.0)
    }
}

// ============================================================================
// Difficulty
// ============================================================================

/// How hard the generated questions should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// Basic questions.
    Easy,
    /// Intermediate questions.
    Medium,
    /// Challenging questions.
    Hard,
}

impl Difficulty {
    /// Wire name of the difficulty.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Qualitative label injected into the prompt.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "basic",
            Self::Medium => "intermediate",
            Self::Hard => "challenging",
        }
    }

    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_case_insensitive(s).ok_or_else(|| ValidationError::UnknownDifficulty {
            value: s.to_string(),
        })
    }
}

// ============================================================================
// Question Type
// ============================================================================

/// Output format of the generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// Four lettered options, single-letter answer.
    MultipleChoice,
    /// Bare numeric answer.
    Numerical,
    /// Quantity A versus Quantity B with fixed options.
    Comparison,
    /// Word problem with a free-form answer.
    ProblemSolving,
}

impl QuestionType {
    /// All question types, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::MultipleChoice,
        Self::Numerical,
        Self::Comparison,
        Self::ProblemSolving,
    ];

    /// Wire name of the question type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::Numerical => "numerical",
            Self::Comparison => "comparison",
            Self::ProblemSolving => "problem_solving",
        }
    }

    /// Human phrasing used in the prompt's opening line.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple choice",
            Self::Numerical => "numerical answer",
            Self::Comparison => "quantitative comparison",
            Self::ProblemSolving => "word problem",
        }
    }

    /// Whether emitted questions carry a lettered option list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Comparison)
    }

    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" => Some(Self::MultipleChoice),
            "numerical" => Some(Self::Numerical),
            "comparison" => Some(Self::Comparison),
            "problem_solving" => Some(Self::ProblemSolving),
            _ => None,
        }
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_case_insensitive(s).ok_or_else(|| ValidationError::UnknownQuestionType {
            value: s.to_string(),
        })
    }
}

// ============================================================================
// Topic
// ============================================================================

/// Mathematical area the questions focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Numbers and operations.
    Arithmetic,
    /// Patterns, equations and variables.
    Algebra,
    /// Shapes, angles and measurement.
    Geometry,
}

impl Topic {
    /// Wire name of the topic.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Algebra => "algebra",
            Self::Geometry => "geometry",
        }
    }

    /// Guideline sentence injected into the prompt.
    #[must_use]
    pub const fn focus(self) -> &'static str {
        match self {
            Self::Arithmetic => "Focus on numbers, calculations, operations",
            Self::Algebra => "Focus on patterns, equations, variables (age-appropriate)",
            Self::Geometry => "Focus on shapes, angles, measurements, spatial reasoning",
        }
    }

    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "arithmetic" => Some(Self::Arithmetic),
            "algebra" => Some(Self::Algebra),
            "geometry" => Some(Self::Geometry),
            _ => None,
        }
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_case_insensitive(s).ok_or_else(|| ValidationError::UnknownTopic {
            value: s.to_string(),
        })
    }
}

// ============================================================================
// Shared string conversions
// ============================================================================

macro_rules! wire_name_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_name_serde!(Difficulty);
wire_name_serde!(QuestionType);
wire_name_serde!(Topic);
