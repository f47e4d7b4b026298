//! Mathgen Core
//!
//! Request model, prompt construction and completion parsing for generating
//! elementary maths questions with a hosted language model.
//!
//! Nothing in this crate performs I/O. A request flows through it as:
//!
//! 1. [`GenerateRequest`] -> [`QuestionRequest`] (validation)
//! 2. [`QuestionRequest`] -> [`Prompt`] via [`PromptBuilder`]
//! 3. raw completion text -> [`Question`]s via [`ResponseParser`]
//!
//! # Example
//!
//! ```rust
//! use mathgen_core::{GenerateRequest, PromptBuilder, QuestionRequest, ResponseParser};
//!
//! let request = GenerateRequest {
//!     year_level: 3,
//!     difficulty: "easy".to_string(),
//!     question_type: "numerical".to_string(),
//!     topic: "arithmetic".to_string(),
//!     num_questions: 1,
//! };
//! let request = QuestionRequest::try_from(&request).unwrap();
//! let prompt = PromptBuilder::build(&request);
//! assert!(prompt.user.contains("Create exactly 1 questions"));
//!
//! let questions = ResponseParser::parse("Q: 2 + 2?\nAnswer: 4\n---", request.question_type);
//! assert_eq!(questions[0].correct_answer, "4");
//! ```

pub mod error;
pub mod grammar;
pub mod parser;
pub mod prompt;
pub mod question;
pub mod request;

pub use error::{BlockError, Result, ValidationError};
pub use grammar::{OutputGrammar, BLOCK_SEPARATOR};
pub use parser::{ParseReport, ResponseParser, SkippedBlock};
pub use prompt::{Prompt, PromptBuilder, SYSTEM_INSTRUCTION};
pub use question::{Question, QuestionBatch, COMPARISON_OPTIONS};
pub use request::{
    Difficulty, GenerateRequest, QuestionRequest, QuestionType, Topic, YearLevel,
    DEFAULT_NUM_QUESTIONS,
};
