//! Prompt construction.
//!
//! Turns a validated [`QuestionRequest`] into the system and user messages
//! sent to the completion provider. Building a prompt is a pure function of
//! the request.

use std::fmt::Write as _;

use crate::grammar::{OutputGrammar, BLOCK_SEPARATOR};
use crate::request::QuestionRequest;

/// Persona given to the model for every request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert elementary school math teacher \
creating educational questions for students. Always follow the exact format requested. \
Generate accurate, age-appropriate questions.";

/// The two messages of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Fixed system instruction.
    pub system: String,
    /// Request-specific user prompt.
    pub user: String,
}

/// Builds prompts from question requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Builds the system instruction and user prompt for a request.
    #[must_use]
    pub fn build(request: &QuestionRequest) -> Prompt {
        Prompt {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: Self::user_prompt(request),
        }
    }

    fn user_prompt(request: &QuestionRequest) -> String {
        let count = request.num_questions;
        let (age_from, age_to) = request.year_level.age_range();
        let grammar = OutputGrammar::for_type(request.question_type);
        let mut out = String::new();

        let _ = writeln!(
            out,
            "You are a math teacher creating {count} {} questions for {} students (ages {age_from}-{age_to}).",
            request.question_type.description(),
            request.year_level,
        );
        out.push('\n');
        let _ = writeln!(
            out,
            "DIFFICULTY: {} ({})",
            request.difficulty.label(),
            request.difficulty
        );
        let _ = writeln!(
            out,
            "TOPIC FOCUS: {} - {}",
            request.topic,
            request.topic.focus()
        );
        let _ = writeln!(out, "CURRICULUM: {}", request.year_level.curriculum());
        let _ = writeln!(out, "QUESTION TYPE: {}", request.question_type);
        out.push('\n');

        let _ = writeln!(
            out,
            "Create exactly {count} questions. Each question MUST follow this EXACT format:"
        );
        out.push('\n');
        out.push_str(&grammar.template());
        out.push_str("\n\n");

        out.push_str("REQUIREMENTS:\n");
        for requirement in grammar.requirements() {
            let _ = writeln!(out, "- {requirement}");
        }
        let _ = writeln!(
            out,
            "- End every question, including the last one, with a line containing only {BLOCK_SEPARATOR}"
        );
        out.push('\n');

        let _ = write!(
            out,
            "Generate exactly {count} questions following this format precisely."
        );
        out
    }
}
