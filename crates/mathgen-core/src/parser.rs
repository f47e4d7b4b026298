//! Extraction of structured questions from raw completion text.
//!
//! The completion is split into blocks on [`BLOCK_SEPARATOR`]. Each block is
//! read line by line through an ordered table of prefix matchers, each of
//! which either recognises the line as one [`Field`] or passes. Lines no
//! matcher claims are ignored.
//!
//! A block that ends up without question text or an answer is dropped and
//! reported as a [`SkippedBlock`]; the rest of the batch is unaffected.

use tracing::{debug, warn};

use crate::error::BlockError;
use crate::grammar::{
    ANSWER_PREFIX, BLOCK_SEPARATOR, EXPLANATION_PREFIX, OPTION_LABELS, QUANTITY_A_PREFIX,
    QUANTITY_B_PREFIX, QUESTION_PREFIX,
};
use crate::question::Question;
use crate::request::QuestionType;

/// Result of parsing one completion, including the blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Well-formed questions, in block order.
    pub questions: Vec<Question>,
    /// Blocks that could not be turned into a question.
    pub skipped: Vec<SkippedBlock>,
}

/// A dropped block and the reason it was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Zero-based position among the non-empty blocks of the completion.
    pub index: usize,
    /// What was missing.
    pub reason: BlockError,
}

/// Parses completions written in the [`crate::grammar`] format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a completion into questions, silently dropping malformed blocks.
    #[must_use]
    pub fn parse(raw: &str, question_type: QuestionType) -> Vec<Question> {
        Self::parse_report(raw, question_type).questions
    }

    /// Parses a completion and reports which blocks were dropped.
    #[must_use]
    pub fn parse_report(raw: &str, question_type: QuestionType) -> ParseReport {
        let mut report = ParseReport::default();

        for (index, block) in split_blocks(raw).enumerate() {
            match parse_block(block, question_type) {
                Ok(question) => report.questions.push(question),
                Err(reason) => {
                    warn!(
                        block_index = index,
                        question_type = %question_type,
                        reason = %reason,
                        "Skipping malformed question block"
                    );
                    report.skipped.push(SkippedBlock { index, reason });
                }
            }
        }

        debug!(
            parsed = report.questions.len(),
            skipped = report.skipped.len(),
            "Parsed completion"
        );
        report
    }
}

/// Splits raw text on the separator, dropping blocks that are only whitespace.
fn split_blocks(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(BLOCK_SEPARATOR)
        .map(str::trim)
        .filter(|block| !block.is_empty())
}

// ============================================================================
// Line Classification
// ============================================================================

/// A recognised line within a question block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field<'a> {
    Question(&'a str),
    Choice { slot: usize, line: &'a str },
    QuantityA(&'a str),
    QuantityB(&'a str),
    Answer(&'a str),
    Explanation(&'a str),
}

type LineMatcher = for<'a> fn(&'a str, QuestionType) -> Option<Field<'a>>;

/// Matchers are tried in order; the first hit classifies the line.
const LINE_MATCHERS: &[LineMatcher] = &[
    match_question,
    match_choice,
    match_quantity_a,
    match_quantity_b,
    match_answer,
    match_explanation,
];

fn classify(line: &str, question_type: QuestionType) -> Option<Field<'_>> {
    LINE_MATCHERS
        .iter()
        .find_map(|matcher| matcher(line, question_type))
}

fn strip<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix).map(str::trim)
}

fn match_question(line: &str, _: QuestionType) -> Option<Field<'_>> {
    strip(line, QUESTION_PREFIX).map(Field::Question)
}

/// `A)` to `D)` lines. Only multiple-choice blocks take options from text;
/// comparison blocks always get the canonical set.
fn match_choice(line: &str, question_type: QuestionType) -> Option<Field<'_>> {
    if question_type != QuestionType::MultipleChoice {
        return None;
    }

    let mut chars = line.chars();
    let label = chars.next()?;
    if chars.next()? != ')' {
        return None;
    }

    OPTION_LABELS
        .iter()
        .position(|candidate| *candidate == label)
        .map(|slot| Field::Choice { slot, line })
}

fn match_quantity_a(line: &str, question_type: QuestionType) -> Option<Field<'_>> {
    if question_type != QuestionType::Comparison {
        return None;
    }
    strip(line, QUANTITY_A_PREFIX).map(Field::QuantityA)
}

fn match_quantity_b(line: &str, question_type: QuestionType) -> Option<Field<'_>> {
    if question_type != QuestionType::Comparison {
        return None;
    }
    strip(line, QUANTITY_B_PREFIX).map(Field::QuantityB)
}

fn match_answer(line: &str, _: QuestionType) -> Option<Field<'_>> {
    strip(line, ANSWER_PREFIX).map(Field::Answer)
}

fn match_explanation(line: &str, _: QuestionType) -> Option<Field<'_>> {
    strip(line, EXPLANATION_PREFIX).map(Field::Explanation)
}

// ============================================================================
// Block Assembly
// ============================================================================

/// Fields collected while walking a block. Repeated lines overwrite earlier ones.
#[derive(Debug, Default)]
struct BlockFields<'a> {
    question: &'a str,
    choices: [Option<&'a str>; 4],
    quantity_a: &'a str,
    quantity_b: &'a str,
    answer: &'a str,
    explanation: &'a str,
}

impl<'a> BlockFields<'a> {
    fn apply(&mut self, field: Field<'a>) {
        match field {
            Field::Question(text) => self.question = text,
            Field::Choice { slot, line } => self.choices[slot] = Some(line),
            Field::QuantityA(text) => self.quantity_a = text,
            Field::QuantityB(text) => self.quantity_b = text,
            Field::Answer(text) => self.answer = text,
            Field::Explanation(text) => self.explanation = text,
        }
    }

    /// All four options in label order, or `None` if any is missing.
    fn complete_choices(&self) -> Option<Vec<String>> {
        self.choices
            .iter()
            .copied()
            .map(|choice| choice.map(String::from))
            .collect()
    }

    fn into_question(self, question_type: QuestionType) -> Result<Question, BlockError> {
        let question = if question_type == QuestionType::Comparison
            && !self.quantity_a.is_empty()
            && !self.quantity_b.is_empty()
        {
            comparison_text(self.quantity_a, self.quantity_b)
        } else {
            self.question.to_string()
        };

        let options = if !question_type.has_options() {
            None
        } else if question_type == QuestionType::Comparison {
            Some(Question::comparison_options())
        } else {
            let options = self.complete_choices();
            if options.is_none() {
                debug!(
                    found = self.choices.iter().flatten().count(),
                    "Multiple-choice block without a full A-D option set"
                );
            }
            options
        };

        if question.is_empty() {
            return Err(BlockError::MissingQuestion);
        }
        if self.answer.is_empty() {
            return Err(BlockError::MissingAnswer);
        }

        Ok(Question {
            question,
            options,
            correct_answer: self.answer.to_string(),
            explanation: self.explanation.to_string(),
            question_type,
        })
    }
}

fn comparison_text(quantity_a: &str, quantity_b: &str) -> String {
    format!(
        "Compare Quantity A and Quantity B. Quantity A: {}. Quantity B: {}.",
        quantity_a.strip_suffix('.').unwrap_or(quantity_a),
        quantity_b.strip_suffix('.').unwrap_or(quantity_b)
    )
}

fn parse_block(block: &str, question_type: QuestionType) -> Result<Question, BlockError> {
    let mut fields = BlockFields::default();

    for line in block.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(field) = classify(line, question_type) {
            fields.apply(field);
        }
    }

    fields.into_question(question_type)
}
