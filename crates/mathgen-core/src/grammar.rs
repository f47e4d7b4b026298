//! The line-oriented output grammar shared by the prompt and the parser.
//!
//! Every question block the model writes is a handful of prefixed lines
//! followed by a separator line. Both sides of the exchange read their
//! prefixes from here, so adding a question type means touching this module,
//! the prompt requirements and one matcher in the parser.

use std::fmt::Write as _;

use crate::question::COMPARISON_OPTIONS;
use crate::request::QuestionType;

/// Line that terminates every question block.
pub const BLOCK_SEPARATOR: &str = "---";

/// Prefix of the question text line.
pub const QUESTION_PREFIX: &str = "Q:";

/// Prefix of the first comparison quantity.
pub const QUANTITY_A_PREFIX: &str = "Quantity A:";

/// Prefix of the second comparison quantity.
pub const QUANTITY_B_PREFIX: &str = "Quantity B:";

/// Prefix of the answer line.
pub const ANSWER_PREFIX: &str = "Answer:";

/// Prefix of the explanation line.
pub const EXPLANATION_PREFIX: &str = "Explanation:";

/// Option letters, in the order they must appear.
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Requirements appended for every question type.
const COMMON_REQUIREMENTS: &[&str] = &[
    "Use age-appropriate language and concepts",
    "Make questions clear and unambiguous",
    "Ensure all answers are mathematically correct",
];

/// The exact block layout the model is told to reproduce for one question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputGrammar {
    question_type: QuestionType,
}

impl OutputGrammar {
    /// Returns the grammar for a question type.
    #[must_use]
    pub const fn for_type(question_type: QuestionType) -> Self {
        Self { question_type }
    }

    /// Renders one example block, ending with the separator line.
    #[must_use]
    pub fn template(&self) -> String {
        let mut out = String::new();

        match self.question_type {
            QuestionType::MultipleChoice => {
                line(&mut out, QUESTION_PREFIX, "[Clear question text]");
                for (n, label) in OPTION_LABELS.iter().enumerate() {
                    let _ = writeln!(out, "{label}) [option {}]", n + 1);
                }
                line(&mut out, ANSWER_PREFIX, "[A/B/C/D]");
                line(&mut out, EXPLANATION_PREFIX, "[Brief explanation]");
            }
            QuestionType::Numerical => {
                line(
                    &mut out,
                    QUESTION_PREFIX,
                    "[Question requiring a numerical answer]",
                );
                line(&mut out, ANSWER_PREFIX, "[Numerical answer only]");
                line(&mut out, EXPLANATION_PREFIX, "[Step-by-step solution]");
            }
            QuestionType::Comparison => {
                line(
                    &mut out,
                    QUESTION_PREFIX,
                    "Compare Quantity A and Quantity B. Which is greater?",
                );
                line(&mut out, QUANTITY_A_PREFIX, "[value/expression]");
                line(&mut out, QUANTITY_B_PREFIX, "[value/expression]");
                for option in COMPARISON_OPTIONS {
                    out.push_str(option);
                    out.push('\n');
                }
                line(&mut out, ANSWER_PREFIX, "[A/B/C/D]");
                line(&mut out, EXPLANATION_PREFIX, "[Brief explanation]");
            }
            QuestionType::ProblemSolving => {
                line(&mut out, QUESTION_PREFIX, "[Real-world word problem]");
                line(&mut out, ANSWER_PREFIX, "[Answer with units if needed]");
                line(&mut out, EXPLANATION_PREFIX, "[Step-by-step solution]");
            }
        }

        out.push_str(BLOCK_SEPARATOR);
        out
    }

    /// Type-specific requirements, followed by the common ones.
    #[must_use]
    pub fn requirements(&self) -> Vec<&'static str> {
        let specific: &[&str] = match self.question_type {
            QuestionType::MultipleChoice => &[
                "Exactly one option is correct and the other three are plausible",
                "Answer with the option letter only",
                "Mix different problem types within the topic",
            ],
            QuestionType::Numerical => &[
                "Questions should have clear numerical answers",
                "Use age-appropriate contexts (toys, sweets, animals, etc.)",
                "Show working steps in explanations",
            ],
            QuestionType::Comparison => &[
                "Quantity A and Quantity B must each be a single value or expression",
                "Always list the four choices exactly as shown",
                "Answer with the option letter only",
            ],
            QuestionType::ProblemSolving => &[
                "Use engaging real-world scenarios (school, home, playground, shopping)",
                "Include appropriate units where needed",
                "Show clear solution steps",
            ],
        };

        specific
            .iter()
            .chain(COMMON_REQUIREMENTS)
            .copied()
            .collect()
    }
}

fn line(out: &mut String, prefix: &str, placeholder: &str) {
    let _ = writeln!(out, "{prefix} {placeholder}");
}
