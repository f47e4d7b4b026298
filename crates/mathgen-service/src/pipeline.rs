//! Question generation pipeline.
//!
//! One run is validate -> build prompt -> one completion call -> parse.
//! The pipeline holds no mutable state, so a single instance can serve any
//! number of concurrent requests.

use std::sync::Arc;

use mathgen_client::CompletionClient;
use mathgen_core::{GenerateRequest, PromptBuilder, QuestionBatch, QuestionRequest, ResponseParser};
use tracing::{debug, info};

use crate::error::Result;

/// Generates question batches through an injected completion client.
#[derive(Clone)]
pub struct Pipeline {
    client: Arc<dyn CompletionClient>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline around a completion client.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Runs one generation.
    ///
    /// An empty batch is a successful outcome; callers must not assume
    /// `count == num_questions`.
    ///
    /// # Errors
    ///
    /// Returns `MathGenError::Validation` without touching the network when
    /// the request is out of range, and `MathGenError::Completion` when the
    /// completion call fails.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<QuestionBatch> {
        let request = QuestionRequest::try_from(request)?;
        self.generate_validated(&request).await
    }

    /// Runs one generation for an already validated request.
    ///
    /// # Errors
    ///
    /// Returns `MathGenError::Completion` when the completion call fails.
    pub async fn generate_validated(&self, request: &QuestionRequest) -> Result<QuestionBatch> {
        info!(
            year_level = request.year_level.get(),
            difficulty = %request.difficulty,
            question_type = %request.question_type,
            topic = %request.topic,
            num_questions = request.num_questions,
            "Generating questions"
        );

        let prompt = PromptBuilder::build(request);
        let raw = self.client.complete(&prompt.system, &prompt.user).await?;
        debug!(completion_len = raw.len(), "Completion received");

        let report = ResponseParser::parse_report(&raw, request.question_type);
        info!(
            parsed = report.questions.len(),
            skipped = report.skipped.len(),
            requested = request.num_questions,
            "Questions parsed"
        );

        Ok(QuestionBatch::from(report.questions))
    }
}
