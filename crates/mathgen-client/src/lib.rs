//! Mathgen Client
//!
//! Chat-completion access for question generation. The [`CompletionClient`]
//! trait is the seam between the generation pipeline and the network;
//! [`ChatCompletionClient`] implements it for OpenAI-compatible providers.

pub mod error;
pub mod http;
pub mod provider;

use async_trait::async_trait;

pub use error::{ClientError, ProviderErrorKind, Result};
pub use http::{extract_content, ChatCompletionClient};
pub use provider::{Provider, ProviderSettings, DEFAULT_TEMPERATURE};

/// Sends one system + user message pair and returns the model's reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Requests a single completion.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Provider`] on a non-success status,
    /// [`ClientError::Transport`] when no response was received, and
    /// [`ClientError::MalformedCompletion`] when the reply has no content.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
