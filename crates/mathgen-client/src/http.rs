//! reqwest-backed chat-completion client.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::provider::ProviderSettings;
use crate::CompletionClient;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
///
/// One POST per call, no retries.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    http: Client,
    settings: ProviderSettings,
    endpoint: String,
}

impl ChatCompletionClient {
    /// Creates a client with a default `reqwest::Client`.
    #[must_use]
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_http_client(Client::new(), settings)
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(http: Client, settings: ProviderSettings) -> Self {
        let endpoint = settings.endpoint();
        Self {
            http,
            settings,
            endpoint,
        }
    }

    /// The settings this client was built with.
    #[must_use]
    pub const fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// The chat-completions URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let start = Instant::now();
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            model = %self.settings.model,
            endpoint = %self.endpoint,
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion provider returned an error");
            return Err(ClientError::provider(status.as_u16(), text));
        }

        let content = extract_content(&text)?;
        debug!(
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            content_len = content.len(),
            "Received chat completion"
        );
        Ok(content)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completion response body.
pub fn extract_content(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClientError::malformed(format!("response is not JSON: {e}")))?;

    value["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| ClientError::malformed("missing choices[0].message.content"))
}
