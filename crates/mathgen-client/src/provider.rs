//! Provider presets and connection settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Sampling temperature used for question generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// OpenAI-compatible chat-completion providers with known presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    /// DeepSeek (default).
    #[default]
    DeepSeek,
    /// Groq.
    Groq,
}

impl Provider {
    /// Lowercase provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Groq => "groq",
        }
    }

    /// API base URL, without the `/chat/completions` suffix.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::DeepSeek => "https://api.deepseek.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Model used unless configured otherwise.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek-chat",
            Self::Groq => "llama3-8b-8192",
        }
    }

    /// Environment variable holding the API key.
    #[must_use]
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::Groq => "GROQ_API_KEY",
        }
    }

    /// Output-token ceiling, sized for a full batch of questions.
    #[must_use]
    pub const fn default_max_tokens(self) -> u32 {
        match self {
            Self::DeepSeek => 3000,
            Self::Groq => 4000,
        }
    }

    /// Parses a provider name, case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Some(Self::DeepSeek),
            "groq" => Some(Self::Groq),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s)
            .ok_or_else(|| format!("invalid provider '{s}': expected one of 'deepseek', 'groq'"))
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Everything needed to talk to one chat-completion endpoint.
///
/// Built once at start-up and handed to the client; never read from global
/// state.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Bearer token.
    pub api_key: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output-token ceiling.
    pub max_tokens: u32,
}

impl ProviderSettings {
    /// Settings for a provider preset with an explicit key.
    #[must_use]
    pub fn for_provider(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            base_url: provider.base_url().to_string(),
            model: provider.default_model().to_string(),
            api_key: api_key.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: provider.default_max_tokens(),
        }
    }

    /// Settings for a provider preset, reading the key from the provider's
    /// environment variable.
    pub fn from_env(provider: Provider) -> Result<Self> {
        Self::from_env_var(provider, provider.api_key_env())
    }

    /// Settings for a provider preset, reading the key from `var`.
    pub fn from_env_var(provider: Provider, var: &str) -> Result<Self> {
        let api_key = read_api_key(var)?;
        Ok(Self::for_provider(provider, api_key))
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Overrides the output-token ceiling.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Full URL of the chat-completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

fn read_api_key(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ClientError::missing_api_key(var)),
    }
}
