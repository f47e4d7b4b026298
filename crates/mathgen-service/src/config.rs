//! Configuration for the question generation service.
//!
//! Loaded from `mathgen.json`. Every field is optional; provider-dependent
//! fields left unset fall back to the selected provider's preset. The API
//! key itself is never stored here, only the name of the environment
//! variable to read it from.

use std::path::Path;
use std::time::Duration;

use mathgen_client::{Provider, ProviderSettings, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};

use crate::error::{MathGenError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "mathgen.json";

/// Default caller-level deadline for one generation, in seconds.
const fn default_timeout() -> u64 {
    120
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Main configuration for the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Completion provider preset.
    #[serde(default)]
    pub provider: Provider,

    /// Model override; the provider's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Base URL override; the provider's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding the API key; the provider's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-token ceiling override; the provider's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Deadline for one generation in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            base_url: None,
            api_key_env: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout: default_timeout(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `mathgen.json` in the current directory and returns the
    /// default configuration when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            MathGenError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `mathgen.json` from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `MathGenError::ConfigParseError` if the file cannot be read or
    /// contains invalid JSON, and `MathGenError::ConfigValidationError` if
    /// the values are out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(MathGenError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| MathGenError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `MathGenError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(MathGenError::config_validation(
                format!("temperature must be between 0 and 2, got {}", self.temperature),
                "Set temperature to 0.7 in your mathgen.json",
            ));
        }

        if self.max_tokens == Some(0) {
            return Err(MathGenError::config_validation(
                "maxTokens must be greater than 0",
                "Remove maxTokens from your mathgen.json to use the provider default",
            ));
        }

        if self.timeout == 0 {
            return Err(MathGenError::config_validation(
                "timeout must be greater than 0",
                "Set timeout to at least 1 second in your mathgen.json",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(MathGenError::config_validation(
                "host must not be empty",
                "Set host to \"0.0.0.0\" or \"127.0.0.1\" in your mathgen.json",
            ));
        }

        for (field, value) in [
            ("model", &self.model),
            ("baseUrl", &self.base_url),
            ("apiKeyEnv", &self.api_key_env),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(MathGenError::config_validation(
                    format!("{field} must not be empty"),
                    format!("Remove {field} from your mathgen.json to use the provider default"),
                ));
            }
        }

        Ok(())
    }

    /// Name of the environment variable the API key is read from.
    #[must_use]
    pub fn api_key_var(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.api_key_env())
    }

    /// Caller-level deadline for one generation.
    #[must_use]
    pub const fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Resolves provider settings with an explicit API key.
    #[must_use]
    pub fn provider_settings_with_key(&self, api_key: impl Into<String>) -> ProviderSettings {
        let mut settings = ProviderSettings::for_provider(self.provider, api_key)
            .with_temperature(self.temperature);
        if let Some(model) = &self.model {
            settings = settings.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            settings = settings.with_base_url(base_url.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            settings = settings.with_max_tokens(max_tokens);
        }
        settings
    }

    /// Resolves provider settings, reading the API key from the environment.
    ///
    /// # Errors
    ///
    /// Returns `MathGenError::Completion` wrapping `ClientError::MissingApiKey`
    /// if the variable is unset or blank.
    pub fn provider_settings(&self) -> Result<ProviderSettings> {
        let from_env = ProviderSettings::from_env_var(self.provider, self.api_key_var())?;
        Ok(self.provider_settings_with_key(from_env.api_key))
    }
}
