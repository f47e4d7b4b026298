//! Error types for the question generation service.
//!
//! Every failure of a pipeline run is reported as a single [`MathGenError`]
//! carrying a human-readable cause. Configuration errors carry a suggestion
//! line, as do completion errors through [`ClientError`].

use std::path::PathBuf;

use mathgen_client::ClientError;
use mathgen_core::ValidationError;

/// A specialized `Result` type for service operations.
pub type Result<T> = std::result::Result<T, MathGenError>;

/// Errors that can occur while loading configuration or generating questions.
#[derive(Debug, thiserror::Error)]
pub enum MathGenError {
    // ========================================================================
    // Request Errors
    // ========================================================================
    /// The request was rejected before any prompt was built.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    // ========================================================================
    // Completion Errors
    // ========================================================================
    /// The completion call failed or returned no usable content.
    #[error(transparent)]
    Completion(#[from] ClientError),

    /// The caller-level deadline elapsed before the completion returned.
    #[error("Question generation timed out after {timeout_secs}s\n\nSuggestion: Request fewer questions or raise 'timeout' in mathgen.json")]
    Timeout {
        /// The deadline in seconds.
        timeout_secs: u64,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax or values in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your mathgen.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MathGenError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub const fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Returns `true` if the caller sent a request that can never succeed.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if the failure came from the completion provider.
    #[must_use]
    pub const fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::Completion(
                ClientError::Provider { .. }
                    | ClientError::Transport(_)
                    | ClientError::MalformedCompletion(_)
            )
        )
    }
}
