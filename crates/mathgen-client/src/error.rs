//! Error types for completion calls.

use thiserror::Error;

/// A specialized `Result` type for completion calls.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while obtaining a completion.
///
/// Every variant is fatal for the call that produced it; the client never
/// retries.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key in the process environment.
    #[error("API key not configured: environment variable '{var}' is missing or empty\n\nSuggestion: export {var}=<key> or add it to a .env file")]
    MissingApiKey {
        /// Name of the environment variable that was read.
        var: String,
    },

    /// The provider answered with a non-success status.
    ///
    /// `body` is the provider's response text, unmodified.
    #[error("completion provider error ({kind}, HTTP {status}): {body}\n\nSuggestion: {}", .kind.suggestion())]
    Provider {
        /// Classification of the status code.
        kind: ProviderErrorKind,
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the provider.
        body: String,
    },

    /// The request never produced an HTTP response.
    #[error("completion request failed: {0}\n\nSuggestion: {}", ProviderErrorKind::Network.suggestion())]
    Transport(#[from] reqwest::Error),

    /// The provider answered 2xx but without `choices[0].message.content`.
    #[error("malformed completion response: {0}")]
    MalformedCompletion(String),
}

/// Categories of provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Invalid, missing or expired API key.
    Authentication,
    /// Rate limit or quota exceeded.
    RateLimit,
    /// The request itself was rejected.
    BadRequest,
    /// 5xx from the provider.
    Server,
    /// Connection or timeout failure before any response.
    Network,
    /// Anything else.
    Other,
}

impl ProviderErrorKind {
    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimit,
            400..=499 => Self::BadRequest,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }

    /// Returns a suggestion message for this error kind.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::Authentication => "Check the provider API key",
            Self::RateLimit => "Wait before retrying, or request fewer questions",
            Self::BadRequest => "Check the configured model name and token limits",
            Self::Server => "Retry later; the provider may be experiencing issues",
            Self::Network => "Check your network connection and the configured base URL",
            Self::Other => "Check the provider's status page",
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::RateLimit => write!(f, "rate_limit"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Server => write!(f, "server"),
            Self::Network => write!(f, "network"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl ClientError {
    /// Creates a `MissingApiKey` error.
    #[must_use]
    pub fn missing_api_key(var: impl Into<String>) -> Self {
        Self::MissingApiKey { var: var.into() }
    }

    /// Creates a `Provider` error, classifying the status code.
    #[must_use]
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            kind: ProviderErrorKind::from_status(status),
            status,
            body: body.into(),
        }
    }

    /// Creates a `MalformedCompletion` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCompletion(message.into())
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::MissingApiKey { .. } => ProviderErrorKind::Authentication,
            Self::Provider { kind, .. } => *kind,
            Self::Transport(_) => ProviderErrorKind::Network,
            Self::MalformedCompletion(_) => ProviderErrorKind::Other,
        }
    }
}
