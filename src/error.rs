//! Unified error types for the odds scanner.
//!
//! The arbitrage core never fails; everything here belongs to the
//! collaborators around it (configuration, the odds feed, output).

use thiserror::Error;

/// Unified error type for the odds scanner.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Odds feed error.
    #[error("odds feed error: {0}")]
    Fetch(#[from] FetchError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while fetching odds from the upstream API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No API key was supplied.
    #[error("missing odds API key")]
    MissingApiKey,

    /// Upstream answered with a non-success status.
    #[error("request to {endpoint} failed: HTTP {status}")]
    Status {
        /// Endpoint path that failed.
        endpoint: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// Response body could not be parsed.
    #[error("failed to parse odds response: {0}")]
    Parse(String),

    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL is not a valid URL.
    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Whether a fallback to sample data is worth attempting.
    ///
    /// A missing key or bad URL is a caller mistake, not a transient failure.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::MissingApiKey | FetchError::InvalidUrl(_))
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
