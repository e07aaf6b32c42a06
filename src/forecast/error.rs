use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request did not produce a successful response (network, status, timeout).
    Transport,
    /// A response arrived but does not have the expected shape or content.
    Schema,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport failure"),
            FailureKind::Schema => write!(f, "schema failure"),
        }
    }
}

/// Why a forecast fetch failed. Any of these fails the whole fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("No response from {url} within {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Failed to parse forecast response")]
    JsonParse(#[from] serde_json::Error),

    #[error("Expected a JSON object or array of objects, got {found}")]
    UnexpectedShape { found: &'static str },

    #[error("Malformed forecast for point {point}")]
    InvalidPoint {
        point: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected forecasts for {expected} points, got {found}")]
    PointCountMismatch { expected: usize, found: usize },

    #[error("Missing field '{field}' for point {point}")]
    MissingField { point: String, field: &'static str },

    #[error("Point {point} has {times} timestamps but {temperatures} temperatures")]
    LengthMismatch {
        point: String,
        times: usize,
        temperatures: usize,
    },

    #[error("Point {point} has an unparseable timestamp '{timestamp}'")]
    MalformedTimestamp {
        point: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Point {point} has no temperature at {timestamp}")]
    MissingTemperature { point: String, timestamp: String },

    #[error("Point {point} lists timestamp {timestamp} more than once")]
    DuplicateTimestamp { point: String, timestamp: String },
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::NetworkRequest(..)
            | FetchError::HttpStatus { .. }
            | FetchError::Timeout { .. } => FailureKind::Transport,
            FetchError::JsonParse(_)
            | FetchError::UnexpectedShape { .. }
            | FetchError::InvalidPoint { .. }
            | FetchError::PointCountMismatch { .. }
            | FetchError::MissingField { .. }
            | FetchError::LengthMismatch { .. }
            | FetchError::MalformedTimestamp { .. }
            | FetchError::MissingTemperature { .. }
            | FetchError::DuplicateTimestamp { .. } => FailureKind::Schema,
        }
    }

    /// Human-readable cause including the chain of underlying errors.
    pub fn cause(&self) -> String {
        let mut cause = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            cause.push_str(": ");
            cause.push_str(&err.to_string());
            source = err.source();
        }
        cause
    }
}
