//! Fetch error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for acquiring and extracting a rate snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-200 status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Endpoint answered with an empty body.
    #[error("Empty response body")]
    EmptyBody,

    /// Relay payload was JSON but carried no recognised page field.
    #[error("Malformed relay envelope: {0}")]
    MalformedEnvelope(String),

    /// A configured URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every channel failed to produce a usable body.
    #[error(
        "All channels exhausted [{}]; configure a relay/proxy or check network connectivity",
        .attempts.join("; ")
    )]
    TransportExhausted {
        /// One entry per attempted channel, `"<id>: <reason>"`.
        attempts: Vec<String>,
        /// Last HTTP status observed across the attempts.
        status: Option<u16>,
    },

    /// Markup was fetched but no rates could be extracted from it.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(#[from] ExtractionFailure),
}

/// Why extraction produced no quotes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// No data row was found anywhere in the markup.
    #[error("page structure did not match any known rate table pattern")]
    UnrecognizedLayout,

    /// Data rows exist but none belong to the target currencies.
    #[error("found {rows} rate rows but none for the target currencies")]
    NoTargetCurrencies { rows: usize },
}

impl FetchError {
    /// HTTP status associated with the failure, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            FetchError::Status(code) => Some(*code),
            FetchError::TransportExhausted { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, FetchError::TransportExhausted { .. })
    }

    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, FetchError::ExtractionFailed(_))
    }
}

/// Error object delivered to callers in place of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl From<&FetchError> for AppError {
    fn from(err: &FetchError) -> Self {
        AppError {
            message: err.to_string(),
            code: err.status_code(),
        }
    }
}
