use std::result;

use thiserror::Error;

/// Error types for PubMed paper fetching
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Invalid query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Search limit exceeded
    /// This error is returned when the configured result cap is larger than ESearch can return.
    #[error("Search limit exceeded: requested {requested}, maximum is {maximum}")]
    SearchLimitExceeded { requested: usize, maximum: usize },
}

pub type Result<T> = result::Result<T, PubMedError>;

impl PubMedError {
    /// Whether the error came from talking to NCBI rather than from the content it returned.
    ///
    /// Transport failures are folded into [`crate::FetchOutcome`]; everything else
    /// (malformed JSON or XML, invalid input) is propagated to the caller.
    pub fn is_transport_failure(&self) -> bool {
        match self {
            PubMedError::RequestError(err) => !err.is_builder(),
            PubMedError::ApiError { .. } => true,
            PubMedError::JsonError(_)
            | PubMedError::XmlError(_)
            | PubMedError::InvalidQuery(_)
            | PubMedError::SearchLimitExceeded { .. } => false,
        }
    }

    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PubMedError::RequestError(err) => err.status().map(|s| s.as_u16()),
            PubMedError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
