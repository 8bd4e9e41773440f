//! Error types for searching, the retry pipeline and the collaborators

use thiserror::Error;

/// Failure of a single search attempt for one term
///
/// Always recovered by the retry pipeline; never aborts a run.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("CAPTCHA detected")]
    Captcha,

    #[error("expected page element not found: {0}")]
    MissingElement(&'static str),

    #[error("rate limited (HTTP 429)")]
    RateLimited,
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if let Some(status) = err.status() {
            SearchError::Http(status.as_u16())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

/// Malformed pipeline invocation, rejected before any search attempt
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("max_retries must be >= 0, got {0}")]
    NegativeRetries(i32),

    #[error("at least one search term is required")]
    NoTerms,
}

/// A collaborator of the workflow (export, filter, summarizer, distribution,
/// archival) could not do its job
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{collaborator}: I/O error: {source}")]
    Io {
        collaborator: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{collaborator}: CSV error: {source}")]
    Csv {
        collaborator: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{collaborator}: {message}")]
    Unavailable {
        collaborator: &'static str,
        message: String,
    },

    #[error("{collaborator}: API error (status {status}): {message}")]
    Api {
        collaborator: &'static str,
        status: u16,
        message: String,
    },
}

impl CollaboratorError {
    pub fn io(collaborator: &'static str, source: std::io::Error) -> Self {
        Self::Io {
            collaborator,
            source,
        }
    }

    pub fn csv(collaborator: &'static str, source: csv::Error) -> Self {
        Self::Csv {
            collaborator,
            source,
        }
    }

    pub fn unavailable(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator,
            message: message.into(),
        }
    }
}

pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;
