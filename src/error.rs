//! Error type for the exchange client.

use thiserror::Error;

/// Everything that can go wrong during a submission.
///
/// The user only ever sees two notices: one for [`ExchangeError::MissingSelection`]
/// and a generic one for everything else.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Submit was attempted with no image selected.
    #[error("no image selected")]
    MissingSelection,

    /// The upload request could not be assembled.
    #[error("failed to build request for {url}: {reason}")]
    Request { url: String, reason: String },

    /// The request never got a response (connect, send or body read failed).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the contract.
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// A data URI result could not be turned back into bytes.
    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExchangeError {
    /// True for every failure that happened after the request was attempted.
    pub fn is_exchange_failure(&self) -> bool {
        matches!(
            self,
            ExchangeError::Request { .. }
                | ExchangeError::Transport { .. }
                | ExchangeError::Status { .. }
                | ExchangeError::Decode { .. }
        )
    }
}

/// Result type alias for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
