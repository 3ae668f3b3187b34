//! Error types for vestdash-core.
//!
//! These errors describe what went wrong talking to the remote vest API. They
//! are returned by [`crate::ApiClient`]; the dashboard operations never hand
//! them to their caller. Instead each failure is turned into a
//! [`crate::Notice`] on the session's reporter and the operation returns a safe
//! empty value.
//!
//! # Error Classes
//!
//! | Error Type | Meaning | Handling in the dashboard |
//! |------------|---------|---------------------------|
//! | [`Error::Transport`] | Request never got a response | Report, empty result |
//! | [`Error::ClientError`] | 4xx response | Report, empty result; writer tries the next shape |
//! | [`Error::ServerError`] | 5xx response | Report, empty result; recent measurements switch to simulated data on 500 |
//! | [`Error::UnexpectedStatus`] | Any other non-accepted status | Report, empty result |
//! | [`Error::Decode`] | 200 response with a body that is not the expected JSON | Report, empty result |
//! | [`Error::InvalidUrl`] | Bad base URL | Returned from [`crate::ApiClient::new`] |
//!
//! Malformed timestamps and values inside measurement records are not errors:
//! the normalizer substitutes defaults for them.

use thiserror::Error;

/// Errors that can occur when talking to the vest API.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request could not be sent or no response arrived.
    #[error("API not reachable at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API rejected the request (4xx).
    #[error("API rejected request to {url} with status {status}: {message}")]
    ClientError {
        url: String,
        status: u16,
        message: String,
    },

    /// The API failed to handle the request (5xx).
    #[error("API error at {url} (status {status}): {message}")]
    ServerError {
        url: String,
        status: u16,
        message: String,
    },

    /// The API answered with a status the caller does not accept.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The response body could not be decoded.
    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The base URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// HTTP status attached to this error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ClientError { status, .. }
            | Error::ServerError { status, .. }
            | Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build the error for a non-accepted status code.
    pub(crate) fn from_status(url: &str, status: u16, message: String) -> Self {
        match status {
            400..=499 => Error::ClientError {
                url: url.to_string(),
                status,
                message,
            },
            500..=599 => Error::ServerError {
                url: url.to_string(),
                status,
                message,
            },
            _ => Error::UnexpectedStatus {
                url: url.to_string(),
                status,
            },
        }
    }
}

/// Result type alias using vestdash-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
