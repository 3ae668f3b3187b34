//! The measurement access layer used by the presentation layer.
//!
//! [`Dashboard`] wraps an [`ApiClient`] and exposes the operations the
//! dashboard screens call. Every operation takes the caller's [`Session`],
//! reports failures through it, and returns a value the caller can render
//! directly; none of them return `Result`.
//!
//! The operations are split by concern:
//!
//! - [`crate::directory`]: vests and sensors
//! - [`crate::reader`]: recent measurements with the simulated-data fallback
//! - [`crate::writer`]: submitting a measurement
//!
//! Normalization into a chartable table is a free function,
//! [`crate::normalize::format_measurements`].
//!
//! [`Session`]: crate::Session

use crate::client::ApiClient;
use crate::error::Error;
use crate::session::{Notice, Session};

/// Default look-back window for recent measurements.
pub const DEFAULT_RECENT_SECONDS: u64 = 3600;

/// Measurement access layer.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub(crate) client: ApiClient,
    pub(crate) recent_seconds: u64,
}

impl Dashboard {
    /// Create a dashboard using the default recent-measurements window.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            recent_seconds: DEFAULT_RECENT_SECONDS,
        }
    }

    /// Set the look-back window used by `get_recent_measurements`.
    #[must_use]
    pub fn with_recent_seconds(mut self, seconds: u64) -> Self {
        self.recent_seconds = seconds;
        self
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn recent_seconds(&self) -> u64 {
        self.recent_seconds
    }

    /// Report `err` as the failure of `operation`.
    pub(crate) fn report_error(session: &Session, operation: &str, err: &Error) {
        let message = match err {
            Error::Transport { .. } => format!("Could not reach the API: {err}"),
            Error::Decode { .. } => format!("The API returned an unreadable response: {err}"),
            _ => format!("Request failed: {err}"),
        };
        session.report(Notice::error(operation, message));
    }
}
