//! Error types for MailSlurp operations.

use std::time::Duration;
use uuid::Uuid;

/// Errors returned by the MailSlurp client.
///
/// Remote failures always name the operation and the target (inbox or email
/// id) they were issued for, so a failed test can be diagnosed from the
/// message alone.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API key was supplied, or it was empty.
    #[error("missing API key: set the API_KEY environment variable")]
    MissingApiKey,

    /// The API key cannot be sent as an HTTP header value.
    #[error("invalid API key: not a valid header value")]
    InvalidApiKey,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Network or protocol failure while talking to the service.
    #[error("{operation} request for {target} failed: {source}")]
    Request {
        operation: &'static str,
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an unexpected non-2xx status.
    #[error("{operation} for {target} returned HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        target: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("{operation} for {target} returned an unexpected body: {source}")]
    Json {
        operation: &'static str,
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// No matching email arrived before the deadline.
    #[error("no matching email in inbox {inbox_id} within {timeout:?}")]
    Timeout { inbox_id: Uuid, timeout: Duration },

    /// The caller cancelled the wait before the deadline.
    #[error("wait on inbox {inbox_id} was cancelled")]
    Cancelled { inbox_id: Uuid },

    /// The extraction pattern did not occur in the email body.
    #[error("no code matching `{pattern}` found in body")]
    CodeNotFound { pattern: String },

    /// A custom extraction pattern could not be used.
    #[error("invalid code pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl Error {
    /// Whether this is the expected "nothing arrived in time" outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// HTTP status for [`Error::Status`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
