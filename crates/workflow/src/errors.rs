//! Error types shared by every port.
//!
//! [`RemoteError`] is what infrastructure adapters return. Workflow-level
//! errors (invalid status, malformed command, empty branch) are defined next
//! to the workflow that produces them.
//!
//! Nothing in this workspace retries: a [`RemoteError`] is either surfaced to
//! the caller or, on the PR-body path only, downgraded to a fallback.

use thiserror::Error;

/// Failure of a call to a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The addressed entity does not exist (HTTP 404).
    #[error("{entity} not found")]
    NotFound {
        /// Description of what was looked up, e.g. `"page 1234"`.
        entity: String,
    },

    /// Credentials were rejected (HTTP 401 or 403).
    #[error("unauthorized: {body}")]
    Unauthorized { body: String },

    /// Any other non-success HTTP status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The adapter lacks the configuration needed to make the call.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl RemoteError {
    /// Classifies a non-success HTTP status and its body.
    pub fn from_status(status: u16, body: String, entity: impl Into<String>) -> Self {
        match status {
            404 => Self::NotFound {
                entity: entity.into(),
            },
            401 | 403 => Self::Unauthorized { body },
            _ => Self::Api { status, body },
        }
    }
}
