//! NetBox client errors

use thiserror::Error;

use crate::models::SchemaViolation;

/// Errors that can occur when reading from the NetBox API
#[derive(Debug, Error)]
pub enum NetBoxError {
    /// Network unreachable, TLS failure or timeout
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// NetBox answered with a non-success status
    #[error("GET {endpoint} failed: {status} - {body}")]
    Status {
        /// Endpoint the request was issued against
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// Single-resource lookup answered 404
    #[error("not found: {endpoint}{id}/")]
    NotFound {
        /// Endpoint the lookup was issued against
        endpoint: String,
        /// Identifier that does not exist
        id: u64,
    },

    /// The call succeeded but the body is not the expected JSON shape
    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse {
        /// Endpoint that produced the body
        endpoint: String,
        /// What was wrong with it
        message: String,
    },

    /// A record failed validation against its resource schema
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// Client configuration is unusable; raised before any request
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Caller passed arguments outside the client's contract
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl NetBoxError {
    /// True for configuration problems, which callers usually map to a
    /// distinct exit status.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }

    /// True when a single-resource lookup found nothing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status carried by the error, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Connection(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
