//! Error types for the HR client.

use std::time::Duration;

use jscorp_common::error::ErrorKind;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Login or password reset attempted with a blank username.
    #[error("Username is required")]
    MissingUsername,

    /// A blank base URL was supplied where one is required.
    #[error("No API base URL given")]
    MissingBaseUrl,

    /// The login route answered 404; the base URL most likely points at the
    /// wrong server.
    #[error("API endpoint not found at {url}; check the API base URL")]
    EndpointNotFound { url: String },

    /// 403, e.g. an account whose email has not been verified.
    #[error("{message}")]
    Forbidden { message: String },

    /// 401: bad credentials, or a missing / expired token.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// An authenticated call was attempted without a session token.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Login succeeded at the HTTP level but no token came back.
    #[error("Login response did not include an access token")]
    MissingToken,

    /// The request never produced an HTTP response.
    #[error("Could not reach {url}: {reason}")]
    Network { url: String, reason: String },

    /// No response within the client-side deadline.
    #[error("{url} did not respond within {}s", .after.as_secs())]
    Timeout { url: String, after: Duration },

    /// A 2xx body that does not match the expected shape.
    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Local storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingBaseUrl | Self::EndpointNotFound { .. } => ErrorKind::Configuration,
            Self::Client(_) | Self::Store(_) => ErrorKind::Configuration,
            Self::Forbidden { .. } | Self::Unauthorized { .. } | Self::MissingToken | Self::NotLoggedIn => {
                ErrorKind::Auth
            }
            Self::MissingUsername | Self::Rejected { .. } | Self::Decode { .. } => {
                ErrorKind::Validation
            }
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// HTTP status behind this error, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::EndpointNotFound { .. } => Some(404),
            Self::Forbidden { .. } => Some(403),
            Self::Unauthorized { .. } => Some(401),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// What a call site sees once a request has settled.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome<T> {
    Success(T),
    AuthOrValidationError(String),
    NetworkError(String),
    Timeout,
}

impl<T> From<Result<T>> for RequestOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(ApiError::Timeout { .. }) => Self::Timeout,
            Err(ApiError::Network { reason, .. }) => Self::NetworkError(reason),
            Err(other) => Self::AuthOrValidationError(other.to_string()),
        }
    }
}

impl<T> RequestOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
