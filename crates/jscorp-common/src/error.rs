//! Error taxonomy shared by the client crates and the backend's JSON error
//! envelope.

use serde::Deserialize;

/// Coarse classification every client failure maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable endpoint could be determined.
    Configuration,
    /// Bad credentials, missing or expired token, forbidden account.
    Auth,
    /// Structured 4xx/5xx detail returned by the server.
    Validation,
    /// DNS failure, refused connection, TLS or CORS-style block.
    Network,
    /// Client-enforced deadline elapsed.
    Timeout,
}

impl ErrorKind {
    /// Error code string for programmatic handling (logs, exit codes).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Auth => "AUTH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
        }
    }
}

/// Error body returned by the backend: `{"detail": "..."}`.
///
/// Validation failures sometimes carry a list of field errors in `detail`
/// instead of a string; those are treated as "no detail".
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Parse an error body, yielding the non-blank string `detail` if any.
    /// Never fails: malformed bodies simply have no detail.
    pub fn detail_from_bytes(body: &[u8]) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
        envelope
            .detail?
            .as_str()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned)
    }
}
