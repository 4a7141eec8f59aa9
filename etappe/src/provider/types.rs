//! Provider error type

use std::fmt;

/// Errors that can occur when calling an upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Network failure, timeout or non-success HTTP status
    UpstreamUnavailable(String),
    /// Response body missing expected fields or not decodable
    UpstreamMalformed(String),
    /// Well-formed response that holds no result
    NotFound(String),
}

impl ProviderError {
    /// Returns true when retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::UpstreamUnavailable(_))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            ProviderError::UpstreamMalformed(msg) => {
                write!(f, "Malformed upstream response: {}", msg)
            }
            ProviderError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
