use std::time::Duration;

use thiserror::Error;

/// Failure of an external provider call.
///
/// Carries plain strings so it can be stored in a routing outcome and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured")]
    NotConfigured { provider: &'static str },

    #[error("{provider} timed out after {after:?}")]
    Timeout {
        provider: &'static str,
        after: Duration,
    },

    #[error("{provider} request failed: {reason}")]
    Request {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} returned an unusable response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} returned no content")]
    Empty { provider: &'static str },
}

impl ProviderError {
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured { provider }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Request { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::InvalidResponse { provider, .. }
            | ProviderError::Empty { provider } => provider,
        }
    }
}
