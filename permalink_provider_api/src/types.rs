use serde::{Deserialize, Serialize};

/// Summary information about a registered provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// Stable identifier for the provider.
    pub id: String,
    /// Human-friendly label for display.
    pub label: String,
}

/// Errors surfaced by repository info providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The queried path is not inside a repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Generic failure surfaced by the provider backend.
    #[error("{message}")]
    Failure {
        /// Human-readable error message.
        message: String,
    },
}

impl ProviderError {
    /// Helper to construct a failure from any displayable message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Convenience result alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
