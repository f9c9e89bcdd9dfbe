use thiserror::Error;

use crate::Error;

/// Errors surfaced through the `UniFFI` bindings.
///
/// Messages are phrased for direct display in host notifications.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Path does not correspond to a git repository.
    #[error("No git repository found for this file.")]
    NotARepository,
    /// Repository is bare and unsupported.
    #[error("Repository is bare and has no working tree.")]
    BareRepository,
    /// File is not inside the discovered repository.
    #[error("File is outside the repository.")]
    OutsideRepository,
    /// No remote URL could be read.
    #[error("Could not determine remote URL.")]
    MissingRemote,
    /// Neither a commit nor a branch could be read.
    #[error("Could not determine commit hash or branch name.")]
    MissingReference,
    /// Underlying git operation failed.
    #[error("{message}")]
    Git {
        /// Rendered libgit2 error.
        message: String,
    },
    /// Filesystem interaction failed.
    #[error("{message}")]
    Io {
        /// Rendered I/O error including the path.
        message: String,
    },
    /// Workspace configuration is malformed.
    #[error("{message}")]
    Config {
        /// Config path and the parse or validation failure.
        message: String,
    },
    /// Configured provider was not registered with the core.
    #[error("repository provider is not registered")]
    ProviderNotRegistered,
    /// Provider failed to answer a repository query.
    #[error("{message}")]
    Provider {
        /// Provider id followed by the backend's own message.
        message: String,
    },
    /// Internal invariant failed.
    #[error("internal error")]
    Internal,
}

impl From<Error> for CoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::Git { .. } => Self::Git {
                message: error.to_string(),
            },
            Error::NotARepository { .. } => Self::NotARepository,
            Error::BareRepository { .. } => Self::BareRepository,
            Error::OutsideRepository { .. } => Self::OutsideRepository,
            Error::NonUtf8Path { .. } => Self::Internal,
            Error::MissingRemote => Self::MissingRemote,
            Error::MissingReference => Self::MissingReference,
            Error::ProviderNotRegistered { .. } => Self::ProviderNotRegistered,
            Error::Provider { .. } => Self::Provider {
                message: error.to_string(),
            },
            Error::Config { .. } | Error::InvalidConfig { .. } => Self::Config {
                message: error.to_string(),
            },
            Error::Io { .. } => Self::Io {
                message: error.to_string(),
            },
        }
    }
}
