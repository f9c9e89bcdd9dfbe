//! Core library for building shareable permalinks to lines of git-hosted files.
//!
//! The crate is layered around three responsibilities:
//! - pure permalink construction from remote URL, reference, path, and lines
//! - repository discovery through pluggable repository info providers
//! - surfaces for callers (the `git-permalink` CLI and the `UniFFI` session)

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Workspace configuration loaded from `.permalink.toml`.
pub mod config;
/// `UniFFI` surface for host editors.
pub mod ffi;
/// Permalink URL construction.
pub mod permalink;
/// Repository info providers and the permalink service.
pub mod providers;
/// libgit2-backed repository access.
pub mod repository;

pub use permalink_api::{LineRange, RemoteInfo, RepositoryState, Selection};

// UniFFI-generated scaffolding refers to `crate::UniFfiTag`.
use ffi::UniFfiTag;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying git operation failed.
    #[error("git error: {source}")]
    Git {
        /// Original libgit2 error bubbled up by the core library.
        #[from]
        source: git2::Error,
    },
    /// Provided path does not correspond to a git repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Bare repositories have no working tree to link into.
    #[error("repository at {path} is bare and unsupported")]
    BareRepository {
        /// Path of the repository lacking a working tree.
        path: String,
    },
    /// The file lies outside the repository that was discovered for it.
    #[error("{path} is not inside the repository at {root}")]
    OutsideRepository {
        /// File that was requested.
        path: String,
        /// Root of the discovered repository.
        root: String,
    },
    /// The repository-relative path cannot be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
    /// No remote URL is configured for the repository.
    #[error("Could not determine remote URL.")]
    MissingRemote,
    /// Neither a HEAD commit nor a branch name is available.
    #[error("Could not determine commit hash or branch name.")]
    MissingReference,
    /// Provider id was not registered.
    #[error("repository provider '{provider}' is not registered")]
    ProviderNotRegistered {
        /// Requested provider identifier.
        provider: String,
    },
    /// Provider failed to answer a repository query.
    #[error("{provider}: {source}")]
    Provider {
        /// Identifier of the failing provider.
        provider: String,
        /// Error reported by the provider.
        #[source]
        source: permalink_provider_api::ProviderError,
    },
    /// Configuration file exists but cannot be parsed.
    #[error("invalid config {path}: {source}")]
    Config {
        /// Path of the malformed configuration file.
        path: String,
        /// TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },
    /// Configuration parsed but holds an unusable value.
    #[error("invalid config {path}: {reason}")]
    InvalidConfig {
        /// Path of the offending configuration file.
        path: String,
        /// Which setting is wrong and why.
        reason: String,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
}
