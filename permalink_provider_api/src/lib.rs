mod registry;
mod types;

use std::path::{Path, PathBuf};

pub use registry::ProviderRegistry;
pub use types::{ProviderError, ProviderResult, ProviderSummary};

pub use permalink_api::RemoteInfo;

/// Source of repository facts (enclosing root, remotes, HEAD).
///
/// Implementations wrap one way of reading version-control state, such as an
/// in-process git library or the `git` command-line tool.
pub trait RepositoryInfoProvider: Send + Sync {
    /// Stable identifier used for lookup, configuration, and logging.
    fn id(&self) -> &'static str;

    /// Human-friendly label for UI surfaces.
    fn label(&self) -> &'static str;

    /// Locate the working-tree root of the repository enclosing `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotARepository`] when no repository encloses
    /// the path, or a failure when the backend cannot be queried.
    fn discover_root(&self, path: &Path) -> ProviderResult<PathBuf>;

    /// Enumerate configured remotes in the order the backend reports them.
    ///
    /// # Errors
    ///
    /// Implementors should surface any backend failures.
    fn remotes(&self, root: &Path) -> ProviderResult<Vec<RemoteInfo>>;

    /// Full id of the HEAD commit, or `None` when HEAD is unborn.
    ///
    /// # Errors
    ///
    /// Implementors should surface any backend failures.
    fn head_commit(&self, root: &Path) -> ProviderResult<Option<String>>;

    /// Name of the checked-out branch, or `None` when HEAD is detached.
    ///
    /// # Errors
    ///
    /// Implementors should surface any backend failures.
    fn current_branch(&self, root: &Path) -> ProviderResult<Option<String>>;

    /// Link URL of the preferred remote, or of the first remote when no
    /// preference is given or the preferred one is missing.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`RepositoryInfoProvider::remotes`].
    fn remote_url(&self, root: &Path, preferred: Option<&str>) -> ProviderResult<Option<String>> {
        let remotes = self.remotes(root)?;
        let chosen = preferred
            .and_then(|name| remotes.iter().find(|remote| remote.name == name))
            .or_else(|| remotes.first());
        Ok(chosen.and_then(RemoteInfo::url).map(str::to_owned))
    }
}
