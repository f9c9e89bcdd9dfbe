use std::path::{Path, PathBuf};
use std::sync::Arc;

use camino::Utf8PathBuf;
use tracing::{debug, warn};

use super::{
    ProviderError, ProviderRegistry, ProviderResult, ProviderSummary, RepositoryInfoProvider,
};
use crate::config::Config;
use crate::permalink;
use crate::repository::display_path;
use crate::{Error, LineRange, RepositoryState, Result, Selection};

/// High-level façade resolving a file and line range into a permalink.
#[derive(Clone)]
pub struct PermalinkService {
    registry: Arc<ProviderRegistry>,
    config: Config,
}

impl PermalinkService {
    /// Create a service backed by the provided registry.
    #[must_use]
    pub fn new(registry: ProviderRegistry, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    /// Create a service with the built-in providers configured from `config`.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let registry = super::registry(&config);
        Self::new(registry, config)
    }

    /// Access the underlying registry.
    #[must_use]
    pub fn registry(&self) -> Arc<ProviderRegistry> {
        Arc::clone(&self.registry)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Provider id selected by the configuration.
    #[must_use]
    pub fn default_provider(&self) -> &str {
        &self.config.provider
    }

    /// List summaries for all registered providers.
    #[must_use]
    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.registry.summaries()
    }

    /// Whether `file` lies inside a repository the provider can see.
    #[must_use]
    pub fn contains(&self, provider_id: &str, file: &Path) -> bool {
        self.provider(provider_id)
            .and_then(|provider| Self::locate(provider_id, provider.as_ref(), file))
            .is_ok()
    }

    /// Read root, remote URL, HEAD commit and branch for the repository
    /// enclosing `file`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderNotRegistered`] for unknown ids,
    /// [`Error::NotARepository`] when no repository encloses the file, or
    /// provider failures.
    pub fn repository_state(&self, provider_id: &str, file: &Path) -> Result<RepositoryState> {
        let provider = self.provider(provider_id)?;
        let file = canonicalize(file)?;
        let root = Self::discover(provider_id, provider.as_ref(), &file)?;
        self.state_at(provider_id, provider.as_ref(), &root)
    }

    /// Build the permalink for 1-based `lines` of `file`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRemote`] or [`Error::MissingReference`] when the
    /// repository cannot anchor a link, plus any error from locating the file.
    pub fn permalink(&self, provider_id: &str, file: &Path, lines: LineRange) -> Result<String> {
        let provider = self.provider(provider_id)?;
        let (root, relative) = Self::locate(provider_id, provider.as_ref(), file)?;
        let state = self.state_at(provider_id, provider.as_ref(), &root)?;

        let remote_url = state.remote_url.as_deref().ok_or(Error::MissingRemote)?;
        let reference = state.reference().ok_or(Error::MissingReference)?;
        if state.commit.is_none() {
            warn!(branch = reference, "no HEAD commit, linking to branch");
        }

        let link = permalink::build_for_lines(remote_url, reference, relative.as_str(), lines);
        debug!(provider = provider_id, %link, "built permalink");
        Ok(link)
    }

    /// Build the permalink for a 0-based editor selection.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`PermalinkService::permalink`].
    pub fn permalink_for_selection(
        &self,
        provider_id: &str,
        file: &Path,
        selection: Selection,
    ) -> Result<String> {
        self.permalink(provider_id, file, LineRange::from(selection))
    }

    /// Repository root and root-relative path of `file`.
    fn locate(
        provider_id: &str,
        provider: &dyn RepositoryInfoProvider,
        file: &Path,
    ) -> Result<(PathBuf, Utf8PathBuf)> {
        let file = canonicalize(file)?;
        let root = Self::discover(provider_id, provider, &file)?;

        let relative = file
            .strip_prefix(&root)
            .map_err(|_| Error::OutsideRepository {
                path: display_path(&file),
                root: display_path(&root),
            })?
            .to_path_buf();
        let relative = Utf8PathBuf::from_path_buf(relative).map_err(|path| Error::NonUtf8Path {
            path: display_path(&path),
        })?;

        Ok((root, relative))
    }

    fn discover(
        provider_id: &str,
        provider: &dyn RepositoryInfoProvider,
        file: &Path,
    ) -> Result<PathBuf> {
        let root = Self::invoke(provider_id, provider.discover_root(file))?;
        canonicalize(&root)
    }

    fn state_at(
        &self,
        provider_id: &str,
        provider: &dyn RepositoryInfoProvider,
        root: &Path,
    ) -> Result<RepositoryState> {
        let remote_url = Self::invoke(
            provider_id,
            provider.remote_url(root, self.config.remote.as_deref()),
        )?;
        let commit = Self::invoke(provider_id, provider.head_commit(root))?;
        let branch = Self::invoke(provider_id, provider.current_branch(root))?;

        let state = RepositoryState {
            root: display_path(root),
            remote_url,
            commit,
            branch,
        };
        debug!(provider = provider_id, ?state, "resolved repository state");
        Ok(state)
    }

    fn provider(&self, provider_id: &str) -> Result<Arc<dyn RepositoryInfoProvider>> {
        self.registry
            .get(provider_id)
            .ok_or_else(|| Error::ProviderNotRegistered {
                provider: provider_id.to_string(),
            })
    }

    fn invoke<T>(provider_id: &str, result: ProviderResult<T>) -> Result<T> {
        result.map_err(|source| match source {
            ProviderError::NotARepository { path } => Error::NotARepository { path },
            source => Error::Provider {
                provider: provider_id.to_string(),
                source,
            },
        })
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|source| Error::Io {
        path: display_path(path),
        source,
    })
}

impl std::fmt::Debug for PermalinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let provider_ids: Vec<String> = self
            .registry
            .ids()
            .map(std::string::ToString::to_string)
            .collect();
        f.debug_struct("PermalinkService")
            .field("providers", &provider_ids)
            .field("config", &self.config)
            .finish()
    }
}
