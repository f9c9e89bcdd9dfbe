use std::path::{Path, PathBuf};

use permalink_provider_api::{ProviderError, ProviderResult, RemoteInfo, RepositoryInfoProvider};

use crate::{repository::Repository, Error};

/// In-process provider reading repository state through libgit2.
///
/// The repository is reopened for every query, so the provider holds no
/// state and is freely shareable across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Libgit2Provider;

impl RepositoryInfoProvider for Libgit2Provider {
    fn id(&self) -> &'static str {
        "libgit2"
    }

    fn label(&self) -> &'static str {
        "Built-in (libgit2)"
    }

    fn discover_root(&self, path: &Path) -> ProviderResult<PathBuf> {
        Ok(open(path)?.root().to_path_buf())
    }

    fn remotes(&self, root: &Path) -> ProviderResult<Vec<RemoteInfo>> {
        open(root)?.remotes().map_err(into_provider_error)
    }

    fn head_commit(&self, root: &Path) -> ProviderResult<Option<String>> {
        open(root)?.head_commit().map_err(into_provider_error)
    }

    fn current_branch(&self, root: &Path) -> ProviderResult<Option<String>> {
        open(root)?.current_branch().map_err(into_provider_error)
    }
}

fn open(path: &Path) -> ProviderResult<Repository> {
    Repository::open(path).map_err(into_provider_error)
}

fn into_provider_error(error: Error) -> ProviderError {
    match error {
        Error::NotARepository { path } => ProviderError::NotARepository { path },
        other => ProviderError::message(other.to_string()),
    }
}
