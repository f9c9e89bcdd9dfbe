use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::{
    config::Config, permalink, providers::PermalinkService, providers::ProviderSummary,
    RepositoryState, Selection,
};

use super::CoreError;

type Result<T> = std::result::Result<T, CoreError>;

/// Handle exposed to host editors via `UniFFI`, bound to one workspace folder.
#[derive(Debug)]
pub struct CoreSession {
    service: PermalinkService,
    workspace: PathBuf,
}

impl CoreSession {
    fn new(service: PermalinkService, workspace: PathBuf) -> Self {
        Self { service, workspace }
    }

    /// Permalink for a 0-based editor selection in `file_path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is not in a repository or the
    /// repository has no remote, commit, or branch to anchor the link.
    pub fn permalink(&self, file_path: String, start_line: u32, end_line: u32) -> Result<String> {
        let selection = Selection::new(start_line, end_line);
        self.service
            .permalink_for_selection(self.provider_id(), &self.resolve(&file_path), selection)
            .map_err(CoreError::from)
    }

    /// Whether `file_path` lies inside a repository.
    pub fn contains(&self, file_path: String) -> bool {
        self.service
            .contains(self.provider_id(), &self.resolve(&file_path))
    }

    /// Repository facts for the repository enclosing `file_path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository cannot be located or read.
    pub fn repository_state(&self, file_path: String) -> Result<RepositoryState> {
        self.service
            .repository_state(self.provider_id(), &self.resolve(&file_path))
            .map_err(CoreError::from)
    }

    /// Registered repository providers.
    pub fn providers(&self) -> Vec<ProviderSummary> {
        self.service.summaries()
    }

    /// Identifier of the provider this session queries.
    pub fn provider(&self) -> String {
        self.provider_id().to_string()
    }

    fn provider_id(&self) -> &str {
        self.service.default_provider()
    }

    /// Relative paths are taken relative to the workspace folder.
    fn resolve(&self, file_path: &str) -> PathBuf {
        let path = Path::new(file_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }
}

/// Open a session for the workspace folder at `path` via the `UniFFI`
/// namespace function.
///
/// Reads `.permalink.toml` from the folder and checks that the configured
/// provider is registered.
///
/// # Errors
///
/// Returns an error when the configuration is malformed or names an unknown
/// provider.
pub fn open(path: String) -> Result<Arc<CoreSession>> {
    let workspace = PathBuf::from(path);
    let config = Config::load(&workspace).map_err(CoreError::from)?;
    let service = PermalinkService::from_config(config);
    if service.registry().get(service.default_provider()).is_none() {
        return Err(CoreError::ProviderNotRegistered);
    }
    debug!(workspace = %workspace.display(), provider = service.default_provider(), "opened session");
    Ok(Arc::new(CoreSession::new(service, workspace)))
}

/// Pure permalink construction exposed through `UniFFI`.
#[must_use]
pub fn build_permalink(
    remote_url: String,
    reference: String,
    file_path: String,
    start_line: u32,
    end_line: u32,
) -> String {
    permalink::build(&remote_url, &reference, &file_path, start_line, end_line)
}
