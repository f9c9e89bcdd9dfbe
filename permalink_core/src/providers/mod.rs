//! Repository info providers and the service that turns their answers into
//! permalinks.

mod libgit2;
mod service;

pub use permalink_provider_api::{
    ProviderError, ProviderRegistry, ProviderResult, ProviderSummary, RepositoryInfoProvider,
};
pub use permalink_providers::GitCliProvider;

pub use libgit2::Libgit2Provider;
pub use service::PermalinkService;

use crate::config::Config;

/// Build a registry holding the built-in providers, configured from `config`.
#[must_use]
pub fn registry(config: &Config) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Libgit2Provider);
    registry.register(
        GitCliProvider::new()
            .with_binary(config.git_cli.binary.as_os_str())
            .with_timeout(config.git_cli.timeout()),
    );
    registry
}
