//! Provider registry keeps track of available repository backends.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{ProviderSummary, RepositoryInfoProvider};

/// In-memory registry of repository info providers, keyed by id.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<&'static str, Arc<dyn RepositoryInfoProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider keyed by its `RepositoryInfoProvider::id`.
    pub fn register<P>(&mut self, provider: P)
    where
        P: RepositoryInfoProvider + 'static,
    {
        self.register_arc(Arc::new(provider));
    }

    /// Register an already shared provider, replacing any with the same id.
    pub fn register_arc(&mut self, provider: Arc<dyn RepositoryInfoProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    /// Retrieve a provider by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn RepositoryInfoProvider>> {
        self.providers.get(id).cloned()
    }

    /// Returns the registered provider identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.keys().copied()
    }

    /// Summaries for every registered provider.
    #[must_use]
    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.providers
            .values()
            .map(|provider| ProviderSummary {
                id: provider.id().to_string(),
                label: provider.label().to_string(),
            })
            .collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
