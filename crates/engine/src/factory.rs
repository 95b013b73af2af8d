//! StateFactory: creates state units bound to a store

use std::sync::Arc;

use tracing::info;

use stateful_core::StateStore;

use crate::registry::StateRegistry;
use crate::unit::{StateUnit, StoreProvider};

/// Shared entry point: one registry, one way of obtaining the store
///
/// Cloning is cheap; clones share the registry and the provider.
pub struct StateFactory<S> {
    registry: Arc<StateRegistry>,
    provider: StoreProvider<S>,
}

impl<S> StateFactory<S>
where
    S: StateStore + 'static,
{
    /// Create a factory that obtains its store from `provider`
    ///
    /// The provider runs at most once per unit, on the unit's first lookup.
    pub fn new<F>(registry: StateRegistry, provider: F) -> Self
    where
        F: Fn() -> Arc<S> + Send + Sync + 'static,
    {
        info!(states = registry.len(), "created state factory");
        Self {
            registry: Arc::new(registry),
            provider: Arc::new(provider),
        }
    }

    /// Create a factory over a single shared store
    pub fn with_store(registry: StateRegistry, store: Arc<S>) -> Self {
        Self::new(registry, move || store.clone())
    }

    /// Registrations every unit resolves against
    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    /// Start a new unit
    pub fn create_unit(&self) -> StateUnit<S> {
        StateUnit::new(self.registry.clone(), self.provider.clone())
    }
}

impl<S> Clone for StateFactory<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            provider: self.provider.clone(),
        }
    }
}
