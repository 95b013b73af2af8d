//! StateUnit: caching resolver for one logical operation
//!
//! A unit hands out typed state handles by name and keeps one handle per
//! name for its lifetime, so two lookups of the same name share the same
//! `Arc`. The store is bound on the first lookup, not when the unit is
//! created.
//!
//! `commit` and `abort` only end the unit's lifecycle. Writes are applied to
//! the store as each operation runs; durability and batching are the store's
//! concern.

use std::any::{type_name, Any, TypeId};
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use stateful_core::{Error, Result, StateKey, StateStore};
use stateful_primitives::{
    ArrayState, DictionaryState, ListState, ObjectState, QueueState, StackState, StateValue,
};

use crate::registry::{describe, StateKind, StateRegistration, StateRegistry};

/// Produces the store a unit binds to
pub type StoreProvider<S> = Arc<dyn Fn() -> Arc<S> + Send + Sync>;

type Handle = Arc<dyn Any + Send + Sync>;

/// Per-operation set of state handles
pub struct StateUnit<S> {
    registry: Arc<StateRegistry>,
    provider: StoreProvider<S>,
    store: OnceCell<Arc<S>>,
    handles: DashMap<StateKey, Handle>,
    disposed: AtomicBool,
}

impl<S> StateUnit<S>
where
    S: StateStore + 'static,
{
    pub(crate) fn new(registry: Arc<StateRegistry>, provider: StoreProvider<S>) -> Self {
        Self {
            registry,
            provider,
            store: OnceCell::new(),
            handles: DashMap::new(),
            disposed: AtomicBool::new(false),
        }
    }

    /// Returns true once the unit has been committed, aborted or disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Returns true if the store has been bound
    pub fn is_bound(&self) -> bool {
        self.store.get().is_some()
    }

    /// Number of handles resolved so far
    pub fn resolved(&self) -> usize {
        self.handles.len()
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            warn!("state unit used after disposal");
            return Err(Error::DisposedUnit);
        }
        Ok(())
    }

    fn store(&self) -> Arc<S> {
        self.store
            .get_or_init(|| {
                debug!("bound state unit to store");
                (self.provider)()
            })
            .clone()
    }

    /// Look up or create the handle for `name`
    ///
    /// The registration is checked on every call, so a cached handle is never
    /// returned for the wrong shape.
    fn resolve<H, F>(
        &self,
        name: &str,
        kind: StateKind,
        types: &[TypeId],
        type_names: &[&'static str],
        create: F,
    ) -> Result<Arc<H>>
    where
        H: Any + Send + Sync,
        F: FnOnce(Arc<S>, &StateRegistration) -> Result<H>,
    {
        self.ensure_live()?;
        let key = StateKey::new(name)?;
        let registration = self.registry.resolve(&key, kind, types, type_names)?;

        let cached = self.handles.get(&key).map(|entry| entry.value().clone());
        let handle = match cached {
            Some(handle) => handle,
            None => {
                let created: Handle = Arc::new(create(self.store(), registration)?);
                self.handles
                    .entry(key)
                    .or_insert_with(|| created)
                    .value()
                    .clone()
            }
        };

        handle.downcast::<H>().map_err(|_| Error::TypeMismatch {
            name: name.to_string(),
            expected: describe(kind, type_names),
            registered: registration.describe(),
        })
    }

    /// Single-value state registered as `name`
    ///
    /// # Errors
    ///
    /// `DisposedUnit` after disposal, `UnknownState` for an unregistered
    /// name, `TypeMismatch` for another kind or element type. The same holds
    /// for every lookup below.
    pub fn object<T: StateValue>(&self, name: &str) -> Result<Arc<ObjectState<S, T>>> {
        self.resolve(
            name,
            StateKind::Object,
            &[TypeId::of::<T>()],
            &[type_name::<T>()],
            |store, registration| Ok(ObjectState::new(store, registration.key().name())),
        )
    }

    /// List registered as `name`
    pub fn list<T: StateValue>(&self, name: &str) -> Result<Arc<ListState<S, T>>> {
        self.resolve(
            name,
            StateKind::List,
            &[TypeId::of::<T>()],
            &[type_name::<T>()],
            |store, registration| Ok(ListState::new(store, registration.key().name())),
        )
    }

    /// Queue registered as `name`
    pub fn queue<T: StateValue>(&self, name: &str) -> Result<Arc<QueueState<S, T>>> {
        self.resolve(
            name,
            StateKind::Queue,
            &[TypeId::of::<T>()],
            &[type_name::<T>()],
            |store, registration| Ok(QueueState::new(store, registration.key().name())),
        )
    }

    /// Stack registered as `name`
    pub fn stack<T: StateValue>(&self, name: &str) -> Result<Arc<StackState<S, T>>> {
        self.resolve(
            name,
            StateKind::Stack,
            &[TypeId::of::<T>()],
            &[type_name::<T>()],
            |store, registration| Ok(StackState::new(store, registration.key().name())),
        )
    }

    /// Dictionary registered as `name`, using the configured bucket addressing
    pub fn dictionary<K, V>(&self, name: &str) -> Result<Arc<DictionaryState<S, K, V>>>
    where
        K: StateValue + Hash + Eq,
        V: StateValue,
    {
        let addressing = self.registry.addressing();
        self.resolve(
            name,
            StateKind::Dictionary,
            &[TypeId::of::<K>(), TypeId::of::<V>()],
            &[type_name::<K>(), type_name::<V>()],
            |store, registration| {
                Ok(DictionaryState::new(store, registration.key().name())
                    .with_addressing(addressing))
            },
        )
    }

    /// Array registered as `name`, with its registered length
    pub fn array<T>(&self, name: &str) -> Result<Arc<ArrayState<S, T>>>
    where
        T: StateValue + Default,
    {
        self.resolve(
            name,
            StateKind::Array,
            &[TypeId::of::<T>()],
            &[type_name::<T>()],
            |store, registration| {
                let length = registration.length().ok_or_else(|| {
                    Error::Config(format!("array '{}' has no length", registration.key()))
                })?;
                ArrayState::new(store, registration.key().name(), length)
            },
        )
    }

    /// End the unit, discarding its handles
    ///
    /// Writes already issued stay applied.
    ///
    /// # Errors
    ///
    /// Returns `DisposedUnit` if the unit has already ended.
    pub fn abort(&self) -> Result<()> {
        self.ensure_live()?;
        debug!(handles = self.resolved(), "aborting state unit");
        self.dispose();
        Ok(())
    }

    /// End the unit after a successful operation
    ///
    /// # Errors
    ///
    /// Returns `DisposedUnit` if the unit has already ended.
    pub fn commit(&self) -> Result<()> {
        self.ensure_live()?;
        debug!(handles = self.resolved(), "committing state unit");
        self.dispose();
        Ok(())
    }

    /// Release every handle; safe to call more than once
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.handles.clear();
    }
}

impl<S> Drop for StateUnit<S> {
    fn drop(&mut self) {
        self.disposed.store(true, Ordering::Release);
        self.handles.clear();
    }
}
