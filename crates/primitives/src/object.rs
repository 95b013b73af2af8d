//! ObjectState: a single value stored under the state name

use std::marker::PhantomData;
use std::sync::Arc;

use stateful_core::{Result, StateStore};

use crate::collection::StateValue;

/// Single-value state
pub struct ObjectState<S, T> {
    store: Arc<S>,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<S, T> ObjectState<S, T>
where
    S: StateStore,
    T: StateValue,
{
    /// Create an object handle over `store`
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// State name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if a value has been stored
    pub async fn has_state(&self) -> Result<bool> {
        self.store.contains(&self.name).await
    }

    /// Stored value, if any
    pub async fn try_get(&self) -> Result<Option<T>> {
        self.store.try_get(&self.name).await
    }

    /// Store `value`, replacing any previous one, and hand it back
    pub async fn set(&self, value: T) -> Result<T> {
        self.store.set(&self.name, &value).await?;
        Ok(value)
    }

    /// Remove the stored value; no-op if there is none
    pub async fn delete_state(&self) -> Result<()> {
        self.store.try_remove(&self.name).await?;
        Ok(())
    }
}
