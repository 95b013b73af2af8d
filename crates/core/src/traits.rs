//! The key/value primitive every collection is built on
//!
//! This module defines the `StateStore` trait, which enables swapping the
//! backing store without touching the collection engines.
//!
//! The contract is deliberately minimal: existence check, get/try-get,
//! upsert, fail-if-exists add and remove, each addressed by a string key.
//! Every call is independently atomic. There are no multi-key transactions
//! and no iteration.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Key/value primitive
///
/// Thread safety: implementations must be `Send + Sync`. The collection
/// engines issue several calls per structural mutation without any locking;
/// at most one logical operation per collection name may be in flight.
///
/// Cancellation: dropping a returned future cancels that call only. Calls
/// already completed by an enclosing operation stay applied.
pub trait StateStore: Send + Sync {
    /// Returns true if a record exists under `name`
    fn contains(&self, name: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Read the record under `name`, or `None` if absent
    fn try_get<T>(&self, name: &str) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Read the record under `name`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists.
    fn get<T>(&self, name: &str) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move {
            self.try_get(name)
                .await?
                .ok_or_else(|| Error::NotFound(name.to_string()))
        }
    }

    /// Insert or overwrite the record under `name`
    fn set<T>(&self, name: &str, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;

    /// Insert the record under `name`
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a record is already present.
    fn add<T>(&self, name: &str, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;

    /// Remove the record under `name`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists.
    fn remove(&self, name: &str) -> impl Future<Output = Result<()>> + Send {
        async move {
            if self.try_remove(name).await? {
                Ok(())
            } else {
                Err(Error::NotFound(name.to_string()))
            }
        }
    }

    /// Remove the record under `name` if present; returns whether it existed
    fn try_remove(&self, name: &str) -> impl Future<Output = Result<bool>> + Send;
}

impl<S: StateStore> StateStore for Arc<S> {
    fn contains(&self, name: &str) -> impl Future<Output = Result<bool>> + Send {
        (**self).contains(name)
    }

    fn try_get<T>(&self, name: &str) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).try_get(name)
    }

    fn get<T>(&self, name: &str) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).get(name)
    }

    fn set<T>(&self, name: &str, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync,
    {
        (**self).set(name, value)
    }

    fn add<T>(&self, name: &str, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync,
    {
        (**self).add(name, value)
    }

    fn remove(&self, name: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).remove(name)
    }

    fn try_remove(&self, name: &str) -> impl Future<Output = Result<bool>> + Send {
        (**self).try_remove(name)
    }
}
