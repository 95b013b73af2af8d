//! ArrayState: fixed-length, directly addressed slots
//!
//! ## Key Design
//!
//! - Length marker: `<name>` holds the length, written on the first `set`
//! - Slot `i`: `<name>:<iHex>`, written on demand
//!
//! A slot that was never written reads as `T::default()`. The length is
//! fixed per name: once a marker exists, every handle for that name must be
//! created with the same length. The check runs once per handle and the
//! outcome is cached.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use stateful_core::{index_key, Error, Result, StateStore};

use crate::collection::{CollectionState, StateValue};
use crate::cursor::StateCursor;

/// Fixed-length array state
pub struct ArrayState<S, T> {
    store: Arc<S>,
    name: String,
    length: u64,
    validated: AtomicBool,
    materialized: AtomicBool,
    _marker: PhantomData<fn() -> T>,
}

impl<S, T> ArrayState<S, T>
where
    S: StateStore,
    T: StateValue + Default,
{
    /// Create an array handle of `length` slots
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `length` is zero.
    pub fn new(store: Arc<S>, name: impl Into<String>, length: u64) -> Result<Self> {
        if length < 1 {
            return Err(Error::InvalidArgument(
                "array length must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            store,
            name: name.into(),
            length,
            validated: AtomicBool::new(false),
            materialized: AtomicBool::new(false),
            _marker: PhantomData,
        })
    }

    /// State name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured length
    pub fn length(&self) -> u64 {
        self.length
    }

    fn slot_key(&self, index: u64) -> String {
        index_key(&self.name, index)
    }

    /// Compare the configured length against the persisted marker, once
    async fn validate_length(&self) -> Result<()> {
        if self.validated.load(Ordering::Acquire) {
            return Ok(());
        }

        let persisted: Option<u64> = self.store.try_get(&self.name).await?;
        if let Some(persisted) = persisted {
            if persisted != self.length {
                warn!(
                    name = %self.name,
                    configured = self.length,
                    persisted,
                    "array length does not match persisted length"
                );
                return Err(Error::InconsistentLength {
                    configured: self.length,
                    persisted,
                });
            }
        }

        self.materialized
            .store(persisted.is_some(), Ordering::Release);
        self.validated.store(true, Ordering::Release);
        Ok(())
    }

    /// Write the length marker unless another handle got there first
    ///
    /// A marker written since this handle validated must carry the same
    /// length; the persisted length is never replaced.
    async fn materialize(&self) -> Result<()> {
        match self.store.add(&self.name, &self.length).await {
            Ok(()) => {
                debug!(name = %self.name, length = self.length, "materialized array");
            }
            Err(Error::AlreadyExists(_)) => {
                let persisted: Option<u64> = self.store.try_get(&self.name).await?;
                if let Some(persisted) = persisted.filter(|p| *p != self.length) {
                    warn!(
                        name = %self.name,
                        configured = self.length,
                        persisted,
                        "array length does not match persisted length"
                    );
                    self.validated.store(false, Ordering::Release);
                    return Err(Error::InconsistentLength {
                        configured: self.length,
                        persisted,
                    });
                }
            }
            Err(e) => return Err(e),
        }
        self.materialized.store(true, Ordering::Release);
        Ok(())
    }

    fn check_index(&self, index: i64) -> Result<u64> {
        u64::try_from(index)
            .ok()
            .filter(|i| *i < self.length)
            .ok_or_else(|| Error::index_out_of_range(index, self.length))
    }

    /// Value at `index`; `T::default()` if the slot was never written
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` unless `0 <= index < length`, and
    /// `InconsistentLength` if the persisted length differs.
    pub async fn get(&self, index: i64) -> Result<T> {
        self.validate_length().await?;
        let index = self.check_index(index)?;
        let value: Option<T> = self.store.try_get(&self.slot_key(index)).await?;
        Ok(value.unwrap_or_default())
    }

    /// Overwrite the slot at `index`
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn set(&self, index: i64, value: T) -> Result<()> {
        self.validate_length().await?;
        let index = self.check_index(index)?;

        if !self.materialized.load(Ordering::Acquire) {
            self.materialize().await?;
        }

        self.store.set(&self.slot_key(index), &value).await
    }
}

impl<S, T> CollectionState for ArrayState<S, T>
where
    S: StateStore,
    T: StateValue + Default,
{
    type Item = T;
    type Cursor<'a> = ArrayCursor<'a, S, T> where Self: 'a;

    async fn has_state(&self) -> Result<bool> {
        self.store.contains(&self.name).await
    }

    /// Remove every slot, written or not, then the length marker
    ///
    /// The marker goes last so an interrupted delete can be retried.
    async fn delete_state(&self) -> Result<()> {
        let persisted: Option<u64> = self.store.try_get(&self.name).await?;
        let Some(persisted) = persisted else {
            return Ok(());
        };

        let mut removed = 0u64;
        for index in 0..persisted {
            if self.store.try_remove(&self.slot_key(index)).await? {
                removed += 1;
            }
        }
        self.store.remove(&self.name).await?;

        self.validated.store(false, Ordering::Release);
        self.materialized.store(false, Ordering::Release);
        debug!(name = %self.name, slots = removed, "deleted array");
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        self.validate_length().await?;
        Ok(self.length)
    }

    /// Scan written slots in index order; unwritten slots are skipped
    async fn contains<P>(&self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool + Send,
    {
        self.validate_length().await?;
        for index in 0..self.length {
            let value: Option<T> = self.store.try_get(&self.slot_key(index)).await?;
            if value.as_ref().is_some_and(&mut predicate) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        ArrayCursor {
            array: self,
            index: 0,
        }
    }
}

/// Cursor over every slot of an array, defaults included
pub struct ArrayCursor<'a, S, T> {
    array: &'a ArrayState<S, T>,
    index: u64,
}

impl<'a, S, T> StateCursor for ArrayCursor<'a, S, T>
where
    S: StateStore,
    T: StateValue + Default,
{
    type Item = T;

    async fn next(&mut self) -> Result<Option<T>> {
        self.array.validate_length().await?;
        if self.index >= self.array.length {
            return Ok(None);
        }

        let value: Option<T> = self
            .array
            .store
            .try_get(&self.array.slot_key(self.index))
            .await?;
        self.index += 1;
        Ok(Some(value.unwrap_or_default()))
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}
