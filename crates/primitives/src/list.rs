//! ListState: indexed sequence over a linked chain
//!
//! Positional access walks from the head, so `try_get(index)`, `insert` and
//! `remove_at` cost O(index) store reads. Appends and head reads are O(1).

use std::sync::Arc;

use stateful_core::{Result, StateStore};

use crate::collection::{CollectionState, StateValue};
use crate::linked::{ChainCursor, LinkedChain};

/// Cursor over a list, also used for queues and stacks
pub type ListCursor<'a, S, T> = ChainCursor<'a, S, T>;

/// Ordered list state
///
/// # Example
///
/// ```rust,ignore
/// let list = ListState::new(store.clone(), "steps");
/// list.add_range(["a", "c"].map(String::from)).await?;
/// list.insert(1, "b".to_string()).await?;
/// assert_eq!(list.try_get_at(1).await?.as_deref(), Some("b"));
/// ```
pub struct ListState<S, T> {
    chain: LinkedChain<S, T>,
}

impl<S, T> ListState<S, T>
where
    S: StateStore,
    T: StateValue,
{
    /// Create a list handle over `store`
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        Self {
            chain: LinkedChain::new(store, name),
        }
    }

    /// State name
    pub fn name(&self) -> &str {
        self.chain.name()
    }

    /// Append a value
    pub async fn add(&self, value: T) -> Result<()> {
        self.chain.insert_last(vec![value]).await
    }

    /// Append values, keeping their order
    pub async fn add_range(&self, values: impl IntoIterator<Item = T>) -> Result<()> {
        self.chain.insert_last(values.into_iter().collect()).await
    }

    /// Insert `value` so it ends up at `index`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` unless `0 <= index <= count`.
    pub async fn insert(&self, index: i64, value: T) -> Result<()> {
        self.chain.insert_at(index, vec![value]).await
    }

    /// Insert `values` so the first of them ends up at `index`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` unless `0 <= index <= count`.
    pub async fn insert_range(&self, index: i64, values: impl IntoIterator<Item = T>) -> Result<()> {
        self.chain.insert_at(index, values.into_iter().collect()).await
    }

    /// The whole list, or `None` if it was never created
    pub async fn try_get(&self) -> Result<Option<Vec<T>>> {
        self.chain.values().await
    }

    /// Value at `index`, or `None` if the list is absent or `index` is out of range
    pub async fn try_get_at(&self, index: i64) -> Result<Option<T>> {
        self.chain.get_at(index).await
    }

    /// First value satisfying `predicate`
    pub async fn try_find<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool + Send,
    {
        self.chain.find(predicate).await
    }

    /// Remove the value at `index` and return it
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if the list is absent or `index` is outside
    /// `[0, count)`.
    pub async fn remove_at(&self, index: i64) -> Result<T> {
        self.chain.remove_at(index).await
    }

    /// Remove the first value satisfying `predicate`; no-op without a match
    pub async fn remove<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool + Send,
    {
        self.chain.remove_first_match(predicate).await
    }
}

impl<S, T> CollectionState for ListState<S, T>
where
    S: StateStore,
    T: StateValue,
{
    type Item = T;
    type Cursor<'a> = ListCursor<'a, S, T> where Self: 'a;

    async fn has_state(&self) -> Result<bool> {
        self.chain.has_state().await
    }

    async fn delete_state(&self) -> Result<()> {
        self.chain.delete().await
    }

    async fn count(&self) -> Result<u64> {
        self.chain.count().await
    }

    async fn contains<P>(&self, predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool + Send,
    {
        Ok(self.chain.find(predicate).await?.is_some())
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        self.chain.cursor()
    }
}
