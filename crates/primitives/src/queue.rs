//! QueueState: FIFO over a linked chain
//!
//! Values are enqueued at the tail and dequeued from the head, so they leave
//! in the order they entered. Both ends are O(1).

use std::sync::Arc;

use stateful_core::{Result, StateStore};

use crate::collection::{CollectionState, StateValue};
use crate::linked::{ChainCursor, LinkedChain};

/// First-in first-out queue state
pub struct QueueState<S, T> {
    chain: LinkedChain<S, T>,
}

impl<S, T> QueueState<S, T>
where
    S: StateStore,
    T: StateValue,
{
    /// Create a queue handle over `store`
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        Self {
            chain: LinkedChain::new(store, name),
        }
    }

    /// State name
    pub fn name(&self) -> &str {
        self.chain.name()
    }

    /// Add a value at the tail
    pub async fn enqueue(&self, value: T) -> Result<()> {
        self.chain.insert_last(vec![value]).await
    }

    /// Add values at the tail; the first of them is dequeued first
    pub async fn enqueue_range(&self, values: impl IntoIterator<Item = T>) -> Result<()> {
        self.chain.insert_last(values.into_iter().collect()).await
    }

    /// Remove and return the head value, or `None` if empty
    pub async fn try_dequeue(&self) -> Result<Option<T>> {
        self.chain.remove_first().await
    }

    /// Read the head value without removing it
    pub async fn try_peek(&self) -> Result<Option<T>> {
        self.chain.peek_first().await
    }
}

impl<S, T> CollectionState for QueueState<S, T>
where
    S: StateStore,
    T: StateValue,
{
    type Item = T;
    type Cursor<'a> = ChainCursor<'a, S, T> where Self: 'a;

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
