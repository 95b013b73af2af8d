//! StackState: LIFO over a linked chain
//!
//! Values are pushed and popped at the head. Both are O(1).

use std::sync::Arc;

use stateful_core::{Result, StateStore};

use crate::collection::{CollectionState, StateValue};
use crate::linked::{ChainCursor, LinkedChain};

/// Last-in first-out stack state
pub struct StackState<S, T> {
    chain: LinkedChain<S, T>,
}

impl<S, T> StackState<S, T>
where
    S: StateStore,
    T: StateValue,
{
    /// Create a stack handle over `store`
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        Self {
            chain: LinkedChain::new(store, name),
        }
    }

    /// State name
    pub fn name(&self) -> &str {
        self.chain.name()
    }

    /// Push a value on top
    pub async fn push(&self, value: T) -> Result<()> {
        self.chain.insert_first(vec![value]).await
    }

    /// Push values one after another; the last of them ends up on top
    pub async fn push_range(&self, values: impl IntoIterator<Item = T>) -> Result<()> {
        let mut values: Vec<T> = values.into_iter().collect();
        values.reverse();
        self.chain.insert_first(values).await
    }

    /// Remove and return the top value, or `None` if empty
    pub async fn try_pop(&self) -> Result<Option<T>> {
        self.chain.remove_first().await
    }

    /// Read the top value without removing it
    pub async fn try_peek(&self) -> Result<Option<T>> {
        self.chain.peek_first().await
    }
}

impl<S, T> CollectionState for StackState<S, T>
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
