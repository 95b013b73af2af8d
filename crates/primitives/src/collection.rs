//! Common surface of every multi-element state

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stateful_core::Result;

use crate::cursor::StateCursor;

/// Bound shared by every element, key and value type stored in a state
pub trait StateValue: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> StateValue for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Operations shared by list, queue, stack, array and dictionary state
pub trait CollectionState: Send + Sync {
    /// Element type yielded by `cursor` and tested by `contains`
    type Item: Send + 'static;

    /// Cursor type returned by `cursor`
    type Cursor<'a>: StateCursor<Item = Self::Item>
    where
        Self: 'a;

    /// Returns true if the state has been materialized in the store
    fn has_state(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Remove every record of the state
    fn delete_state(&self) -> impl Future<Output = Result<()>> + Send;

    /// Number of elements
    fn count(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Returns true if any element satisfies `predicate`; stops at the first match
    fn contains<P>(&self, predicate: P) -> impl Future<Output = Result<bool>> + Send
    where
        P: FnMut(&Self::Item) -> bool + Send;

    /// Lazy cursor positioned before the first element
    fn cursor(&self) -> Self::Cursor<'_>;

    /// Returns true if any element equals `value`
    fn contains_value(&self, value: &Self::Item) -> impl Future<Output = Result<bool>> + Send
    where
        Self::Item: PartialEq + Sync,
    {
        self.contains(move |item| item == value)
    }
}
