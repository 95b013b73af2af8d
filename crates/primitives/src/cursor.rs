//! Lazy forward cursors over persisted collections
//!
//! A cursor reads one record per step and never materializes the whole
//! collection. Cursors are not isolated from concurrent mutation: a cursor
//! is only meaningful while no other operation mutates the same collection.

use std::future::Future;

use stateful_core::Result;

/// Async forward cursor
pub trait StateCursor: Send {
    /// Element produced per step
    type Item: Send;

    /// Advance and return the next element, or `None` once exhausted
    ///
    /// An exhausted cursor keeps returning `None` until `reset`.
    fn next(&mut self) -> impl Future<Output = Result<Option<Self::Item>>> + Send;

    /// Rewind to the beginning
    fn reset(&mut self);

    /// Drain the remaining elements into a `Vec`
    fn collect(&mut self) -> impl Future<Output = Result<Vec<Self::Item>>> + Send
    where
        Self: Sized,
    {
        async move {
            let mut items = Vec::new();
            while let Some(item) = self.next().await? {
                items.push(item);
            }
            Ok(items)
        }
    }
}
