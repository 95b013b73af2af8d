//! State primitives over a key/value store
//!
//! Provides typed state handles as stateless facades over a [`StateStore`]:
//! - **ObjectState**: a single value
//! - **ListState**: indexed sequence with positional insert and remove
//! - **QueueState**: FIFO over the linked chain
//! - **StackState**: LIFO over the linked chain
//! - **DictionaryState**: hash dictionary with chained buckets
//! - **ArrayState**: fixed-length array with default-valued slots
//!
//! ## Design Principle: Stateless Facades
//!
//! Handles hold only an `Arc` of the store and the state name. Every bit of
//! structure (manifests, nodes, buckets) lives in the store, so two handles
//! for the same name see the same state. The array length check is the one
//! piece of per-handle memory.
//!
//! ## Single Writer
//!
//! A structural mutation is several store calls with no locking in between.
//! At most one operation per state name may be in flight; the caller's
//! execution model has to guarantee that.
//!
//! ```rust,ignore
//! use stateful_primitives::{CollectionState, QueueState};
//!
//! let queue = QueueState::new(store.clone(), "jobs");
//! queue.enqueue_range([1, 2, 3]).await?;
//! assert_eq!(queue.try_dequeue().await?, Some(1));
//! assert_eq!(queue.count().await?, 2);
//! ```
//!
//! [`StateStore`]: stateful_core::StateStore

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod collection;
pub mod cursor;
pub mod dictionary;
pub mod linked;
pub mod list;
pub mod object;
pub mod queue;
pub mod record;
pub mod stack;

pub use array::{ArrayCursor, ArrayState};
pub use collection::{CollectionState, StateValue};
pub use cursor::StateCursor;
pub use dictionary::{BucketAddressing, DictionaryCursor, DictionaryState, StableHasher};
pub use linked::{ChainCursor, LinkedChain};
pub use list::{ListCursor, ListState};
pub use object::ObjectState;
pub use queue::QueueState;
pub use record::{HashBucket, HashKeyNode, HashManifest, LinkedManifest, LinkedNode};
pub use stack::StackState;
