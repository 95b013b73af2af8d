//! Stateful - typed collections over a minimal key/value store
//!
//! Stateful builds lists, queues, stacks, dictionaries, fixed arrays and
//! single values on top of any store that can check, get, set, add and
//! remove a record by string key.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use stateful::{MemoryStore, StateFactory, StateRegistry, StatefulConfig};
//!
//! let registry = StateRegistry::builder(StatefulConfig::default())
//!     .queue::<String>("jobs")
//!     .build()?;
//! let factory = StateFactory::with_store(registry, Arc::new(MemoryStore::new()));
//!
//! let unit = factory.create_unit();
//! let jobs = unit.queue::<String>("jobs")?;
//! jobs.enqueue("index".to_string()).await?;
//! assert_eq!(jobs.try_dequeue().await?.as_deref(), Some("index"));
//! unit.commit()?;
//! ```
//!
//! # Architecture
//!
//! - `stateful-core`: errors, state names, record keys, the [`StateStore`] trait
//! - `stateful-storage`: [`MemoryStore`], an in-process store
//! - `stateful-primitives`: the collection engines
//! - `stateful-engine`: configuration, registration and [`StateUnit`]

pub use stateful_core::{Error, Result, StateKey, StateStore};
pub use stateful_engine::{
    StateFactory, StateKind, StateRegistration, StateRegistry, StateRegistryBuilder, StateUnit,
    StatefulConfig, CONFIG_FILE_NAME,
};
pub use stateful_primitives::{
    ArrayState, BucketAddressing, CollectionState, DictionaryState, ListState, ObjectState,
    QueueState, StableHasher, StackState, StateCursor, StateValue,
};
pub use stateful_storage::{MemoryStore, StoreStats};
