//! Storage layer for Stateful
//!
//! This crate provides the reference implementation of the `StateStore`
//! key/value primitive:
//! - MemoryStore: BTreeMap-based storage behind a `parking_lot::RwLock`
//! - Record codec: MessagePack via `rmp-serde`, named fields
//! - StoreStats: per-operation counters for inspecting access patterns
//!
//! Production hosts supply their own `StateStore`; this one backs tests,
//! benchmarks and single-process embedding.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod memory;

pub use memory::{MemoryStore, StoreStats};
