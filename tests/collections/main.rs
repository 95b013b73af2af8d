//! Collection Integration Tests
//!
//! Drives every collection kind through factory and unit against the
//! in-memory store:
//! - Linked collections: list, queue, stack laws and splices
//! - Dictionary: keys, buckets, teardown
//! - Array: bounds, defaults, persisted length
//! - Unit: lifecycle, handle caching, configuration

#[path = "../common/mod.rs"]
mod common;

mod array;
mod config;
mod dictionary;
mod linked;
mod teardown;
mod unit;
