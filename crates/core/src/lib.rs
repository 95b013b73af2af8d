//! Core types and traits for Stateful
//!
//! This crate defines the foundational types shared by every layer:
//! - Error: Error taxonomy and `Result` alias
//! - StateKey: Case-insensitive name of a registered state
//! - Key composition: The derived record keys for nodes, slots, buckets and entries
//! - StateStore: The minimal key/value primitive every collection is built on

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod traits;

pub use error::{Error, Result};
pub use key::{bucket_key, entry_key, index_key, value_key, StateKey};
pub use traits::StateStore;
