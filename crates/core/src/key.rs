//! State names and derived record keys
//!
//! Every collection lives under a single name in the flat key/value namespace.
//! Its records are addressed by keys derived from that name:
//!
//! | Record | Key |
//! |---|---|
//! | Manifest / array length marker / object | `<name>` |
//! | Linked node, array slot | `<name>:<indexHex>` |
//! | Dictionary bucket | `<name>:<hashHex>` |
//! | Dictionary key-node | `<name>:<hashHex>:<indexHex>` |
//! | Dictionary value | `<name>:<hashHex>:<indexHex>:v` |
//!
//! ## Contract
//!
//! These formats are FROZEN: hex digits are uppercase with no padding and no
//! `0x` prefix. Changing them orphans every persisted collection.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// Name of a registered state
///
/// Equality, hashing and ordering ignore case, so `"Orders"` and `"orders"`
/// resolve to the same registration. The original spelling is kept for
/// display and is the prefix of every derived record key.
#[derive(Debug, Clone)]
pub struct StateKey {
    name: String,
}

impl StateKey {
    /// Create a new state key
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self { name })
    }

    /// The state name as given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.name.chars().flat_map(char::to_lowercase)
    }
}

impl PartialEq for StateKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for StateKey {}

impl Hash for StateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            c.hash(state);
        }
    }
}

impl Ord for StateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for StateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Validate a state name
///
/// Names must be non-empty; anything else is accepted verbatim.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "state name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Key of a linked node or array slot: `<name>:<indexHex>`
pub fn index_key(name: &str, index: u64) -> String {
    format!("{}:{:X}", name, index)
}

/// Key of a dictionary bucket: `<name>:<hashHex>`
pub fn bucket_key(name: &str, bucket: u64) -> String {
    format!("{}:{:X}", name, bucket)
}

/// Key of a dictionary key-node: `<name>:<hashHex>:<indexHex>`
pub fn entry_key(name: &str, bucket: u64, index: u64) -> String {
    format!("{}:{:X}:{:X}", name, bucket, index)
}

/// Key of a dictionary value: `<name>:<hashHex>:<indexHex>:v`
pub fn value_key(name: &str, bucket: u64, index: u64) -> String {
    format!("{}:{:X}:{:X}:v", name, bucket, index)
}
