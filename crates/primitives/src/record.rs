//! Persisted record types
//!
//! These are the only shapes the engines write besides user values.
//! Field names are part of the stored format.

use serde::{Deserialize, Serialize};

/// Per-collection metadata of a linked chain, stored under `<name>`
///
/// `first`/`last` are both `None` iff `count == 0`. `next` is the index the
/// next node will receive; it only grows, so node indices are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedManifest {
    /// Next node index to hand out
    pub next: u64,
    /// Number of live nodes
    pub count: u64,
    /// Index of the head node
    pub first: Option<u64>,
    /// Index of the tail node
    pub last: Option<u64>,
}

impl LinkedManifest {
    /// Hand out the next node index
    pub fn allocate(&mut self) -> u64 {
        let index = self.next;
        self.next += 1;
        index
    }
}

/// One element of a linked chain, stored under `<name>:<indexHex>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedNode<T> {
    /// Index of the preceding node
    pub previous: Option<u64>,
    /// Index of the following node
    pub next: Option<u64>,
    /// Stored element
    pub value: T,
}

/// Per-dictionary metadata, stored under `<name>`
///
/// `head`/`tail` thread the outer chain of buckets in bucket-insertion order.
/// `next` is a single sequence shared by every bucket's key-nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashManifest {
    /// Next key-node index to hand out
    pub next: u64,
    /// Number of live keys
    pub count: u64,
    /// Bucket id of the first bucket
    pub head: Option<u64>,
    /// Bucket id of the last bucket
    pub tail: Option<u64>,
}

impl HashManifest {
    /// Hand out the next key-node index
    pub fn allocate(&mut self) -> u64 {
        let index = self.next;
        self.next += 1;
        index
    }
}

/// One bucket of a dictionary, stored under `<name>:<hashHex>`
///
/// Exists iff at least one key-node hangs off it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashBucket {
    /// Bucket id (the hash code, possibly reduced)
    pub hash_code: u64,
    /// Previous bucket in the outer chain
    pub previous: Option<u64>,
    /// Next bucket in the outer chain
    pub next: Option<u64>,
    /// First key-node of this bucket
    pub head: Option<u64>,
    /// Last key-node of this bucket
    pub tail: Option<u64>,
}

impl HashBucket {
    /// Returns true once the last key-node has been unlinked
    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.tail.is_none()
    }
}

/// A dictionary key within its bucket's chain, stored under
/// `<name>:<hashHex>:<indexHex>`; the paired value lives under the same key
/// with a `:v` suffix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashKeyNode<K> {
    /// Original key
    pub key: K,
    /// Previous key-node in the bucket
    pub previous: Option<u64>,
    /// Next key-node in the bucket
    pub next: Option<u64>,
}
