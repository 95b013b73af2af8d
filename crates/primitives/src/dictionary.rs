//! DictionaryState: hash dictionary over the key/value namespace
//!
//! ## Key Design
//!
//! - Manifest: `<name>` ([`HashManifest`])
//! - Bucket: `<name>:<bucketHex>` ([`HashBucket`]), one per observed bucket id
//! - Key-node: `<name>:<bucketHex>:<indexHex>` ([`HashKeyNode`])
//! - Value: `<name>:<bucketHex>:<indexHex>:v`
//!
//! Buckets are resolved by direct key lookup, never by scanning the outer
//! chain. The outer chain only exists for enumeration and teardown, and keeps
//! buckets in the order they were first created. Within a bucket, keys keep
//! insertion order and are compared in full, so colliding keys coexist.
//!
//! Key-node indices come from one sequence in the manifest shared by all
//! buckets.

use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::num::NonZeroU64;
use std::sync::Arc;

use tracing::debug;
use xxhash_rust::xxh3::Xxh3;

use stateful_core::{bucket_key, entry_key, value_key, Error, Result, StateStore};

use crate::collection::{CollectionState, StateValue};
use crate::cursor::StateCursor;
use crate::record::{HashBucket, HashKeyNode, HashManifest};

/// Default hash builder for dictionaries: xxh3 with seed 0
///
/// Bucket ids are persisted, so the hash must not change between processes.
/// `std`'s `RandomState` is seeded per process and cannot be used here.
///
/// The key reaches xxh3 through [`Hash`], whose byte stream is not a fixed
/// format: it carries length prefixes, the `str` terminator byte and
/// native-endian integers. Bucket ids are therefore only stable for one
/// target endianness and pointer width, and only while the key type's
/// `Hash` impl and the std `Hasher` write methods stay unchanged. Move a
/// store across platforms or toolchains only after checking that the ids
/// still match, or inject a hasher with a canonical encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StableHasher;

impl BuildHasher for StableHasher {
    type Hasher = Xxh3;

    fn build_hasher(&self) -> Xxh3 {
        Xxh3::new()
    }
}

/// How a key's hash is turned into a bucket id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketAddressing {
    /// The full 64-bit hash is the bucket id
    #[default]
    Raw,
    /// The hash reduced modulo a fixed bucket count
    Modulo(NonZeroU64),
}

impl BucketAddressing {
    /// Bucket id for `hash`
    pub fn bucket(self, hash: u64) -> u64 {
        match self {
            BucketAddressing::Raw => hash,
            BucketAddressing::Modulo(buckets) => hash % buckets.get(),
        }
    }
}

/// A key-node together with the index it is stored under
type Located<K> = (u64, HashKeyNode<K>);

/// Hash dictionary state
///
/// The addressing mode and the hasher are part of the stored format: a
/// dictionary must always be reopened with the same pair.
pub struct DictionaryState<S, K, V, H = StableHasher> {
    store: Arc<S>,
    name: String,
    hasher: H,
    addressing: BucketAddressing,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<S, K, V> DictionaryState<S, K, V, StableHasher>
where
    S: StateStore,
    K: StateValue + Hash + Eq,
    V: StateValue,
{
    /// Create a dictionary handle with the stable default hasher
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        Self::with_hasher(store, name, StableHasher)
    }
}

impl<S, K, V, H> DictionaryState<S, K, V, H>
where
    S: StateStore,
    K: StateValue + Hash + Eq,
    V: StateValue,
    H: BuildHasher + Send + Sync,
{
    /// Create a dictionary handle with a caller-supplied hasher
    pub fn with_hasher(store: Arc<S>, name: impl Into<String>, hasher: H) -> Self {
        Self {
            store,
            name: name.into(),
            hasher,
            addressing: BucketAddressing::Raw,
            _marker: PhantomData,
        }
    }

    /// Set the bucket addressing mode
    pub fn with_addressing(mut self, addressing: BucketAddressing) -> Self {
        self.addressing = addressing;
        self
    }

    /// State name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bucket id `key` is stored under
    pub fn bucket_of(&self, key: &K) -> u64 {
        self.addressing.bucket(self.hasher.hash_one(key))
    }

    /// Read the manifest, if the dictionary has been materialized
    pub async fn manifest(&self) -> Result<Option<HashManifest>> {
        self.store.try_get(&self.name).await
    }

    async fn bucket(&self, bucket: u64) -> Result<Option<HashBucket>> {
        self.store.try_get(&bucket_key(&self.name, bucket)).await
    }

    async fn key_node(&self, bucket: u64, index: u64) -> Result<HashKeyNode<K>> {
        self.store.get(&entry_key(&self.name, bucket, index)).await
    }

    /// Walk a bucket's key chain for `key`
    async fn locate(&self, bucket: &HashBucket, key: &K) -> Result<Option<Located<K>>> {
        let mut current = bucket.head;
        while let Some(index) = current {
            let node = self.key_node(bucket.hash_code, index).await?;
            if node.key == *key {
                return Ok(Some((index, node)));
            }
            current = node.next;
        }
        Ok(None)
    }

    /// Insert a new key
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if `key` is already present.
    pub async fn add(&self, key: K, value: V) -> Result<()> {
        let bucket_id = self.bucket_of(&key);
        let existing = self.bucket(bucket_id).await?;
        if let Some(bucket) = &existing {
            if self.locate(bucket, &key).await?.is_some() {
                return Err(Error::DuplicateKey);
            }
        }

        let mut manifest = self.manifest().await?.unwrap_or_default();
        let mut bucket = match existing {
            Some(bucket) => bucket,
            None => self.link_bucket(&mut manifest, bucket_id).await?,
        };

        let index = manifest.allocate();
        let node = HashKeyNode {
            key,
            previous: bucket.tail,
            next: None,
        };

        match bucket.tail {
            Some(tail) => {
                let mut tail_node = self.key_node(bucket_id, tail).await?;
                tail_node.next = Some(index);
                self.store
                    .set(&entry_key(&self.name, bucket_id, tail), &tail_node)
                    .await?;
            }
            None => bucket.head = Some(index),
        }
        bucket.tail = Some(index);

        self.store
            .set(&value_key(&self.name, bucket_id, index), &value)
            .await?;
        self.store
            .set(&entry_key(&self.name, bucket_id, index), &node)
            .await?;
        self.store
            .set(&bucket_key(&self.name, bucket_id), &bucket)
            .await?;

        manifest.count += 1;
        self.store.set(&self.name, &manifest).await
    }

    /// Append a fresh bucket to the outer chain; the bucket itself is not written
    async fn link_bucket(&self, manifest: &mut HashManifest, bucket_id: u64) -> Result<HashBucket> {
        let bucket = HashBucket {
            hash_code: bucket_id,
            previous: manifest.tail,
            ..HashBucket::default()
        };

        match manifest.tail {
            Some(tail) => {
                let mut tail_bucket = self
                    .bucket(tail)
                    .await?
                    .ok_or_else(|| self.broken_bucket(tail))?;
                tail_bucket.next = Some(bucket_id);
                self.store
                    .set(&bucket_key(&self.name, tail), &tail_bucket)
                    .await?;
            }
            None => manifest.head = Some(bucket_id),
        }
        manifest.tail = Some(bucket_id);

        debug!(name = %self.name, bucket = bucket_id, "created bucket");
        Ok(bucket)
    }

    /// Returns true if `key` is present
    pub async fn contains_key(&self, key: &K) -> Result<bool> {
        match self.bucket(self.bucket_of(key)).await? {
            Some(bucket) => Ok(self.locate(&bucket, key).await?.is_some()),
            None => Ok(false),
        }
    }

    /// Value stored for `key`, if any
    pub async fn try_get_value(&self, key: &K) -> Result<Option<V>> {
        let bucket_id = self.bucket_of(key);
        let Some(bucket) = self.bucket(bucket_id).await? else {
            return Ok(None);
        };
        let Some((index, _)) = self.locate(&bucket, key).await? else {
            return Ok(None);
        };
        self.store
            .get(&value_key(&self.name, bucket_id, index))
            .await
            .map(Some)
    }

    /// Remove `key` and its value; returns whether the key was present
    ///
    /// A bucket left without keys is unlinked from the outer chain and
    /// deleted.
    pub async fn remove(&self, key: &K) -> Result<bool> {
        let bucket_id = self.bucket_of(key);
        let Some(mut bucket) = self.bucket(bucket_id).await? else {
            return Ok(false);
        };
        let Some((index, node)) = self.locate(&bucket, key).await? else {
            return Ok(false);
        };
        let mut manifest = self
            .manifest()
            .await?
            .ok_or_else(|| Error::NotFound(self.name.clone()))?;

        match node.previous {
            Some(previous) => {
                let mut previous_node = self.key_node(bucket_id, previous).await?;
                previous_node.next = node.next;
                self.store
                    .set(&entry_key(&self.name, bucket_id, previous), &previous_node)
                    .await?;
            }
            None => bucket.head = node.next,
        }
        match node.next {
            Some(next) => {
                let mut next_node = self.key_node(bucket_id, next).await?;
                next_node.previous = node.previous;
                self.store
                    .set(&entry_key(&self.name, bucket_id, next), &next_node)
                    .await?;
            }
            None => bucket.tail = node.previous,
        }

        self.store
            .remove(&entry_key(&self.name, bucket_id, index))
            .await?;
        self.store
            .remove(&value_key(&self.name, bucket_id, index))
            .await?;

        if bucket.is_empty() {
            self.unlink_bucket(&mut manifest, &bucket).await?;
        } else {
            self.store
                .set(&bucket_key(&self.name, bucket_id), &bucket)
                .await?;
        }

        manifest.count = manifest.count.saturating_sub(1);
        self.store.set(&self.name, &manifest).await?;
        Ok(true)
    }

    async fn unlink_bucket(&self, manifest: &mut HashManifest, bucket: &HashBucket) -> Result<()> {
        match bucket.previous {
            Some(previous) => {
                let mut previous_bucket = self
                    .bucket(previous)
                    .await?
                    .ok_or_else(|| self.broken_bucket(previous))?;
                previous_bucket.next = bucket.next;
                self.store
                    .set(&bucket_key(&self.name, previous), &previous_bucket)
                    .await?;
            }
            None => manifest.head = bucket.next,
        }
        match bucket.next {
            Some(next) => {
                let mut next_bucket = self
                    .bucket(next)
                    .await?
                    .ok_or_else(|| self.broken_bucket(next))?;
                next_bucket.previous = bucket.previous;
                self.store
                    .set(&bucket_key(&self.name, next), &next_bucket)
                    .await?;
            }
            None => manifest.tail = bucket.previous,
        }

        self.store
            .remove(&bucket_key(&self.name, bucket.hash_code))
            .await?;
        debug!(name = %self.name, bucket = bucket.hash_code, "pruned empty bucket");
        Ok(())
    }

    fn broken_bucket(&self, bucket: u64) -> Error {
        Error::NotFound(bucket_key(&self.name, bucket))
    }
}

impl<S, K, V, H> CollectionState for DictionaryState<S, K, V, H>
where
    S: StateStore,
    K: StateValue + Hash + Eq,
    V: StateValue,
    H: BuildHasher + Send + Sync,
{
    type Item = (K, V);
    type Cursor<'a> = DictionaryCursor<'a, S, K, V, H> where Self: 'a;

    async fn has_state(&self) -> Result<bool> {
        self.store.contains(&self.name).await
    }

    /// Remove every bucket, key-node and value, then the manifest
    async fn delete_state(&self) -> Result<()> {
        let Some(manifest) = self.manifest().await? else {
            return Ok(());
        };

        let mut removed = 0u64;
        let mut current_bucket = manifest.head;
        while let Some(bucket_id) = current_bucket {
            let bucket = self
                .bucket(bucket_id)
                .await?
                .ok_or_else(|| self.broken_bucket(bucket_id))?;

            let mut current = bucket.head;
            while let Some(index) = current {
                let node = self.key_node(bucket_id, index).await?;
                self.store
                    .remove(&entry_key(&self.name, bucket_id, index))
                    .await?;
                self.store
                    .remove(&value_key(&self.name, bucket_id, index))
                    .await?;
                removed += 2;
                current = node.next;
            }

            self.store
                .remove(&bucket_key(&self.name, bucket_id))
                .await?;
            removed += 1;
            current_bucket = bucket.next;
        }

        self.store.remove(&self.name).await?;
        debug!(name = %self.name, records = removed + 1, "deleted dictionary");
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.manifest().await?.map_or(0, |m| m.count))
    }

    async fn contains<P>(&self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&(K, V)) -> bool + Send,
    {
        let mut cursor = self.cursor();
        while let Some(entry) = cursor.next().await? {
            if predicate(&entry) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        DictionaryCursor {
            dictionary: self,
            position: Position::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Start,
    /// Load this bucket next
    Bucket(Option<u64>),
    /// Inside `bucket`, `node` is the next key-node to read
    Node {
        bucket: u64,
        node: Option<u64>,
        following: Option<u64>,
    },
    End,
}

/// Cursor over key/value pairs: buckets in creation order, keys in insertion order
pub struct DictionaryCursor<'a, S, K, V, H> {
    dictionary: &'a DictionaryState<S, K, V, H>,
    position: Position,
}

impl<'a, S, K, V, H> StateCursor for DictionaryCursor<'a, S, K, V, H>
where
    S: StateStore,
    K: StateValue + Hash + Eq,
    V: StateValue,
    H: BuildHasher + Send + Sync,
{
    type Item = (K, V);

    async fn next(&mut self) -> Result<Option<(K, V)>> {
        let dictionary = self.dictionary;
        loop {
            match self.position {
                Position::End => return Ok(None),
                Position::Start => {
                    self.position = match dictionary.manifest().await? {
                        Some(manifest) => Position::Bucket(manifest.head),
                        None => Position::End,
                    };
                }
                Position::Bucket(None) => self.position = Position::End,
                Position::Bucket(Some(bucket_id)) => {
                    let bucket = dictionary
                        .bucket(bucket_id)
                        .await?
                        .ok_or_else(|| dictionary.broken_bucket(bucket_id))?;
                    self.position = Position::Node {
                        bucket: bucket_id,
                        node: bucket.head,
                        following: bucket.next,
                    };
                }
                Position::Node {
                    node: None,
                    following,
                    ..
                } => self.position = Position::Bucket(following),
                Position::Node {
                    bucket,
                    node: Some(index),
                    following,
                } => {
                    let node = dictionary.key_node(bucket, index).await?;
                    let value: V = dictionary
                        .store
                        .get(&value_key(&dictionary.name, bucket, index))
                        .await?;
                    self.position = Position::Node {
                        bucket,
                        node: node.next,
                        following,
                    };
                    return Ok(Some((node.key, value)));
                }
            }
        }
    }

    fn reset(&mut self) {
        self.position = Position::Start;
    }
}
