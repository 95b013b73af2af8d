//! LinkedChain: doubly-linked node chain over the key/value namespace
//!
//! ## Design
//!
//! The store is an arena addressed by index. A manifest under `<name>` holds
//! the head/tail indices, the live count and a monotonic index counter; each
//! node lives under `<name>:<indexHex>` and carries the indices of its
//! neighbours. List, queue and stack are thin facades over this chain.
//!
//! Every mutation reads the manifest once, mutates it locally and writes it
//! back exactly once at the end. Structural repair is bounded: a splice
//! rewrites at most the two neighbours of the affected range.
//!
//! ## Concurrency
//!
//! A mutation is several independent store calls with no locking. Callers
//! must guarantee a single writer per collection name. An operation that is
//! cancelled or fails midway is not rolled back.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use stateful_core::{index_key, Error, Result, StateStore};

use crate::collection::StateValue;
use crate::cursor::StateCursor;
use crate::record::{LinkedManifest, LinkedNode};

/// A node together with the index it is stored under
type Located<T> = (u64, LinkedNode<T>);

/// Shared engine behind list, queue and stack state
pub struct LinkedChain<S, T> {
    store: Arc<S>,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<S, T> LinkedChain<S, T>
where
    S: StateStore,
    T: StateValue,
{
    /// Create a chain handle; nothing is read or written until first use
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// Name of the chain, also the key of its manifest
    pub fn name(&self) -> &str {
        &self.name
    }

    fn node_key(&self, index: u64) -> String {
        index_key(&self.name, index)
    }

    /// Read the manifest, if the chain has been materialized
    pub async fn manifest(&self) -> Result<Option<LinkedManifest>> {
        self.store.try_get(&self.name).await
    }

    async fn node(&self, index: u64) -> Result<LinkedNode<T>> {
        self.store.get(&self.node_key(index)).await
    }

    /// Returns true if the manifest exists
    pub async fn has_state(&self) -> Result<bool> {
        self.store.contains(&self.name).await
    }

    /// Number of nodes; zero if never materialized
    pub async fn count(&self) -> Result<u64> {
        Ok(self.manifest().await?.map_or(0, |m| m.count))
    }

    /// Remove every node and then the manifest
    pub async fn delete(&self) -> Result<()> {
        let Some(manifest) = self.manifest().await? else {
            return Ok(());
        };

        let mut removed = 0u64;
        let mut current = manifest.first;
        while let Some(index) = current {
            let key = self.node_key(index);
            let node: LinkedNode<T> = self.store.get(&key).await?;
            self.store.remove(&key).await?;
            removed += 1;
            current = node.next;
        }

        self.store.remove(&self.name).await?;
        debug!(name = %self.name, nodes = removed, "deleted linked chain");
        Ok(())
    }

    /// Prepend `values` as a unit, keeping their order
    pub async fn insert_first(&self, values: Vec<T>) -> Result<()> {
        let mut manifest = self.manifest().await?.unwrap_or_default();
        let following = match manifest.first {
            Some(index) => Some((index, self.node(index).await?)),
            None => None,
        };

        self.splice(&mut manifest, None, following, values).await?;
        self.store.set(&self.name, &manifest).await
    }

    /// Append `values` as a unit, keeping their order
    pub async fn insert_last(&self, values: Vec<T>) -> Result<()> {
        let mut manifest = self.manifest().await?.unwrap_or_default();
        let previous = match manifest.last {
            Some(index) => Some((index, self.node(index).await?)),
            None => None,
        };

        self.splice(&mut manifest, previous, None, values).await?;
        self.store.set(&self.name, &manifest).await
    }

    /// Insert `values` so the first of them ends up at `position`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` unless `0 <= position <= count`.
    pub async fn insert_at(&self, position: i64, values: Vec<T>) -> Result<()> {
        let mut manifest = self.manifest().await?.unwrap_or_default();
        let target = u64::try_from(position)
            .ok()
            .filter(|p| *p <= manifest.count)
            .ok_or_else(|| Error::index_out_of_range(position, manifest.count))?;

        let (previous, following) = if target == manifest.count {
            let previous = match manifest.last {
                Some(index) => Some((index, self.node(index).await?)),
                None => None,
            };
            (previous, None)
        } else {
            let mut previous: Option<Located<T>> = None;
            let mut current = manifest.first;
            for _ in 0..target {
                let index = current.ok_or_else(|| self.broken_chain())?;
                let node = self.node(index).await?;
                current = node.next;
                previous = Some((index, node));
            }
            let index = current.ok_or_else(|| self.broken_chain())?;
            (previous, Some((index, self.node(index).await?)))
        };

        self.splice(&mut manifest, previous, following, values).await?;
        self.store.set(&self.name, &manifest).await
    }

    /// Link a fresh run of nodes between `previous` and `following`
    ///
    /// `None` on either side means the run becomes the new head or tail.
    /// The manifest is updated in memory only.
    async fn splice(
        &self,
        manifest: &mut LinkedManifest,
        previous: Option<Located<T>>,
        following: Option<Located<T>>,
        values: Vec<T>,
    ) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let len = values.len();
        let indices: Vec<u64> = (0..len).map(|_| manifest.allocate()).collect();
        let before = previous.as_ref().map(|(index, _)| *index);
        let after = following.as_ref().map(|(index, _)| *index);

        for (i, value) in values.into_iter().enumerate() {
            let node = LinkedNode {
                previous: if i == 0 { before } else { Some(indices[i - 1]) },
                next: indices.get(i + 1).copied().or(after),
                value,
            };
            self.store.add(&self.node_key(indices[i]), &node).await?;
        }

        let run_first = indices[0];
        let run_last = indices[len - 1];

        match previous {
            Some((index, mut node)) => {
                node.next = Some(run_first);
                self.store.set(&self.node_key(index), &node).await?;
            }
            None => manifest.first = Some(run_first),
        }

        match following {
            Some((index, mut node)) => {
                node.previous = Some(run_last);
                self.store.set(&self.node_key(index), &node).await?;
            }
            None => manifest.last = Some(run_last),
        }

        manifest.count += len as u64;
        debug!(
            name = %self.name,
            first = run_first,
            last = run_last,
            count = manifest.count,
            "spliced nodes"
        );
        Ok(())
    }

    /// Remove the first node whose value satisfies `predicate`
    ///
    /// Returns the removed value, or `None` if nothing matched.
    pub async fn remove_first_match<P>(&self, mut predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool + Send,
    {
        let Some(mut manifest) = self.manifest().await? else {
            return Ok(None);
        };

        let mut previous: Option<Located<T>> = None;
        let mut current = manifest.first;
        while let Some(index) = current {
            let node = self.node(index).await?;
            if predicate(&node.value) {
                let value = self.unlink(&mut manifest, previous, index, node).await?;
                return Ok(Some(value));
            }
            current = node.next;
            previous = Some((index, node));
        }

        Ok(None)
    }

    /// Remove the node at `index`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if the chain is absent or `index` is outside
    /// `[0, count)`.
    pub async fn remove_at(&self, index: i64) -> Result<T> {
        let count = self.count().await?;
        let target = u64::try_from(index)
            .ok()
            .filter(|i| *i < count)
            .ok_or_else(|| Error::index_out_of_range(index, count))?;

        let mut hops = 0u64;
        self.remove_first_match(|_| {
            let hit = hops == target;
            hops += 1;
            hit
        })
        .await?
        .ok_or_else(|| self.broken_chain())
    }

    /// Remove the head node and return its value
    pub async fn remove_first(&self) -> Result<Option<T>> {
        let Some(mut manifest) = self.manifest().await? else {
            return Ok(None);
        };
        let Some(index) = manifest.first else {
            return Ok(None);
        };
        let Some(node) = self.store.try_get(&self.node_key(index)).await? else {
            return Ok(None);
        };

        let value = self.unlink(&mut manifest, None, index, node).await?;
        Ok(Some(value))
    }

    /// Read the head value without removing it
    pub async fn peek_first(&self) -> Result<Option<T>> {
        let Some(manifest) = self.manifest().await? else {
            return Ok(None);
        };
        let Some(index) = manifest.first else {
            return Ok(None);
        };
        let node: Option<LinkedNode<T>> = self.store.try_get(&self.node_key(index)).await?;
        Ok(node.map(|n| n.value))
    }

    /// Splice a node out of the chain, delete it and persist the manifest
    async fn unlink(
        &self,
        manifest: &mut LinkedManifest,
        previous: Option<Located<T>>,
        index: u64,
        node: LinkedNode<T>,
    ) -> Result<T> {
        match previous {
            Some((previous_index, mut previous_node)) => {
                previous_node.next = node.next;
                self.store
                    .set(&self.node_key(previous_index), &previous_node)
                    .await?;
            }
            None => manifest.first = node.next,
        }

        match node.next {
            Some(next_index) => {
                let mut next_node = self.node(next_index).await?;
                next_node.previous = node.previous;
                self.store.set(&self.node_key(next_index), &next_node).await?;
            }
            None => manifest.last = node.previous,
        }

        self.store.remove(&self.node_key(index)).await?;
        manifest.count = manifest.count.saturating_sub(1);
        self.store.set(&self.name, &*manifest).await?;

        debug!(name = %self.name, index, count = manifest.count, "unlinked node");
        Ok(node.value)
    }

    /// Walk from the head and return the first value satisfying `predicate`
    pub async fn find<P>(&self, mut predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool + Send,
    {
        let Some(manifest) = self.manifest().await? else {
            return Ok(None);
        };

        let mut current = manifest.first;
        while let Some(index) = current {
            let node = self.node(index).await?;
            if predicate(&node.value) {
                return Ok(Some(node.value));
            }
            current = node.next;
        }
        Ok(None)
    }

    /// Value at `index`, or `None` if absent or out of range
    pub async fn get_at(&self, index: i64) -> Result<Option<T>> {
        let count = self.count().await?;
        let Some(target) = u64::try_from(index).ok().filter(|i| *i < count) else {
            return Ok(None);
        };

        let mut hops = 0u64;
        self.find(|_| {
            let hit = hops == target;
            hops += 1;
            hit
        })
        .await
    }

    /// Every value in chain order, or `None` if never materialized
    pub async fn values(&self) -> Result<Option<Vec<T>>> {
        let Some(manifest) = self.manifest().await? else {
            return Ok(None);
        };

        let mut values = Vec::with_capacity(manifest.count as usize);
        let mut current = manifest.first;
        while let Some(index) = current {
            let node = self.node(index).await?;
            current = node.next;
            values.push(node.value);
        }
        Ok(Some(values))
    }

    /// Lazy cursor from the head
    pub fn cursor(&self) -> ChainCursor<'_, S, T> {
        ChainCursor {
            chain: self,
            position: Position::Start,
        }
    }

    fn broken_chain(&self) -> Error {
        Error::NotFound(format!("{}: node chain shorter than manifest count", self.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Start,
    At(u64),
    End,
}

/// Forward cursor over a linked chain
pub struct ChainCursor<'a, S, T> {
    chain: &'a LinkedChain<S, T>,
    position: Position,
}

impl<'a, S, T> StateCursor for ChainCursor<'a, S, T>
where
    S: StateStore,
    T: StateValue,
{
    type Item = T;

    async fn next(&mut self) -> Result<Option<T>> {
        let index = match self.position {
            Position::Start => self.chain.manifest().await?.and_then(|m| m.first),
            Position::At(index) => Some(index),
            Position::End => None,
        };

        let Some(index) = index else {
            self.position = Position::End;
            return Ok(None);
        };

        let node = self.chain.node(index).await?;
        self.position = node.next.map_or(Position::End, Position::At);
        Ok(Some(node.value))
    }

    fn reset(&mut self) {
        self.position = Position::Start;
    }
}
