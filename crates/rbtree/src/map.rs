use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use log::trace;

use crate::check::{TreeStats, Violation};
use crate::node::{LinkState, NodeId, RbNode};
use crate::traverse::{self, next_postorder};
use crate::tree::RbRoot;

struct Entry<K, V> {
    rb: RbNode,
    item: Option<(K, V)>,
}

impl<K, V> AsRef<RbNode> for Entry<K, V> {
    fn as_ref(&self) -> &RbNode {
        &self.rb
    }
}

/// Ordered map whose records carry their own tree anchors.
///
/// Records live in a slot arena and are recycled through a free list, so a
/// `NodeId` stays valid for as long as its key is present.
pub struct RbMap<K, V> {
    root: RbRoot,
    entries: Vec<Entry<K, V>>,
    free: Vec<NodeId>,
    len: usize,
}

fn probe_cmp<K, Q>(probe: &K, key: &Q) -> Ordering
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    <K as Borrow<Q>>::borrow(probe).cmp(key)
}

fn item_of<K, V>(entries: &[Entry<K, V>], id: NodeId) -> &(K, V) {
    entries[id.index()]
        .item
        .as_ref()
        .expect("linked entry holds an item")
}

impl<K: Ord, V> RbMap<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root: RbRoot::new(),
            entries: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    fn alloc(&mut self, key: K, value: V) -> NodeId {
        if let Some(id) = self.free.pop() {
            let entry = &mut self.entries[id.index()];
            entry.rb.clear();
            entry.item = Some((key, value));
            return id;
        }
        if self.entries.len() == self.entries.capacity() {
            trace!("rbmap arena full at {} slots, growing", self.entries.len());
        }
        let id = NodeId::new(self.entries.len());
        self.entries.push(Entry {
            rb: RbNode::new(),
            item: Some((key, value)),
        });
        id
    }

    fn release(&mut self, id: NodeId) -> (K, V) {
        let item = self.entries[id.index()]
            .item
            .take()
            .expect("released entry holds an item");
        self.free.push(id);
        item
    }

    fn pair(&self, id: NodeId) -> (&K, &V) {
        let (k, v) = item_of(&self.entries, id);
        (k, v)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let entries = &self.entries;
        self.root
            .find_by(entries, |p| probe_cmp(&item_of(entries, p).0, key))
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(self.pair(id).1)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        self.entries[id.index()].item.as_mut().map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts or overwrites, returning the previous value.
    ///
    /// An existing key is overwritten by swapping a fresh record into the old
    /// record's tree position, so no rebalancing happens.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let entries = &self.entries;
        let slot = self
            .root
            .find_slot_by(entries, |p| item_of(entries, p).0.cmp(&key));
        match slot {
            Ok(slot) => {
                let id = self.alloc(key, value);
                self.root.insert(&self.entries, id, slot);
                self.len += 1;
                None
            }
            Err(victim) => {
                let id = self.alloc(key, value);
                self.root.replace_node(&self.entries, victim, id);
                Some(self.release(victim).1)
            }
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(self.take(id))
    }

    fn take(&mut self, id: NodeId) -> (K, V) {
        self.root.erase(&self.entries, id);
        self.len -= 1;
        self.release(id)
    }

    /// Smallest entry with a key `>= key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let entries = &self.entries;
        let id = self
            .root
            .lower_bound_by(entries, |p| probe_cmp(&item_of(entries, p).0, key))?;
        Some(self.pair(id))
    }

    /// Smallest entry with a key `> key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let entries = &self.entries;
        let id = self
            .root
            .upper_bound_by(entries, |p| probe_cmp(&item_of(entries, p).0, key))?;
        Some(self.pair(id))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let id = self.root.first(&self.entries)?;
        Some(self.pair(id))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let id = self.root.last(&self.entries)?;
        Some(self.pair(id))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.root.first(&self.entries)?;
        Some(self.take(id))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.root.last(&self.entries)?;
        Some(self.take(id))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: &self.entries,
            inner: self.root.iter(&self.entries),
            remaining: self.len,
        }
    }

    /// Drops every entry, children before parents, keeping the slots for
    /// reuse. No rebalancing happens during the teardown.
    pub fn clear(&mut self) {
        let mut cur = self.root.first_postorder(&self.entries);
        while let Some(id) = cur {
            cur = next_postorder(&self.entries, id);
            self.entries[id.index()].rb.set_state(LinkState::Erased);
            drop(self.release(id));
        }
        self.root = RbRoot::new();
        self.len = 0;
    }

    /// Checks the tree invariants and strict key order.
    pub fn validate(&self) -> Result<TreeStats, Violation> {
        let entries = &self.entries;
        let stats = self.root.validate_order_by(entries, |a, b| {
            let ord = item_of(entries, a).0.cmp(&item_of(entries, b).0);
            // Keys are unique, so neighbors must strictly ascend.
            if ord == Ordering::Equal {
                Ordering::Greater
            } else {
                ord
            }
        })?;
        debug_assert_eq!(stats.len, self.len);
        Ok(stats)
    }
}

impl<K: Ord, V> Default for RbMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for RbMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, K, V> {
    entries: &'a [Entry<K, V>],
    inner: traverse::Iter<'a, Vec<Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.inner.next()?;
        self.remaining -= 1;
        let (k, v) = item_of(self.entries, id);
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.inner.next_back()?;
        self.remaining -= 1;
        let (k, v) = item_of(self.entries, id);
        Some((k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
