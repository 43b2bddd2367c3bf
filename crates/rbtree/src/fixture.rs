//! Keyed record arena shared by the unit tests.

use crate::node::{NodeArena, NodeId, RbNode};
use crate::tree::RbRoot;

pub(crate) struct Rec {
    pub(crate) key: i64,
    pub(crate) rb: RbNode,
}

pub(crate) struct Keyed {
    recs: Vec<Rec>,
}

impl NodeArena for Keyed {
    fn node(&self, id: NodeId) -> &RbNode {
        &self.recs[id.index()].rb
    }
}

impl Keyed {
    pub(crate) fn new(keys: &[i64]) -> Self {
        Self {
            recs: keys
                .iter()
                .map(|&key| Rec {
                    key,
                    rb: RbNode::new(),
                })
                .collect(),
        }
    }

    pub(crate) fn key(&self, id: NodeId) -> i64 {
        self.recs[id.index()].key
    }

    /// Inserts record `i` by key; panics on a duplicate key.
    pub(crate) fn insert_at(&self, root: &RbRoot, i: usize) {
        let key = self.recs[i].key;
        let res = root.insert_by(self, NodeId::new(i), |probe| self.key(probe).cmp(&key));
        assert!(res.is_ok(), "duplicate key {key}");
    }

    pub(crate) fn find(&self, root: &RbRoot, key: i64) -> Option<NodeId> {
        root.find_by(self, |probe| self.key(probe).cmp(&key))
    }

    pub(crate) fn take_nodes(self) -> Vec<RbNode> {
        self.recs.into_iter().map(|r| r.rb).collect()
    }
}

pub(crate) fn in_order_keys(root: &RbRoot, arena: &Keyed) -> Vec<i64> {
    root.iter(arena).map(|id| arena.key(id)).collect()
}
