//! Ordered descent driven by caller comparators.
//!
//! The tree never compares. Every function here takes `f(probe)` returning
//! how `probe` orders relative to the target, the same convention as
//! [`slice::binary_search_by`].

use std::cmp::Ordering;

use crate::node::{Dir, NodeArena, NodeId};
use crate::tree::{RbRoot, Slot};

impl RbRoot {
    pub fn find_by<S, F>(&self, arena: &S, mut f: F) -> Option<NodeId>
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId) -> Ordering,
    {
        let mut x = self.top_id();
        while !x.is_nil() {
            x = match f(x) {
                Ordering::Less => arena.node(x).child_id(Dir::Right),
                Ordering::Greater => arena.node(x).child_id(Dir::Left),
                Ordering::Equal => return Some(x),
            };
        }
        None
    }

    /// Leaf slot where the target belongs, or `Err` with an equal node.
    pub fn find_slot_by<S, F>(&self, arena: &S, mut f: F) -> Result<Slot, NodeId>
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId) -> Ordering,
    {
        let mut x = self.top_id();
        if x.is_nil() {
            return Ok(Slot::Root);
        }
        loop {
            let dir = match f(x) {
                Ordering::Less => Dir::Right,
                Ordering::Greater => Dir::Left,
                Ordering::Equal => return Err(x),
            };
            let c = arena.node(x).child_id(dir);
            if c.is_nil() {
                return Ok(Slot::Child(x, dir));
            }
            x = c;
        }
    }

    /// Links `node` at its ordered position and rebalances.
    ///
    /// Refuses duplicates: returns the node that already orders equal.
    pub fn insert_by<S, F>(&self, arena: &S, node: NodeId, f: F) -> Result<(), NodeId>
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId) -> Ordering,
    {
        let slot = self.find_slot_by(arena, f)?;
        self.insert(arena, node, slot);
        Ok(())
    }

    /// Like [`insert_by`](Self::insert_by) but accepts equal nodes, placing
    /// `node` after every node that orders equal to it.
    pub fn insert_multi_by<S, F>(&self, arena: &S, node: NodeId, mut f: F)
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId) -> Ordering,
    {
        let mut x = self.top_id();
        if x.is_nil() {
            self.insert(arena, node, Slot::Root);
            return;
        }
        loop {
            let dir = if f(x) == Ordering::Greater {
                Dir::Left
            } else {
                Dir::Right
            };
            let c = arena.node(x).child_id(dir);
            if c.is_nil() {
                self.insert(arena, node, Slot::Child(x, dir));
                return;
            }
            x = c;
        }
    }

    /// First node that does not order before the target.
    pub fn lower_bound_by<S, F>(&self, arena: &S, mut f: F) -> Option<NodeId>
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId) -> Ordering,
    {
        let mut x = self.top_id();
        let mut best = NodeId::NIL;
        while !x.is_nil() {
            if f(x) == Ordering::Less {
                x = arena.node(x).child_id(Dir::Right);
            } else {
                best = x;
                x = arena.node(x).child_id(Dir::Left);
            }
        }
        best.get()
    }

    /// First node that orders after the target.
    pub fn upper_bound_by<S, F>(&self, arena: &S, mut f: F) -> Option<NodeId>
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId) -> Ordering,
    {
        let mut x = self.top_id();
        let mut best = NodeId::NIL;
        while !x.is_nil() {
            if f(x) == Ordering::Greater {
                best = x;
                x = arena.node(x).child_id(Dir::Left);
            } else {
                x = arena.node(x).child_id(Dir::Right);
            }
        }
        best.get()
    }
}
