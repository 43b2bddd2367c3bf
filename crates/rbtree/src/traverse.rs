use std::iter::FusedIterator;

use crate::node::{Dir, NodeArena, NodeId};
use crate::tree::RbRoot;

#[inline(always)]
fn extreme<S: NodeArena + ?Sized>(arena: &S, mut x: NodeId, dir: Dir) -> NodeId {
    loop {
        let c = arena.node(x).child_id(dir);
        if c.is_nil() {
            return x;
        }
        x = c;
    }
}

/// In-order neighbor of `x` in direction `dir` (`Right` = successor).
fn step<S: NodeArena + ?Sized>(arena: &S, x: NodeId, dir: Dir) -> NodeId {
    let c = arena.node(x).child_id(dir);
    if !c.is_nil() {
        return extreme(arena, c, dir.opposite());
    }
    let mut x = x;
    loop {
        let p = arena.node(x).parent_id();
        if p.is_nil() || arena.node(p).child_id(dir) != x {
            return p;
        }
        x = p;
    }
}

/// Deepest node reached by preferring left children, then right ones.
fn left_deepest<S: NodeArena + ?Sized>(arena: &S, mut x: NodeId) -> NodeId {
    loop {
        let n = arena.node(x);
        let l = n.child_id(Dir::Left);
        if !l.is_nil() {
            x = l;
            continue;
        }
        let r = n.child_id(Dir::Right);
        if !r.is_nil() {
            x = r;
            continue;
        }
        return x;
    }
}

/// In-order successor of a linked node, `None` after the last one.
pub fn next<S: NodeArena + ?Sized>(arena: &S, node: NodeId) -> Option<NodeId> {
    debug_assert!(arena.node(node).is_linked(), "{node:?} is not linked");
    step(arena, node, Dir::Right).get()
}

/// In-order predecessor of a linked node, `None` before the first one.
pub fn prev<S: NodeArena + ?Sized>(arena: &S, node: NodeId) -> Option<NodeId> {
    debug_assert!(arena.node(node).is_linked(), "{node:?} is not linked");
    step(arena, node, Dir::Left).get()
}

/// Postorder successor of `node`.
///
/// Reads only `node`'s parent link and nodes not yet visited, so the caller
/// may release `node`'s record once this returns. Rebalancing operations
/// (including [`RbRoot::erase`]) must not run during the walk.
pub fn next_postorder<S: NodeArena + ?Sized>(arena: &S, node: NodeId) -> Option<NodeId> {
    let p = arena.node(node).parent_id();
    if p.is_nil() {
        return None;
    }
    let np = arena.node(p);
    if np.child_id(Dir::Left) == node {
        let r = np.child_id(Dir::Right);
        if !r.is_nil() {
            return Some(left_deepest(arena, r));
        }
    }
    Some(p)
}

impl RbRoot {
    pub fn first<S: NodeArena + ?Sized>(&self, arena: &S) -> Option<NodeId> {
        let top = self.top_id();
        if top.is_nil() {
            return None;
        }
        Some(extreme(arena, top, Dir::Left))
    }

    pub fn last<S: NodeArena + ?Sized>(&self, arena: &S) -> Option<NodeId> {
        let top = self.top_id();
        if top.is_nil() {
            return None;
        }
        Some(extreme(arena, top, Dir::Right))
    }

    pub fn first_postorder<S: NodeArena + ?Sized>(&self, arena: &S) -> Option<NodeId> {
        let top = self.top_id();
        if top.is_nil() {
            return None;
        }
        Some(left_deepest(arena, top))
    }

    /// In-order iterator over linked nodes.
    pub fn iter<'a, S: NodeArena + ?Sized>(&self, arena: &'a S) -> Iter<'a, S> {
        Iter {
            arena,
            front: self.first(arena),
            back: self.last(arena),
        }
    }

    /// Postorder iterator; children are yielded before their parent.
    pub fn iter_postorder<'a, S: NodeArena + ?Sized>(&self, arena: &'a S) -> Postorder<'a, S> {
        Postorder {
            arena,
            cur: self.first_postorder(arena),
        }
    }
}

pub struct Iter<'a, S: NodeArena + ?Sized> {
    arena: &'a S,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<S: NodeArena + ?Sized> Iterator for Iter<'_, S> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let x = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = next(self.arena, x);
        }
        Some(x)
    }
}

impl<S: NodeArena + ?Sized> DoubleEndedIterator for Iter<'_, S> {
    fn next_back(&mut self) -> Option<NodeId> {
        let x = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = prev(self.arena, x);
        }
        Some(x)
    }
}

impl<S: NodeArena + ?Sized> FusedIterator for Iter<'_, S> {}

pub struct Postorder<'a, S: NodeArena + ?Sized> {
    arena: &'a S,
    cur: Option<NodeId>,
}

impl<S: NodeArena + ?Sized> Iterator for Postorder<'_, S> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let x = self.cur?;
        self.cur = next_postorder(self.arena, x);
        Some(x)
    }
}

impl<S: NodeArena + ?Sized> FusedIterator for Postorder<'_, S> {}
