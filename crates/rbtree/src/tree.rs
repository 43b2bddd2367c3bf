use std::sync::atomic::{AtomicU32, Ordering};

use crate::node::{Color, Dir, LinkState, NodeArena, NodeId};

/// Position a new leaf is linked into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The tree is empty and the node becomes its root.
    Root,
    /// The empty `Dir` child slot of an already linked parent.
    Child(NodeId, Dir),
}

/// Top reference of one red-black tree.
///
/// The root owns no memory: records and their [`RbNode`](crate::RbNode)
/// anchors live in the caller's arena, which is passed to every call.
///
/// At most one mutating call may be in flight per tree. Readers may descend
/// concurrently with that writer and observe a stale but well-formed tree.
pub struct RbRoot {
    top: AtomicU32,
}

#[inline(always)]
fn is_red<S: NodeArena + ?Sized>(arena: &S, x: NodeId) -> bool {
    !x.is_nil() && arena.node(x).is_red()
}

impl RbRoot {
    pub const fn new() -> Self {
        Self {
            top: AtomicU32::new(u32::MAX),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top_id().is_nil()
    }

    #[inline]
    pub fn top(&self) -> Option<NodeId> {
        self.top_id().get()
    }

    #[inline(always)]
    pub(crate) fn top_id(&self) -> NodeId {
        NodeId::new_raw(self.top.load(Ordering::Acquire))
    }

    #[inline(always)]
    fn store_top(&self, id: NodeId, order: Ordering) {
        self.top.store(id.raw(), order);
    }

    /// Replaces `old` by `new` in the child slot of `parent` (or at the top).
    fn change_child<S: NodeArena + ?Sized>(
        &self,
        arena: &S,
        old: NodeId,
        new: NodeId,
        parent: NodeId,
    ) {
        if parent.is_nil() {
            self.store_top(new, Ordering::Release);
        } else {
            let p = arena.node(parent);
            let dir = p.dir_of(old);
            p.publish_child(dir, new);
        }
    }

    /// Attaches `node` as a red leaf at `slot`.
    ///
    /// The caller found `slot` by its own ordered descent. Invariants are not
    /// restored until [`insert_color`](Self::insert_color) runs on `node`,
    /// which must happen before any other mutation of this tree.
    pub fn link_node<S: NodeArena + ?Sized>(&self, arena: &S, node: NodeId, slot: Slot) {
        self.link_with(arena, node, slot, Ordering::Relaxed);
    }

    /// Like [`link_node`](Self::link_node), but the slot store is a release
    /// publish so lock-free readers that observe the new node also observe
    /// its initialized links.
    pub fn link_node_rcu<S: NodeArena + ?Sized>(&self, arena: &S, node: NodeId, slot: Slot) {
        self.link_with(arena, node, slot, Ordering::Release);
    }

    fn link_with<S: NodeArena + ?Sized>(
        &self,
        arena: &S,
        node: NodeId,
        slot: Slot,
        order: Ordering,
    ) {
        let n = arena.node(node);
        debug_assert_eq!(n.state(), LinkState::Unlinked, "{node:?} is not unlinked");

        let parent = match slot {
            Slot::Root => NodeId::NIL,
            Slot::Child(parent, _) => parent,
        };
        n.set_parent(parent);
        n.set_child(Dir::Left, NodeId::NIL);
        n.set_child(Dir::Right, NodeId::NIL);
        n.set_color(Color::Red);
        n.set_state(LinkState::Linked);

        match slot {
            Slot::Root => {
                debug_assert!(self.is_empty(), "root slot is occupied");
                self.store_top(node, order);
            }
            Slot::Child(parent, dir) => {
                let p = arena.node(parent);
                debug_assert!(p.is_linked(), "{parent:?} is not linked");
                debug_assert!(p.child_id(dir).is_nil(), "{parent:?} {dir:?} is occupied");
                if order == Ordering::Relaxed {
                    p.set_child(dir, node);
                } else {
                    p.publish_child(dir, node);
                }
            }
        }
    }

    /// Links `node` at `slot` and rebalances.
    pub fn insert<S: NodeArena + ?Sized>(&self, arena: &S, node: NodeId, slot: Slot) {
        self.link_node(arena, node, slot);
        self.insert_color(arena, node);
    }

    /// Rotates `x` down toward `dir`; its opposite child takes its place.
    fn rotate<S: NodeArena + ?Sized>(&self, arena: &S, x: NodeId, dir: Dir) {
        let nx = arena.node(x);
        let y = nx.child_id(dir.opposite());
        debug_assert!(!y.is_nil(), "rotation of {x:?} needs a {:?} child", dir.opposite());
        let ny = arena.node(y);
        let b = ny.child_id(dir);
        let p = nx.parent_id();

        nx.publish_child(dir.opposite(), b);
        if !b.is_nil() {
            arena.node(b).set_parent(x);
        }
        ny.publish_child(dir, x);
        nx.set_parent(y);
        ny.set_parent(p);
        self.change_child(arena, x, y, p);
    }

    /// Restores the coloring invariants after `node` was linked as a leaf.
    pub fn insert_color<S: NodeArena + ?Sized>(&self, arena: &S, node: NodeId) {
        debug_assert!(arena.node(node).is_linked(), "{node:?} is not linked");
        let mut x = node;
        loop {
            let p = arena.node(x).parent_id();
            if p.is_nil() {
                arena.node(x).set_color(Color::Black);
                return;
            }
            let np = arena.node(p);
            if !np.is_red() {
                return;
            }

            // A red parent is never the root, so the grandparent exists.
            let g = np.parent_id();
            debug_assert!(!g.is_nil());
            let ng = arena.node(g);
            let side = ng.dir_of(p);
            let u = ng.child_id(side.opposite());

            if is_red(arena, u) {
                np.set_color(Color::Black);
                arena.node(u).set_color(Color::Black);
                ng.set_color(Color::Red);
                x = g;
                continue;
            }

            let mut top = p;
            if np.child_id(side.opposite()) == x {
                self.rotate(arena, p, side);
                top = x;
            }
            self.rotate(arena, g, side.opposite());
            arena.node(top).set_color(Color::Black);
            ng.set_color(Color::Red);
            return;
        }
    }

    /// Unlinks `node` and rebalances. The node ends up `Erased`.
    pub fn erase<S: NodeArena + ?Sized>(&self, arena: &S, node: NodeId) {
        let nz = arena.node(node);
        debug_assert!(nz.is_linked(), "{node:?} is not linked");
        let zl = nz.child_id(Dir::Left);
        let zr = nz.child_id(Dir::Right);

        let child;
        let parent;
        let removed;
        if zl.is_nil() || zr.is_nil() {
            child = if zl.is_nil() { zr } else { zl };
            parent = nz.parent_id();
            removed = nz.color();
            if !child.is_nil() {
                arena.node(child).set_parent(parent);
            }
            self.change_child(arena, node, child, parent);
        } else {
            // Two children: the successor takes over the erased position.
            let mut y = zr;
            loop {
                let l = arena.node(y).child_id(Dir::Left);
                if l.is_nil() {
                    break;
                }
                y = l;
            }
            let ny = arena.node(y);
            removed = ny.color();
            child = ny.child_id(Dir::Right);
            if y == zr {
                parent = y;
            } else {
                parent = ny.parent_id();
                arena.node(parent).publish_child(Dir::Left, child);
                if !child.is_nil() {
                    arena.node(child).set_parent(parent);
                }
                ny.publish_child(Dir::Right, zr);
                arena.node(zr).set_parent(y);
            }
            ny.publish_child(Dir::Left, zl);
            arena.node(zl).set_parent(y);
            let zp = nz.parent_id();
            ny.set_parent(zp);
            ny.set_color(nz.color());
            self.change_child(arena, node, y, zp);
        }

        nz.set_state(LinkState::Erased);

        if removed == Color::Black {
            self.erase_color(arena, child, parent);
        }
    }

    /// Repairs a black-height deficit on the path through `x` under `parent`.
    fn erase_color<S: NodeArena + ?Sized>(&self, arena: &S, mut x: NodeId, mut parent: NodeId) {
        while !parent.is_nil() && !is_red(arena, x) {
            let np = arena.node(parent);
            // A black deficit implies a non-empty sibling, so a NIL `x` is
            // always the empty side.
            let dir = if np.child_id(Dir::Left) == x {
                Dir::Left
            } else {
                Dir::Right
            };
            let mut w = np.child_id(dir.opposite());
            debug_assert!(!w.is_nil());

            if arena.node(w).is_red() {
                arena.node(w).set_color(Color::Black);
                np.set_color(Color::Red);
                self.rotate(arena, parent, dir);
                w = np.child_id(dir.opposite());
            }

            let nw = arena.node(w);
            let near = nw.child_id(dir);
            let far = nw.child_id(dir.opposite());
            if !is_red(arena, near) && !is_red(arena, far) {
                nw.set_color(Color::Red);
                x = parent;
                parent = np.parent_id();
                continue;
            }

            if !is_red(arena, far) {
                arena.node(near).set_color(Color::Black);
                nw.set_color(Color::Red);
                self.rotate(arena, w, dir.opposite());
                w = np.child_id(dir.opposite());
            }

            let nw = arena.node(w);
            nw.set_color(np.color());
            np.set_color(Color::Black);
            arena.node(nw.child_id(dir.opposite())).set_color(Color::Black);
            self.rotate(arena, parent, dir);
            return;
        }

        if !x.is_nil() {
            arena.node(x).set_color(Color::Black);
        }
    }

    /// Puts `new` exactly where `victim` is, without rebalancing.
    ///
    /// `new` must be unlinked and order equal to `victim`. Afterwards `victim`
    /// is `Erased`.
    pub fn replace_node<S: NodeArena + ?Sized>(&self, arena: &S, victim: NodeId, new: NodeId) {
        let nv = arena.node(victim);
        let nn = arena.node(new);
        debug_assert!(nv.is_linked(), "{victim:?} is not linked");
        debug_assert_eq!(nn.state(), LinkState::Unlinked, "{new:?} is not unlinked");

        let parent = nv.parent_id();
        let left = nv.child_id(Dir::Left);
        let right = nv.child_id(Dir::Right);
        nn.set_parent(parent);
        nn.set_child(Dir::Left, left);
        nn.set_child(Dir::Right, right);
        nn.set_color(nv.color());
        nn.set_state(LinkState::Linked);

        if !left.is_nil() {
            arena.node(left).set_parent(new);
        }
        if !right.is_nil() {
            arena.node(right).set_parent(new);
        }
        self.change_child(arena, victim, new, parent);
        nv.set_state(LinkState::Erased);
    }
}

impl Default for RbRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RbRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbRoot").field("top", &self.top_id()).finish()
    }
}
