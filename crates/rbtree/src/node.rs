use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};

/// Stable handle of a record inside the caller's arena.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    pub fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        Self(index as u32)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub(crate) const fn new_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub(crate) const fn raw(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    pub(crate) fn get(self) -> Option<NodeId> {
        if self.is_nil() { None } else { Some(self) }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("NIL")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline(always)]
    const fn to_bits(self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }

    #[inline(always)]
    const fn from_bits(bits: u8) -> Self {
        if bits == 0 { Color::Red } else { Color::Black }
    }
}

/// Child slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline(always)]
    pub fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    #[inline(always)]
    fn idx(self) -> usize {
        match self {
            Dir::Left => 0,
            Dir::Right => 1,
        }
    }
}

/// Membership state of an anchor.
///
/// - `Unlinked`: fresh or cleared, may be linked.
/// - `Linked`: member of exactly one tree.
/// - `Erased`: removed or replaced; links are stale until [`RbNode::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Unlinked,
    Linked,
    Erased,
}

impl LinkState {
    #[inline(always)]
    const fn to_bits(self) -> u8 {
        match self {
            LinkState::Unlinked => 0,
            LinkState::Linked => 1,
            LinkState::Erased => 2,
        }
    }

    #[inline(always)]
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => LinkState::Unlinked,
            1 => LinkState::Linked,
            _ => LinkState::Erased,
        }
    }
}

/// Tree anchor embedded in a caller-owned record.
///
/// Every field is a word-sized atomic, so a reader racing the single writer
/// sees either the old or the new value of each link and never a torn one.
/// Child links written while rebalancing are `Release` stores and child loads
/// are `Acquire`: a reader that follows a child link also sees every link
/// written before it, so a descent never meets a transient cycle.
pub struct RbNode {
    parent: AtomicU32,
    ch: [AtomicU32; 2],
    color: AtomicU8,
    state: AtomicU8,
}

impl RbNode {
    pub const fn new() -> Self {
        Self {
            parent: AtomicU32::new(u32::MAX),
            ch: [AtomicU32::new(u32::MAX), AtomicU32::new(u32::MAX)],
            color: AtomicU8::new(Color::Red.to_bits()),
            state: AtomicU8::new(LinkState::Unlinked.to_bits()),
        }
    }

    /// Returns the anchor to the `Unlinked` state so it can be linked again.
    ///
    /// Must not be called on a node that is currently a member of a tree.
    pub fn clear(&self) {
        debug_assert!(
            self.state() != LinkState::Linked,
            "clearing a node that is still linked"
        );
        self.parent.store(u32::MAX, Ordering::Relaxed);
        self.ch[0].store(u32::MAX, Ordering::Relaxed);
        self.ch[1].store(u32::MAX, Ordering::Relaxed);
        self.color.store(Color::Red.to_bits(), Ordering::Relaxed);
        self.set_state(LinkState::Unlinked);
    }

    #[inline]
    pub fn state(&self) -> LinkState {
        LinkState::from_bits(self.state.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.state() == LinkState::Linked
    }

    #[inline]
    pub fn color(&self) -> Color {
        Color::from_bits(self.color.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent_id().get()
    }

    #[inline]
    pub fn child(&self, dir: Dir) -> Option<NodeId> {
        self.child_id(dir).get()
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.child(Dir::Left)
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.child(Dir::Right)
    }

    #[inline(always)]
    pub(crate) fn parent_id(&self) -> NodeId {
        NodeId(self.parent.load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub(crate) fn child_id(&self, dir: Dir) -> NodeId {
        NodeId(self.ch[dir.idx()].load(Ordering::Acquire))
    }

    #[inline(always)]
    pub(crate) fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline(always)]
    pub(crate) fn set_parent(&self, parent: NodeId) {
        self.parent.store(parent.0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn set_child(&self, dir: Dir, child: NodeId) {
        self.ch[dir.idx()].store(child.0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn publish_child(&self, dir: Dir, child: NodeId) {
        self.ch[dir.idx()].store(child.0, Ordering::Release);
    }

    #[inline(always)]
    pub(crate) fn set_color(&self, color: Color) {
        self.color.store(color.to_bits(), Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn set_state(&self, state: LinkState) {
        self.state.store(state.to_bits(), Ordering::Relaxed);
    }

    /// Which child slot of `self` holds `child`.
    #[inline(always)]
    pub(crate) fn dir_of(&self, child: NodeId) -> Dir {
        if self.child_id(Dir::Left) == child {
            Dir::Left
        } else {
            debug_assert_eq!(self.child_id(Dir::Right), child);
            Dir::Right
        }
    }
}

impl Default for RbNode {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<RbNode> for RbNode {
    fn as_ref(&self) -> &RbNode {
        self
    }
}

impl fmt::Debug for RbNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbNode")
            .field("parent", &self.parent_id())
            .field("left", &self.child_id(Dir::Left))
            .field("right", &self.child_id(Dir::Right))
            .field("color", &self.color())
            .field("state", &self.state())
            .finish()
    }
}

/// Maps a handle to the anchor embedded in the caller's record.
///
/// Records carrying anchors for several trees provide one view per anchor.
pub trait NodeArena {
    fn node(&self, id: NodeId) -> &RbNode;
}

impl<T: AsRef<RbNode>> NodeArena for [T] {
    #[inline(always)]
    fn node(&self, id: NodeId) -> &RbNode {
        debug_assert!(!id.is_nil());
        self[id.index()].as_ref()
    }
}

impl<T: AsRef<RbNode>> NodeArena for Vec<T> {
    #[inline(always)]
    fn node(&self, id: NodeId) -> &RbNode {
        self.as_slice().node(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_is_unlinked_red_leaf() {
        let node = RbNode::new();
        assert_eq!(node.state(), LinkState::Unlinked);
        assert!(!node.is_linked());
        assert_eq!(node.color(), Color::Red);
        assert_eq!(node.parent(), None);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
    }

    #[test]
    fn clear_resets_erased_node() {
        let node = RbNode::new();
        node.set_parent(NodeId::new(3));
        node.set_child(Dir::Left, NodeId::new(4));
        node.set_color(Color::Black);
        node.set_state(LinkState::Erased);

        node.clear();
        assert_eq!(node.state(), LinkState::Unlinked);
        assert_eq!(node.parent(), None);
        assert_eq!(node.left(), None);
        assert_eq!(node.color(), Color::Red);
    }

    #[test]
    fn dir_of_matches_slot() {
        let node = RbNode::new();
        node.set_child(Dir::Left, NodeId::new(1));
        node.set_child(Dir::Right, NodeId::new(2));
        assert_eq!(node.dir_of(NodeId::new(1)), Dir::Left);
        assert_eq!(node.dir_of(NodeId::new(2)), Dir::Right);
        assert_eq!(Dir::Left.opposite(), Dir::Right);
    }

    #[test]
    fn blanket_arena_reaches_embedded_anchor() {
        struct Record {
            _key: u64,
            rb: RbNode,
        }
        impl AsRef<RbNode> for Record {
            fn as_ref(&self) -> &RbNode {
                &self.rb
            }
        }

        let records = vec![
            Record {
                _key: 7,
                rb: RbNode::new(),
            },
            Record {
                _key: 9,
                rb: RbNode::new(),
            },
        ];
        records[1].rb.set_color(Color::Black);
        assert_eq!(records.node(NodeId::new(1)).color(), Color::Black);
        assert_eq!(records.node(NodeId::new(0)).color(), Color::Red);
        assert_eq!(format!("{:?}", NodeId::NIL), "NIL");
    }
}
