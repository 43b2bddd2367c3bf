use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Handle of a record (or a list head) inside the caller's arena.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(u32);

impl ListId {
    /// Written into both links of a deleted entry.
    pub(crate) const POISON: Self = Self(u32::MAX);

    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        Self(index as u32)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub(crate) fn is_poison(self) -> bool {
        self == Self::POISON
    }
}

impl fmt::Debug for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_poison() {
            f.write_str("POISON")
        } else {
            write!(f, "ListId({})", self.0)
        }
    }
}

/// Ring anchor embedded in a caller-owned record.
///
/// Links are atomics accessed with `Relaxed` ordering so a lockless peek at
/// [`is_empty`](crate::is_empty) never reads a torn value. A fresh node is
/// poisoned; heads must go through [`init`](crate::init) first.
pub struct ListNode {
    next: AtomicU32,
    prev: AtomicU32,
}

impl ListNode {
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(u32::MAX),
            prev: AtomicU32::new(u32::MAX),
        }
    }

    /// Successor, or `None` for a poisoned node.
    #[inline]
    pub fn next(&self) -> Option<ListId> {
        let id = self.next_id();
        (!id.is_poison()).then_some(id)
    }

    /// Predecessor, or `None` for a poisoned node.
    #[inline]
    pub fn prev(&self) -> Option<ListId> {
        let id = self.prev_id();
        (!id.is_poison()).then_some(id)
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.next_id().is_poison() && self.prev_id().is_poison()
    }

    #[inline(always)]
    pub(crate) fn next_id(&self) -> ListId {
        ListId(self.next.load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub(crate) fn prev_id(&self) -> ListId {
        ListId(self.prev.load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub(crate) fn set_next(&self, id: ListId) {
        self.next.store(id.0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn set_prev(&self, id: ListId) {
        self.prev.store(id.0, Ordering::Relaxed);
    }

    pub(crate) fn poison(&self) {
        self.set_next(ListId::POISON);
        self.set_prev(ListId::POISON);
    }
}

impl Default for ListNode {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<ListNode> for ListNode {
    fn as_ref(&self) -> &ListNode {
        self
    }
}

impl fmt::Debug for ListNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListNode")
            .field("next", &self.next_id())
            .field("prev", &self.prev_id())
            .finish()
    }
}

/// Maps a handle to the ring anchor embedded in the caller's record.
pub trait ListArena {
    fn link(&self, id: ListId) -> &ListNode;
}

impl<T: AsRef<ListNode>> ListArena for [T] {
    #[inline(always)]
    fn link(&self, id: ListId) -> &ListNode {
        debug_assert!(!id.is_poison(), "following a poisoned link");
        self[id.index()].as_ref()
    }
}

impl<T: AsRef<ListNode>> ListArena for Vec<T> {
    #[inline(always)]
    fn link(&self, id: ListId) -> &ListNode {
        self.as_slice().link(id)
    }
}
