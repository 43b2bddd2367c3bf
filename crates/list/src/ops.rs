//! Ring relinking. Every function takes the arena holding the anchors and
//! handles into it; heads are ordinary nodes of the same arena.

use crate::node::{ListArena, ListId};

/// Makes `head` an empty ring pointing at itself.
pub fn init<S: ListArena + ?Sized>(arena: &S, head: ListId) {
    let h = arena.link(head);
    h.set_next(head);
    h.set_prev(head);
}

/// Poisoned, or a self-loop left by [`init`] / [`del_init`].
fn is_detached<S: ListArena + ?Sized>(arena: &S, id: ListId) -> bool {
    let n = arena.link(id);
    n.is_poisoned() || (n.next_id() == id && n.prev_id() == id)
}

/// Inserts `new` between two consecutive nodes.
fn insert_between<S: ListArena + ?Sized>(arena: &S, new: ListId, prev: ListId, next: ListId) {
    debug_assert_eq!(arena.link(next).prev_id(), prev, "{prev:?} and {next:?} are not adjacent");
    debug_assert_eq!(arena.link(prev).next_id(), next, "{prev:?} and {next:?} are not adjacent");
    debug_assert!(new != prev && new != next, "{new:?} is already here");

    arena.link(next).set_prev(new);
    let n = arena.link(new);
    n.set_next(next);
    n.set_prev(prev);
    arena.link(prev).set_next(new);
}

/// Joins `prev` and `next`, dropping whatever sat between them.
fn join<S: ListArena + ?Sized>(arena: &S, prev: ListId, next: ListId) {
    arena.link(next).set_prev(prev);
    arena.link(prev).set_next(next);
}

/// Unlinks `entry` from its ring, leaving its own links stale.
fn unlink<S: ListArena + ?Sized>(arena: &S, entry: ListId) {
    let n = arena.link(entry);
    debug_assert!(!n.is_poisoned(), "{entry:?} is not on a list");
    join(arena, n.prev_id(), n.next_id());
}

/// Inserts `new` right after `head`. Repeated calls build a stack.
pub fn add<S: ListArena + ?Sized>(arena: &S, new: ListId, head: ListId) {
    debug_assert!(is_detached(arena, new), "{new:?} is still on a list");
    insert_between(arena, new, head, arena.link(head).next_id());
}

/// Inserts `new` right before `head`. Repeated calls build a queue.
pub fn add_tail<S: ListArena + ?Sized>(arena: &S, new: ListId, head: ListId) {
    debug_assert!(is_detached(arena, new), "{new:?} is still on a list");
    insert_between(arena, new, arena.link(head).prev_id(), head);
}

/// Removes `entry` and poisons its links.
pub fn del<S: ListArena + ?Sized>(arena: &S, entry: ListId) {
    unlink(arena, entry);
    arena.link(entry).poison();
}

/// Removes `entry` and leaves it as an empty ring.
pub fn del_init<S: ListArena + ?Sized>(arena: &S, entry: ListId) {
    unlink(arena, entry);
    init(arena, entry);
}

/// Puts `new` in the place of `old` and poisons `old`.
pub fn replace<S: ListArena + ?Sized>(arena: &S, old: ListId, new: ListId) {
    relink_over(arena, old, new);
    arena.link(old).poison();
}

/// Puts `new` in the place of `old` and leaves `old` as an empty ring.
pub fn replace_init<S: ListArena + ?Sized>(arena: &S, old: ListId, new: ListId) {
    relink_over(arena, old, new);
    init(arena, old);
}

fn relink_over<S: ListArena + ?Sized>(arena: &S, old: ListId, new: ListId) {
    let o = arena.link(old);
    debug_assert!(!o.is_poisoned(), "{old:?} is not on a list");
    debug_assert!(is_detached(arena, new), "{new:?} is still on a list");
    let (prev, next) = (o.prev_id(), o.next_id());
    let n = arena.link(new);
    n.set_next(next);
    arena.link(next).set_prev(new);
    n.set_prev(prev);
    arena.link(prev).set_next(new);
}

/// Moves `entry` from its ring to right after `head`.
pub fn move_to<S: ListArena + ?Sized>(arena: &S, entry: ListId, head: ListId) {
    unlink(arena, entry);
    insert_between(arena, entry, head, arena.link(head).next_id());
}

/// Moves `entry` from its ring to right before `head`.
pub fn move_tail<S: ListArena + ?Sized>(arena: &S, entry: ListId, head: ListId) {
    unlink(arena, entry);
    insert_between(arena, entry, arena.link(head).prev_id(), head);
}

#[inline]
pub fn is_last<S: ListArena + ?Sized>(arena: &S, entry: ListId, head: ListId) -> bool {
    arena.link(entry).next_id() == head
}

#[inline]
pub fn is_empty<S: ListArena + ?Sized>(arena: &S, head: ListId) -> bool {
    arena.link(head).next_id() == head
}

/// Empty check that also looks at `prev`, so a concurrent [`del_init`] of
/// the last entry that has updated only one link is not reported as empty.
pub fn is_empty_careful<S: ListArena + ?Sized>(arena: &S, head: ListId) -> bool {
    let h = arena.link(head);
    let next = h.next_id();
    next == head && next == h.prev_id()
}

/// Moves the first entry to the tail.
pub fn rotate_left<S: ListArena + ?Sized>(arena: &S, head: ListId) {
    if !is_empty(arena, head) {
        let first = arena.link(head).next_id();
        move_tail(arena, first, head);
    }
}

pub fn is_singular<S: ListArena + ?Sized>(arena: &S, head: ListId) -> bool {
    let h = arena.link(head);
    !is_empty(arena, head) && h.next_id() == h.prev_id()
}

/// Moves the entries of `head` up to and including `entry` onto `list`.
///
/// `list` is overwritten; pass an empty ring or one whose entries are not
/// needed. With `entry == head` nothing is moved and `list` ends up empty.
/// A singular `head` whose only entry is not `entry` is left alone.
pub fn cut_position<S: ListArena + ?Sized>(arena: &S, list: ListId, head: ListId, entry: ListId) {
    if is_empty(arena, head) {
        return;
    }
    if is_singular(arena, head) && arena.link(head).next_id() != entry && entry != head {
        return;
    }
    if entry == head {
        init(arena, list);
        return;
    }

    let h = arena.link(head);
    let e = arena.link(entry);
    let l = arena.link(list);
    let new_first = e.next_id();
    let old_first = h.next_id();
    l.set_next(old_first);
    arena.link(old_first).set_prev(list);
    l.set_prev(entry);
    e.set_next(list);
    h.set_next(new_first);
    arena.link(new_first).set_prev(head);
}

/// Links every entry of `list` between `prev` and `next`. `list` keeps
/// stale links.
fn splice_between<S: ListArena + ?Sized>(arena: &S, list: ListId, prev: ListId, next: ListId) {
    let l = arena.link(list);
    let first = l.next_id();
    let last = l.prev_id();

    arena.link(first).set_prev(prev);
    arena.link(prev).set_next(first);
    arena.link(last).set_next(next);
    arena.link(next).set_prev(last);
}

/// Joins the entries of `list` right after `head`. `list` is left stale.
pub fn splice<S: ListArena + ?Sized>(arena: &S, list: ListId, head: ListId) {
    if !is_empty(arena, list) {
        splice_between(arena, list, head, arena.link(head).next_id());
    }
}

/// Joins the entries of `list` right before `head`. `list` is left stale.
pub fn splice_tail<S: ListArena + ?Sized>(arena: &S, list: ListId, head: ListId) {
    if !is_empty(arena, list) {
        splice_between(arena, list, arena.link(head).prev_id(), head);
    }
}

/// [`splice`], then reinitializes `list` as empty.
pub fn splice_init<S: ListArena + ?Sized>(arena: &S, list: ListId, head: ListId) {
    if !is_empty(arena, list) {
        splice_between(arena, list, head, arena.link(head).next_id());
        init(arena, list);
    }
}

/// [`splice_tail`], then reinitializes `list` as empty.
pub fn splice_tail_init<S: ListArena + ?Sized>(arena: &S, list: ListId, head: ListId) {
    if !is_empty(arena, list) {
        splice_between(arena, list, arena.link(head).prev_id(), head);
        init(arena, list);
    }
}

#[inline]
pub fn first<S: ListArena + ?Sized>(arena: &S, head: ListId) -> Option<ListId> {
    let next = arena.link(head).next_id();
    (next != head).then_some(next)
}

#[inline]
pub fn last<S: ListArena + ?Sized>(arena: &S, head: ListId) -> Option<ListId> {
    let prev = arena.link(head).prev_id();
    (prev != head).then_some(prev)
}

/// Ring successor of `entry`; wraps to the head after the last entry.
#[inline]
pub fn next<S: ListArena + ?Sized>(arena: &S, entry: ListId) -> ListId {
    arena.link(entry).next_id()
}

/// Ring predecessor of `entry`; wraps to the head before the first entry.
#[inline]
pub fn prev<S: ListArena + ?Sized>(arena: &S, entry: ListId) -> ListId {
    arena.link(entry).prev_id()
}
