use std::iter::FusedIterator;

use crate::node::{ListArena, ListId};

/// Entries of the ring at `head`, front to back. The head itself is skipped.
pub fn iter<S: ListArena + ?Sized>(arena: &S, head: ListId) -> Iter<'_, S> {
    let h = arena.link(head);
    let (front, back) = (h.next_id(), h.prev_id());
    Iter {
        arena,
        front,
        back,
        done: front == head,
    }
}

/// Entries of the ring at `head`, back to front.
pub fn iter_rev<S: ListArena + ?Sized>(arena: &S, head: ListId) -> std::iter::Rev<Iter<'_, S>> {
    iter(arena, head).rev()
}

/// Yields each entry once. Relinking the ring while iterating is not
/// supported; collect first, then mutate.
pub struct Iter<'a, S: ListArena + ?Sized> {
    arena: &'a S,
    front: ListId,
    back: ListId,
    done: bool,
}

impl<S: ListArena + ?Sized> Iterator for Iter<'_, S> {
    type Item = ListId;

    fn next(&mut self) -> Option<ListId> {
        if self.done {
            return None;
        }
        let cur = self.front;
        if cur == self.back {
            self.done = true;
        } else {
            self.front = self.arena.link(cur).next_id();
        }
        Some(cur)
    }
}

impl<S: ListArena + ?Sized> DoubleEndedIterator for Iter<'_, S> {
    fn next_back(&mut self) -> Option<ListId> {
        if self.done {
            return None;
        }
        let cur = self.back;
        if cur == self.front {
            self.done = true;
        } else {
            self.back = self.arena.link(cur).prev_id();
        }
        Some(cur)
    }
}

impl<S: ListArena + ?Sized> FusedIterator for Iter<'_, S> {}
