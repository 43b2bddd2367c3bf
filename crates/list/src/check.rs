use log::{debug, trace};
use thiserror::Error;

use crate::node::{ListArena, ListId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ListViolation {
    #[error("{0:?} on the ring is poisoned")]
    Poisoned(ListId),
    #[error("{node:?} links to {next:?}, which links back to {found:?}")]
    BrokenBackLink {
        node: ListId,
        next: ListId,
        found: ListId,
    },
}

/// Walks the ring at `head` and returns the number of entries.
///
/// Every hop checks the back link, so a walk that would enter a cycle
/// without the head is caught as [`ListViolation::BrokenBackLink`].
pub fn validate<S: ListArena + ?Sized>(arena: &S, head: ListId) -> Result<usize, ListViolation> {
    let result = walk(arena, head);
    match &result {
        Ok(len) => trace!("list {head:?} ok: len={len}"),
        Err(err) => debug!("list {head:?} broken: {err}"),
    }
    result
}

fn walk<S: ListArena + ?Sized>(arena: &S, head: ListId) -> Result<usize, ListViolation> {
    let mut len = 0;
    let mut cur = head;
    loop {
        let next = arena.link(cur).next_id();
        if next.is_poison() {
            return Err(ListViolation::Poisoned(cur));
        }
        let n = arena.link(next);
        if n.is_poisoned() {
            return Err(ListViolation::Poisoned(next));
        }
        let found = n.prev_id();
        if found != cur {
            return Err(ListViolation::BrokenBackLink {
                node: cur,
                next,
                found,
            });
        }
        if next == head {
            return Ok(len);
        }
        len += 1;
        cur = next;
    }
}
