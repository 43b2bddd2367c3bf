//! Plain anchor pool shared by the unit tests.

use crate::iter::iter;
use crate::node::{ListArena, ListId, ListNode};

pub(crate) struct Pool {
    links: Vec<ListNode>,
}

impl Pool {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            links: (0..len).map(|_| ListNode::new()).collect(),
        }
    }
}

impl ListArena for Pool {
    fn link(&self, id: ListId) -> &ListNode {
        self.links.link(id)
    }
}

pub(crate) fn entries(pool: &Pool, head: ListId) -> Vec<usize> {
    iter(pool, head).map(ListId::index).collect()
}
