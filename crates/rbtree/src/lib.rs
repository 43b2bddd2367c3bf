//! Intrusive red-black tree over caller-owned records.
//!
//! Records embed an [`RbNode`] anchor and live in an arena the caller owns.
//! The tree stores only [`NodeId`] handles and reaches anchors through
//! [`NodeArena`]; it never allocates and never compares keys itself.
//! Ordered descent takes caller comparators (see [`RbRoot::find_by`]).
//!
//! All mutation takes `&self` and must come from a single writer at a time.
//! Readers may run [`RbRoot::find_by`] concurrently with a writer that links
//! through [`RbRoot::link_node_rcu`]; they see either the old or the new
//! shape and may miss nodes being moved, but never loop.

mod check;
#[cfg(test)]
mod fixture;
pub mod map;
mod node;
mod search;
mod traverse;
mod tree;

pub use check::{TreeStats, Violation};
pub use map::RbMap;
pub use node::{Color, Dir, LinkState, NodeArena, NodeId, RbNode};
pub use traverse::{Iter, Postorder, next, next_postorder, prev};
pub use tree::{RbRoot, Slot};
