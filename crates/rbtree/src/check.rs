use std::cmp::Ordering;
use std::collections::HashSet;

use log::{debug, trace};
use thiserror::Error;

use crate::node::{Dir, LinkState, NodeArena, NodeId};
use crate::tree::RbRoot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub len: usize,
    /// Black nodes on every root-to-leaf path.
    pub black_height: usize,
    /// Nodes on the longest root-to-leaf path.
    pub depth: usize,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("root {0:?} is red")]
    RedRoot(NodeId),
    #[error("root {node:?} has parent link {parent:?}")]
    RootHasParent { node: NodeId, parent: NodeId },
    #[error("{node:?} is reachable but {state:?}")]
    NotLinked { node: NodeId, state: LinkState },
    #[error("{child:?} points to parent {found:?}, expected {expected:?}")]
    BrokenParentLink {
        child: NodeId,
        expected: NodeId,
        found: NodeId,
    },
    #[error("red {parent:?} has red child {child:?}")]
    RedChildOfRed { parent: NodeId, child: NodeId },
    #[error("black height under {node:?} differs: left {left}, right {right}")]
    BlackHeightMismatch {
        node: NodeId,
        left: usize,
        right: usize,
    },
    #[error("{0:?} is reachable twice")]
    Cycle(NodeId),
    #[error("{prev:?} orders after its successor {next:?}")]
    OutOfOrder { prev: NodeId, next: NodeId },
}

struct Walk<'a, S: NodeArena + ?Sized> {
    arena: &'a S,
    seen: HashSet<NodeId>,
}

impl<S: NodeArena + ?Sized> Walk<'_, S> {
    /// Returns `(black_height, depth)` of the subtree at `x`.
    fn subtree(&mut self, x: NodeId, parent: NodeId) -> Result<(usize, usize), Violation> {
        if x.is_nil() {
            return Ok((0, 0));
        }
        if !self.seen.insert(x) {
            return Err(Violation::Cycle(x));
        }
        let n = self.arena.node(x);
        let state = n.state();
        if state != LinkState::Linked {
            return Err(Violation::NotLinked { node: x, state });
        }
        let found = n.parent_id();
        if found != parent {
            return Err(Violation::BrokenParentLink {
                child: x,
                expected: parent,
                found,
            });
        }

        let l = n.child_id(Dir::Left);
        let r = n.child_id(Dir::Right);
        if n.is_red() {
            for c in [l, r] {
                if !c.is_nil() && self.arena.node(c).is_red() {
                    return Err(Violation::RedChildOfRed {
                        parent: x,
                        child: c,
                    });
                }
            }
        }

        let (lb, ld) = self.subtree(l, x)?;
        let (rb, rd) = self.subtree(r, x)?;
        if lb != rb {
            return Err(Violation::BlackHeightMismatch {
                node: x,
                left: lb,
                right: rb,
            });
        }
        let own = usize::from(!n.is_red());
        Ok((lb + own, 1 + ld.max(rd)))
    }
}

impl RbRoot {
    /// Verifies the coloring, black-height and link invariants.
    pub fn validate<S: NodeArena + ?Sized>(&self, arena: &S) -> Result<TreeStats, Violation> {
        let result = self.validate_inner(arena);
        match &result {
            Ok(stats) => trace!(
                "rbtree ok: len={} black_height={} depth={}",
                stats.len, stats.black_height, stats.depth
            ),
            Err(err) => debug!("rbtree invariant violated: {err}"),
        }
        result
    }

    fn validate_inner<S: NodeArena + ?Sized>(&self, arena: &S) -> Result<TreeStats, Violation> {
        let top = self.top_id();
        if top.is_nil() {
            return Ok(TreeStats::default());
        }
        let n = arena.node(top);
        let parent = n.parent_id();
        if !parent.is_nil() {
            return Err(Violation::RootHasParent { node: top, parent });
        }
        if n.is_red() {
            return Err(Violation::RedRoot(top));
        }

        let mut walk = Walk {
            arena,
            seen: HashSet::new(),
        };
        let (black_height, depth) = walk.subtree(top, NodeId::NIL)?;
        Ok(TreeStats {
            len: walk.seen.len(),
            black_height,
            depth,
        })
    }

    /// [`validate`](Self::validate), then checks that no node orders after
    /// its in-order successor under `cmp`. Equal neighbors are accepted.
    pub fn validate_order_by<S, F>(&self, arena: &S, mut cmp: F) -> Result<TreeStats, Violation>
    where
        S: NodeArena + ?Sized,
        F: FnMut(NodeId, NodeId) -> Ordering,
    {
        let stats = self.validate(arena)?;
        let mut it = self.iter(arena);
        let Some(mut prev) = it.next() else {
            return Ok(stats);
        };
        for next in it {
            if cmp(prev, next) == Ordering::Greater {
                let err = Violation::OutOfOrder { prev, next };
                debug!("rbtree order violated: {err}");
                return Err(err);
            }
            prev = next;
        }
        Ok(stats)
    }
}
