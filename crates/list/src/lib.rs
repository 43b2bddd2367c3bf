//! Intrusive circular doubly-linked list over caller-owned records.
//!
//! Records embed a [`ListNode`] and live in an arena the caller owns; a list
//! head is one more node of that arena. All functions take the arena and
//! [`ListId`] handles, so a record can sit on several rings through several
//! anchors, each reached through its own [`ListArena`] view.

mod check;
#[cfg(test)]
mod fixture;
mod iter;
mod node;
mod ops;

pub use check::{ListViolation, validate};
pub use iter::{Iter, iter, iter_rev};
pub use node::{ListArena, ListId, ListNode};
pub use ops::{
    add, add_tail, cut_position, del, del_init, first, init, is_empty, is_empty_careful, is_last,
    is_singular, last, move_tail, move_to, next, prev, replace, replace_init, rotate_left, splice,
    splice_init, splice_tail, splice_tail_init,
};

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::fixture::{Pool, entries};

    const HEADS: usize = 3;
    const SCRATCH: usize = 2;

    struct Model {
        lists: [VecDeque<usize>; HEADS],
        loose: Vec<usize>,
    }

    impl Model {
        fn owner(&self, entry: usize) -> (usize, usize) {
            self.lists
                .iter()
                .enumerate()
                .find_map(|(h, list)| list.iter().position(|&e| e == entry).map(|pos| (h, pos)))
                .unwrap()
        }

        fn linked(&self) -> Vec<usize> {
            self.lists[..SCRATCH].iter().flatten().copied().collect()
        }
    }

    fn id(i: usize) -> ListId {
        ListId::new(i)
    }

    #[test]
    fn random_ops_match_deque_model() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        let n = 64;
        let pool = Pool::new(HEADS + n);
        for h in 0..HEADS {
            init(&pool, id(h));
        }
        let mut model = Model {
            lists: Default::default(),
            loose: (HEADS..HEADS + n).collect(),
        };

        for step in 0..20_000 {
            let h = rng.random_range(0..SCRATCH);
            let linked = model.linked();
            match rng.random_range(0..9) {
                0 | 1 if !model.loose.is_empty() => {
                    let e = model.loose.swap_remove(rng.random_range(0..model.loose.len()));
                    if rng.random_bool(0.5) {
                        add(&pool, id(e), id(h));
                        model.lists[h].push_front(e);
                    } else {
                        add_tail(&pool, id(e), id(h));
                        model.lists[h].push_back(e);
                    }
                }
                2 if !linked.is_empty() => {
                    let e = linked[rng.random_range(0..linked.len())];
                    let (owner, pos) = model.owner(e);
                    model.lists[owner].remove(pos);
                    if rng.random_bool(0.5) {
                        del(&pool, id(e));
                    } else {
                        del_init(&pool, id(e));
                    }
                    model.loose.push(e);
                }
                3 if !linked.is_empty() => {
                    let e = linked[rng.random_range(0..linked.len())];
                    let (owner, pos) = model.owner(e);
                    model.lists[owner].remove(pos);
                    if rng.random_bool(0.5) {
                        move_to(&pool, id(e), id(h));
                        model.lists[h].push_front(e);
                    } else {
                        move_tail(&pool, id(e), id(h));
                        model.lists[h].push_back(e);
                    }
                }
                4 if !linked.is_empty() && !model.loose.is_empty() => {
                    let old = linked[rng.random_range(0..linked.len())];
                    let new = model.loose.swap_remove(rng.random_range(0..model.loose.len()));
                    let (owner, pos) = model.owner(old);
                    model.lists[owner][pos] = new;
                    if rng.random_bool(0.5) {
                        replace(&pool, id(old), id(new));
                    } else {
                        replace_init(&pool, id(old), id(new));
                    }
                    model.loose.push(old);
                }
                5 => {
                    rotate_left(&pool, id(h));
                    let by = usize::from(!model.lists[h].is_empty());
                    model.lists[h].rotate_left(by);
                }
                6 => {
                    let other = 1 - h;
                    let moved = std::mem::take(&mut model.lists[other]);
                    if rng.random_bool(0.5) {
                        splice_init(&pool, id(other), id(h));
                        for e in moved.into_iter().rev() {
                            model.lists[h].push_front(e);
                        }
                    } else {
                        splice_tail_init(&pool, id(other), id(h));
                        model.lists[h].extend(moved);
                    }
                }
                7 if !model.lists[h].is_empty() => {
                    // Cut a prefix onto the scratch head, then append it to the other list.
                    let len = model.lists[h].len();
                    let at = rng.random_range(0..len);
                    let entry = model.lists[h][at];
                    cut_position(&pool, id(SCRATCH), id(h), id(entry));
                    let prefix = model.lists[h].drain(..=at).collect::<Vec<_>>();
                    assert_eq!(entries(&pool, id(SCRATCH)), prefix);
                    splice_tail_init(&pool, id(SCRATCH), id(1 - h));
                    model.lists[1 - h].extend(prefix);
                }
                _ => {}
            }

            for head in 0..HEADS {
                let expect = model.lists[head].iter().copied().collect::<Vec<_>>();
                assert_eq!(entries(&pool, id(head)), expect, "step {step}");
                if step % 97 == 0 {
                    assert_eq!(validate(&pool, id(head)), Ok(expect.len()));
                    let mut rev = iter_rev(&pool, id(head)).map(ListId::index).collect::<Vec<_>>();
                    rev.reverse();
                    assert_eq!(rev, expect);
                    assert_eq!(first(&pool, id(head)).map(ListId::index), expect.first().copied());
                    assert_eq!(last(&pool, id(head)).map(ListId::index), expect.last().copied());
                    assert_eq!(is_singular(&pool, id(head)), expect.len() == 1);
                }
            }
        }
    }

    #[test]
    fn record_on_two_rings_through_two_anchors() {
        struct Task {
            run: ListNode,
            all: ListNode,
        }
        struct RunView<'a>(&'a [Task]);
        struct AllView<'a>(&'a [Task]);
        impl ListArena for RunView<'_> {
            fn link(&self, id: ListId) -> &ListNode {
                &self.0[id.index()].run
            }
        }
        impl ListArena for AllView<'_> {
            fn link(&self, id: ListId) -> &ListNode {
                &self.0[id.index()].all
            }
        }

        let tasks = (0..5)
            .map(|_| Task {
                run: ListNode::new(),
                all: ListNode::new(),
            })
            .collect::<Vec<_>>();
        let (run, all) = (RunView(&tasks), AllView(&tasks));
        let head = id(0);
        init(&run, head);
        init(&all, head);
        for i in 1..5 {
            add_tail(&all, id(i), head);
        }
        add_tail(&run, id(3), head);
        add_tail(&run, id(1), head);
        del(&all, id(3));

        let on_all = iter(&all, head).map(ListId::index).collect::<Vec<_>>();
        let on_run = iter(&run, head).map(ListId::index).collect::<Vec<_>>();
        assert_eq!(on_all, vec![1, 2, 4]);
        assert_eq!(on_run, vec![3, 1]);
        assert_eq!(validate(&run, head), Ok(2));
    }
}
