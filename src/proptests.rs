use super::*;

use crate::bits::MaskedBits;
use crate::node::NodeRef;
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const WIDTH: usize = 2;

fn validate_tree<V>(t: &Tree<V>) {
    let nodes = &t.trie.nodes;
    let root = &nodes[NodeRef::ROOT];
    assert!(root.is_root(), "slot 0 must be the root");
    assert!(!root.is_terminal(), "the root never holds a value");

    let mut stack = vec![NodeRef::ROOT];
    let mut reachable = 0usize;
    let mut terminals = 0u64;
    while let Some(r) = stack.pop() {
        let n = &nodes[r];
        reachable += 1;

        if r != NodeRef::ROOT {
            assert!(!n.is_root(), "root flag on a non-root node");
            assert!(
                n.is_terminal() || !n.is_leaf(),
                "non-terminal leaf should have been pruned"
            );
        }
        if n.is_terminal() {
            terminals += 1;
        }

        for child in [n.left(), n.right()] {
            if !child.is_null() {
                stack.push(child);
            }
        }
    }

    assert_eq!(terminals, t.nodes_count(), "terminal census must match the live count");
    assert_eq!(reachable, nodes.live(), "every live arena slot must be reachable");
    for free in nodes.free_slots() {
        assert_ne!(*free, NodeRef::ROOT, "the root slot is never freed");
    }
}

fn prefix_of(key: &[u8], mask: &[u8]) -> Vec<bool> {
    MaskedBits::new(key, mask).collect()
}

/// Order `Tree::walk` visits keys in: descendants before ancestors, left
/// before right.
fn walk_order(a: &[bool], b: &[bool]) -> Ordering {
    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(i) => a[i].cmp(&b[i]),
        None => b.len().cmp(&a.len()),
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert([u8; WIDTH], usize, u64),
    Delete([u8; WIDTH], usize),
    Exact([u8; WIDTH], usize),
    Partial([u8; WIDTH], usize),
}

fn key_strategy() -> impl Strategy<Value = ([u8; WIDTH], usize)> + Clone {
    // A small alphabet of high bits keeps paths overlapping.
    (prop::array::uniform2(prop::sample::select(vec![0x00u8, 0x0F, 0x80, 0xA5, 0xF0, 0xFF])), 1..=WIDTH * 8)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        40 => (key.clone(), any::<u64>()).prop_map(|((k, b), v)| Op::Insert(k, b, v)),
        25 => key.clone().prop_map(|(k, b)| Op::Delete(k, b)),
        20 => key.clone().prop_map(|(k, b)| Op::Exact(k, b)),
        15 => key.prop_map(|(k, b)| Op::Partial(k, b)),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let ctx = &();
        let mut t: Tree<u64> = Tree::new();
        let mut m: BTreeMap<Vec<bool>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, bits, value) => {
                    let mask = cidr_mask(bits, WIDTH);
                    let p = prefix_of(&key, &mask);
                    let expected = if m.contains_key(&p) {
                        OpResult::Dup
                    } else {
                        m.insert(p, value);
                        OpResult::Ok
                    };
                    prop_assert_eq!(t.insert(ctx, &key, &mask, value), Ok(expected));
                }
                Op::Delete(key, bits) => {
                    let mask = cidr_mask(bits, WIDTH);
                    let expected = match m.remove(&prefix_of(&key, &mask)) {
                        Some(v) => Ok((OpResult::Match, v)),
                        None => Err(TreeError::KeyNotFound),
                    };
                    prop_assert_eq!(t.delete(ctx, &key, &mask), expected);
                }
                Op::Exact(key, bits) => {
                    let mask = cidr_mask(bits, WIDTH);
                    let expected = match m.get(&prefix_of(&key, &mask)) {
                        Some(v) => Ok((OpResult::Match, *v)),
                        None => Err(TreeError::KeyNotFound),
                    };
                    let got = t.search_exact(ctx, &key, &mask).map(|(r, v)| (r, *v));
                    prop_assert_eq!(got, expected);
                }
                Op::Partial(key, bits) => {
                    let mask = cidr_mask(bits, WIDTH);
                    let p = prefix_of(&key, &mask);
                    // Shortest stored prefix along the path wins.
                    let expected = (1..=p.len())
                        .find_map(|len| m.get(&p[..len]).map(|v| (len, *v)))
                        .map(|(len, v)| {
                            let r = if len == p.len() { OpResult::Match } else { OpResult::PartialMatch };
                            (r, v)
                        })
                        .ok_or(TreeError::KeyNotFound);
                    let got = t.search_partial(ctx, &key, &mask).map(|(r, v)| (r, *v));
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(t.nodes_count(), m.len() as u64);
        }

        validate_tree(&t);

        let mut expected: Vec<(&Vec<bool>, &u64)> = m.iter().collect();
        expected.sort_by(|a, b| walk_order(a.0, b.0));
        let expected: Vec<u64> = expected.into_iter().map(|(_, v)| *v).collect();

        let mut walked = Vec::new();
        t.walk(ctx, |v| -> std::result::Result<(), ()> {
            walked.push(*v);
            Ok(())
        }).unwrap();
        prop_assert_eq!(walked, expected);
    }

    #[test]
    fn prop_walk_halts_after_k(count in 1usize..64, stop_at in 1usize..64) {
        let ctx = &();
        let mut t: Tree<usize> = Tree::new();
        for i in 0..count {
            t.insert(ctx, &(i as u16).to_be_bytes(), &[0xFF, 0xFF], i).unwrap();
        }

        let mut calls = 0usize;
        let res = t.walk(ctx, |_| {
            calls += 1;
            if calls == stop_at { Err(calls) } else { Ok(()) }
        });

        if stop_at <= count {
            prop_assert_eq!(res, Err(stop_at));
            prop_assert_eq!(calls, stop_at);
        } else {
            prop_assert_eq!(res, Ok(()));
            prop_assert_eq!(calls, count);
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

/// Nested and sibling prefixes: /1, /2 under it, a /8 below that, and a
/// disjoint /8 on the other side of the root.
fn small_set() -> Vec<(u8, u8)> {
    vec![(0x80, 0x80), (0xC0, 0xC0), (0xC3, 0xFF), (0x40, 0xFF), (0x80, 0xF0), (0x00, 0xE0)]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let ctx = &();
    for_each_permutation(&small_set(), |perm| {
        let mut t: Tree<u8> = Tree::new();
        for &(key, mask) in &perm {
            assert_eq!(t.insert(ctx, &[key], &[mask], key ^ mask), Ok(OpResult::Ok));
        }
        validate_tree(&t);
        for &(key, mask) in &perm {
            assert_eq!(t.search_exact(ctx, &[key], &[mask]), Ok((OpResult::Match, &(key ^ mask))));
        }
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    let ctx = &();
    let set = small_set();

    for_each_permutation(&set, |perm| {
        let mut t: Tree<u8> = Tree::new();
        for &(key, mask) in &set {
            t.insert(ctx, &[key], &[mask], key ^ mask).unwrap();
        }

        for (removed, &(key, mask)) in perm.iter().enumerate() {
            assert_eq!(t.delete(ctx, &[key], &[mask]), Ok((OpResult::Match, key ^ mask)));
            assert_eq!(t.nodes_count(), (set.len() - removed - 1) as u64);
            validate_tree(&t);
        }
        assert!(t.is_empty());
        assert_eq!(t.allocated_nodes(), 1);
    });
}
