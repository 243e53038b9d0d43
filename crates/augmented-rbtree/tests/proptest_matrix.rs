use std::cell::Cell;
use std::rc::Rc;

use augmented_rbtree::{NodeId, RbTree};
use proptest::prelude::*;

struct Item {
    value: u32,
    drops: Rc<Cell<usize>>,
}

impl Drop for Item {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// In-order payloads of the subtree: the strongest augmentation to check
/// against a plain `Vec` model.
fn flatten(item: &Item, l: Option<&Vec<u32>>, r: Option<&Vec<u32>>) -> Vec<u32> {
    let mut out = l.cloned().unwrap_or_default();
    out.push(item.value);
    out.extend(r.into_iter().flatten());
    out
}

#[derive(Clone, Debug)]
enum Op {
    InsertAfter(usize, u32),
    InsertBefore(usize, u32),
    PushBack(u32),
    PushFront(u32),
    Remove(usize),
    Update(usize, u32),
    ReadAugment(usize),
    MarkDirty(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::InsertAfter(i, v)),
        3 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::InsertBefore(i, v)),
        1 => any::<u32>().prop_map(Op::PushBack),
        1 => any::<u32>().prop_map(Op::PushFront),
        3 => any::<usize>().prop_map(Op::Remove),
        1 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::Update(i, v)),
        1 => any::<usize>().prop_map(Op::ReadAugment),
        1 => any::<usize>().prop_map(Op::MarkDirty),
    ]
}

type Tree = RbTree<Item, Vec<u32>>;

/// Tree, `Vec` model and drop bookkeeping driven by the same ops.
struct Run {
    tree: Tree,
    model: Vec<(NodeId, u32)>,
    drops: Rc<Cell<usize>>,
    inserted: usize,
}

impl Run {
    fn new() -> Self {
        Self {
            tree: RbTree::new(flatten),
            model: Vec::new(),
            drops: Rc::new(Cell::new(0)),
            inserted: 0,
        }
    }

    fn item(&mut self, value: u32) -> Item {
        self.inserted += 1;
        Item {
            value,
            drops: Rc::clone(&self.drops),
        }
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::InsertAfter(i, v) => {
                let item = self.item(v);
                if self.model.is_empty() {
                    let n = self.tree.insert_after(None, item);
                    self.model.push((n, v));
                } else {
                    let at = i % self.model.len();
                    let n = self.tree.insert_after(Some(self.model[at].0), item);
                    self.model.insert(at + 1, (n, v));
                }
            }
            Op::InsertBefore(i, v) => {
                let item = self.item(v);
                if self.model.is_empty() {
                    let n = self.tree.insert_before(None, item);
                    self.model.push((n, v));
                } else {
                    let at = i % self.model.len();
                    let n = self.tree.insert_before(Some(self.model[at].0), item);
                    self.model.insert(at, (n, v));
                }
            }
            Op::PushBack(v) => {
                let item = self.item(v);
                let n = self.tree.push_back(item);
                self.model.push((n, v));
            }
            Op::PushFront(v) => {
                let item = self.item(v);
                let n = self.tree.push_front(item);
                self.model.insert(0, (n, v));
            }
            Op::Remove(i) => {
                if !self.model.is_empty() {
                    let (n, v) = self.model.remove(i % self.model.len());
                    assert_eq!(self.tree.remove(n).value, v);
                }
            }
            Op::Update(i, v) => {
                if !self.model.is_empty() {
                    let at = i % self.model.len();
                    self.tree.payload_mut(self.model[at].0).value = v;
                    self.model[at].1 = v;
                }
            }
            Op::ReadAugment(i) => {
                if !self.model.is_empty() {
                    let n = self.model[i % self.model.len()].0;
                    self.tree.augment(n);
                }
            }
            Op::MarkDirty(i) => {
                if !self.model.is_empty() {
                    let n = self.model[i % self.model.len()].0;
                    self.tree.mark_dirty(n);
                    assert!(self.tree.is_dirty(n));
                }
            }
        }
    }

    fn values(&self) -> Vec<u32> {
        self.model.iter().map(|(_, v)| *v).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_every_op(ops in prop::collection::vec(op_strategy(), 0..300)) {
        let mut run = Run::new();

        for op in &ops {
            run.apply(op);
            if let Err(err) = run.tree.validate() {
                return Err(TestCaseError::fail(format!("after {op:?}: {err}")));
            }
            prop_assert!(run.tree.validate_augment().is_ok());
            prop_assert_eq!(run.drops.get(), run.inserted - run.model.len());
        }

        let ids: Vec<NodeId> = run.tree.ids().collect();
        let expected_ids: Vec<NodeId> = run.model.iter().map(|(n, _)| *n).collect();
        prop_assert_eq!(ids, expected_ids);

        let expected = run.values();
        let root_augment = run.tree.root_augment().cloned().unwrap_or_default();
        prop_assert_eq!(root_augment, expected);
        prop_assert!(run.tree.validate_augment().is_ok());

        let Run { tree, drops, inserted, .. } = run;
        drop(tree);
        prop_assert_eq!(drops.get(), inserted);
    }

    #[test]
    fn augment_matches_subtree_after_interleaving(
        ops in prop::collection::vec(op_strategy(), 1..200),
    ) {
        let mut run = Run::new();
        for op in &ops {
            run.apply(op);
        }
        let Run { mut tree, model, .. } = run;

        // Each node's augmentation is the run of the model covered by its subtree.
        for n in tree.ids().collect::<Vec<_>>() {
            let mut lo = n;
            while let Some(l) = tree.left(lo) {
                lo = l;
            }
            let mut hi = n;
            while let Some(r) = tree.right(hi) {
                hi = r;
            }
            let start = model.iter().position(|(id, _)| *id == lo).unwrap();
            let end = model.iter().position(|(id, _)| *id == hi).unwrap();
            let expected: Vec<u32> = model[start..=end].iter().map(|(_, v)| *v).collect();
            prop_assert_eq!(tree.augment(n), &expected);
        }
    }

    #[test]
    fn navigation_round_trips(len in 1usize..200) {
        let mut run = Run::new();
        for v in 0..len as u32 {
            run.apply(&Op::PushBack(v));
        }
        let tree = &run.tree;
        let ids: Vec<NodeId> = tree.ids().collect();
        prop_assert_eq!(tree.first(), Some(ids[0]));
        prop_assert_eq!(tree.last(), Some(ids[len - 1]));
        for w in ids.windows(2) {
            prop_assert_eq!(tree.next(w[0]), Some(w[1]));
            prop_assert_eq!(tree.prev(w[1]), Some(w[0]));
        }
    }
}
