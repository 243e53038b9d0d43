use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::rc::Rc;

use tracing::trace;

use crate::augment;
use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::red_black;
use crate::types::{Arena, Color, Found, NodeId, NodeKey, RbNode, TreeTag};
use crate::util::{self, get_l, get_p, get_r, leftmost, rightmost};

/// Augment function type used when none is named explicitly.
pub type AugmentFn<P, A> = fn(&P, Option<&A>, Option<&A>) -> A;

/// Shared handle to a tree. The nodes are dropped together with the last
/// clone.
pub type SharedRbTree<P, A, F = AugmentFn<P, A>> = Rc<RefCell<RbTree<P, A, F>>>;

/// Positional sequence stored as a red-black tree.
///
/// Order is given purely by where elements are inserted; nothing is keyed.
/// Every node carries a payload `P` and an augmentation `A` computed by `F`
/// from the payload and the children's augmentations. Augmentations are
/// recomputed on read, and only for subtrees that changed since the last
/// read.
///
/// Methods taking a [`NodeId`] panic when the handle is not a live node of
/// this tree, including handles issued by another tree.
pub struct RbTree<P, A, F = AugmentFn<P, A>> {
    nodes: Arena<P, A>,
    root: Option<NodeKey>,
    tag: TreeTag,
    augment: F,
}

impl<P, A, F> RbTree<P, A, F>
where
    F: Fn(&P, Option<&A>, Option<&A>) -> A,
{
    /// Empty tree combining subtrees with `augment`.
    pub fn new(augment: F) -> Self {
        Self::with_capacity(0, augment)
    }

    /// Pre-allocates room for `capacity` nodes.
    pub fn with_capacity(capacity: usize, augment: F) -> Self {
        Self {
            nodes: Arena::with_capacity_and_key(capacity),
            root: None,
            tag: TreeTag::fresh(),
            augment,
        }
    }

    /// Moves the tree behind an `Rc<RefCell<_>>`.
    pub fn into_shared(self) -> SharedRbTree<P, A, F> {
        Rc::new(RefCell::new(self))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `n` is a live node of this tree.
    pub fn contains(&self, n: NodeId) -> bool {
        self.key_of(n).is_some()
    }

    fn key_of(&self, n: NodeId) -> Option<NodeKey> {
        if n.tree == self.tag && self.nodes.contains_key(n.key) {
            Some(n.key)
        } else {
            None
        }
    }

    fn check(&self, n: NodeId) -> NodeKey {
        match self.key_of(n) {
            Some(key) => key,
            None => panic!("node {n:?} does not belong to this tree"),
        }
    }

    fn wrap(&self, key: Option<NodeKey>) -> Option<NodeId> {
        key.map(|key| NodeId::new(key, self.tag))
    }

    /// Node record, for inspecting color and dirty state.
    pub fn node(&self, n: NodeId) -> &RbNode<P, A> {
        &self.nodes[self.check(n)]
    }

    /// Root node, `None` when empty.
    pub fn root(&self) -> Option<NodeId> {
        self.wrap(self.root)
    }

    /// First node in sequence order.
    pub fn first(&self) -> Option<NodeId> {
        self.wrap(util::first(&self.nodes, self.root))
    }

    /// Last node in sequence order.
    pub fn last(&self) -> Option<NodeId> {
        self.wrap(util::last(&self.nodes, self.root))
    }

    /// In-order successor of `n`.
    pub fn next(&self, n: NodeId) -> Option<NodeId> {
        self.wrap(util::next(&self.nodes, self.check(n)))
    }

    /// In-order predecessor of `n`.
    pub fn prev(&self, n: NodeId) -> Option<NodeId> {
        self.wrap(util::prev(&self.nodes, self.check(n)))
    }

    /// Parent of `n`, `None` for the root.
    pub fn parent(&self, n: NodeId) -> Option<NodeId> {
        self.wrap(get_p(&self.nodes, self.check(n)))
    }

    /// Left child of `n`.
    pub fn left(&self, n: NodeId) -> Option<NodeId> {
        self.wrap(get_l(&self.nodes, self.check(n)))
    }

    /// Right child of `n`.
    pub fn right(&self, n: NodeId) -> Option<NodeId> {
        self.wrap(get_r(&self.nodes, self.check(n)))
    }

    /// Payload of `n`, or `None` for a stale or foreign handle.
    pub fn get(&self, n: NodeId) -> Option<&P> {
        let key = self.key_of(n)?;
        Some(&self.nodes[key].payload)
    }

    /// Mutable payload access. Marks `n` dirty, since the caller may change
    /// what its augmentation depends on.
    pub fn get_mut(&mut self, n: NodeId) -> Option<&mut P> {
        let key = self.key_of(n)?;
        augment::mark_dirty(&mut self.nodes, key);
        Some(&mut self.nodes[key].payload)
    }

    /// Payload of `n`, panicking on a stale handle.
    pub fn payload(&self, n: NodeId) -> &P {
        &self.node(n).payload
    }

    /// Like [`get_mut`](Self::get_mut), panicking on a stale handle.
    pub fn payload_mut(&mut self, n: NodeId) -> &mut P {
        let key = self.check(n);
        augment::mark_dirty(&mut self.nodes, key);
        &mut self.nodes[key].payload
    }

    /// Swaps in a new payload and returns the old one.
    pub fn replace(&mut self, n: NodeId, payload: P) -> P {
        std::mem::replace(self.payload_mut(n), payload)
    }

    /// Flags `n` and its ancestors for recomputation.
    ///
    /// Needed after changing state the augment function reads that the tree
    /// cannot see, e.g. through interior mutability in the payload.
    pub fn mark_dirty(&mut self, n: NodeId) {
        let key = self.check(n);
        augment::mark_dirty(&mut self.nodes, key);
    }

    /// Whether the augmentation of `n` waits for a recompute.
    pub fn is_dirty(&self, n: NodeId) -> bool {
        self.node(n).dirty
    }

    /// Augmentation of the subtree rooted at `n`, recomputed if stale.
    pub fn augment(&mut self, n: NodeId) -> &A {
        let key = self.check(n);
        augment::get_augment(&mut self.nodes, &self.augment, key)
    }

    /// Augmentation of the whole tree.
    pub fn root_augment(&mut self) -> Option<&A> {
        let root = self.root?;
        Some(augment::get_augment(&mut self.nodes, &self.augment, root))
    }

    /// Returns `None` for a stale handle instead of panicking.
    pub fn try_augment(&mut self, n: NodeId) -> Option<&A> {
        let key = self.key_of(n)?;
        Some(augment::get_augment(&mut self.nodes, &self.augment, key))
    }

    fn insert_root(&mut self, payload: P) -> NodeId {
        let n = self.nodes.insert(RbNode::new(payload));
        self.nodes[n].color = Color::Black;
        self.root = Some(n);
        trace!(node = ?n, "inserted root node");
        NodeId::new(n, self.tag)
    }

    /// Inserts `payload` right after `at`, or at the end when `at` is `None`.
    pub fn insert_after(&mut self, at: Option<NodeId>, payload: P) -> NodeId {
        let at = at.map(|at| self.check(at));
        let Some(root) = self.root else {
            return self.insert_root(payload);
        };
        let at = at.unwrap_or_else(|| rightmost(&self.nodes, root));

        let n = self.nodes.insert(RbNode::new(payload));
        match get_r(&self.nodes, at) {
            None => red_black::insert_right(&mut self.nodes, &mut self.root, n, at),
            Some(r) => {
                let p = leftmost(&self.nodes, r);
                red_black::insert_left(&mut self.nodes, &mut self.root, n, p);
            }
        }
        trace!(node = ?n, after = ?at, len = self.nodes.len(), "inserted node");
        NodeId::new(n, self.tag)
    }

    /// Inserts `payload` right before `at`, or at the start when `at` is
    /// `None`.
    pub fn insert_before(&mut self, at: Option<NodeId>, payload: P) -> NodeId {
        let at = at.map(|at| self.check(at));
        let Some(root) = self.root else {
            return self.insert_root(payload);
        };
        let at = at.unwrap_or_else(|| leftmost(&self.nodes, root));

        let n = self.nodes.insert(RbNode::new(payload));
        match get_l(&self.nodes, at) {
            None => red_black::insert_left(&mut self.nodes, &mut self.root, n, at),
            Some(l) => {
                let p = rightmost(&self.nodes, l);
                red_black::insert_right(&mut self.nodes, &mut self.root, n, p);
            }
        }
        trace!(node = ?n, before = ?at, len = self.nodes.len(), "inserted node");
        NodeId::new(n, self.tag)
    }

    /// Appends `payload`.
    pub fn push_back(&mut self, payload: P) -> NodeId {
        self.insert_after(None, payload)
    }

    /// Prepends `payload`.
    pub fn push_front(&mut self, payload: P) -> NodeId {
        self.insert_before(None, payload)
    }

    /// Removes `n` and hands its payload back. The augmentation is dropped.
    ///
    /// Every other handle stays valid and keeps addressing the same payload.
    pub fn remove(&mut self, n: NodeId) -> P {
        match self.try_remove(n) {
            Some(payload) => payload,
            None => panic!("node {n:?} does not belong to this tree"),
        }
    }

    /// Like [`remove`](Self::remove), returning `None` for a stale handle.
    pub fn try_remove(&mut self, n: NodeId) -> Option<P> {
        let key = self.key_of(n)?;
        let spliced = red_black::remove(&mut self.nodes, &mut self.root, key);
        trace!(node = ?key, spliced, len = self.nodes.len() - 1, "removed node");
        self.nodes.remove(key).map(|node| node.payload)
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        trace!(len = self.nodes.len(), "clearing tree");
        self.root = None;
        self.nodes.clear();
    }

    /// Binary-search descent driven by `cmp`.
    ///
    /// `cmp` gets the tree and a candidate node and returns how the
    /// candidate orders relative to the target: `Less` continues to the
    /// right, `Greater` to the left, `Equal` stops. The tree is passed in so
    /// the comparator can read payloads and augmentations along the way.
    ///
    /// `cmp` has to be monotonic over the in-order sequence for the result
    /// to mean anything. A comparator that breaks this, or that restructures
    /// the tree, gets an arbitrary answer or a panic on a stale handle.
    pub fn find<C>(&mut self, mut cmp: C) -> Found
    where
        C: FnMut(&mut Self, NodeId) -> Ordering,
    {
        let mut found = Found::default();
        let mut curr = self.root;
        while let Some(key) = curr {
            let n = NodeId::new(key, self.tag);
            match cmp(self, n) {
                Ordering::Less => {
                    found.before = Some(n);
                    curr = get_r(&self.nodes, self.check(n));
                }
                Ordering::Greater => {
                    found.after = Some(n);
                    curr = get_l(&self.nodes, self.check(n));
                }
                Ordering::Equal => {
                    return Found {
                        node: Some(n),
                        before: self.prev(n),
                        after: self.next(n),
                    };
                }
            }
        }
        found
    }

    /// In-order `(handle, payload)` pairs.
    pub fn iter(&self) -> Iter<'_, P, A> {
        self.nodes_in_order()
    }

    /// Handles in in-order sequence.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.iter().map(|(n, _)| n)
    }

    /// Checks every structural invariant.
    pub fn validate(&self) -> Result<()> {
        red_black::validate(&self.nodes, self.root)?;
        let linked = util::size(&self.nodes, self.root);
        if linked != self.nodes.len() {
            return Err(Error::LengthMismatch {
                expected: self.nodes.len(),
                actual: linked,
            });
        }
        Ok(())
    }

    /// Checks that every clean augmentation matches a fresh recomputation.
    pub fn validate_augment(&self) -> Result<()>
    where
        A: PartialEq,
    {
        red_black::validate_augment(&self.nodes, self.root, &self.augment)
    }
}

impl<P, A, F> RbTree<P, A, F> {
    fn nodes_in_order(&self) -> Iter<'_, P, A> {
        Iter::new(
            &self.nodes,
            self.tag,
            util::first(&self.nodes, self.root),
            util::last(&self.nodes, self.root),
        )
    }
}

impl<P, A, F> RbTree<P, A, F>
where
    P: Debug,
{
    /// Multi-line dump of the tree shape, colors and dirty flags.
    pub fn print(&self) -> String {
        red_black::print(&self.nodes, self.root, "")
    }
}

impl<P: Debug, A, F> Debug for RbTree<P, A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes_in_order().map(|(_, p)| p))
            .finish()
    }
}

impl<'a, P, A, F> IntoIterator for &'a RbTree<P, A, F> {
    type Item = (NodeId, &'a P);
    type IntoIter = Iter<'a, P, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes_in_order()
    }
}
