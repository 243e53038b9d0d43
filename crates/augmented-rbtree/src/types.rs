//! Node handle and node record definitions.
//!
//! Nodes live in a [`slotmap::SlotMap`] arena. Every "pointer" is an
//! `Option<NodeKey>`; the parent link is a plain handle with no ownership
//! attached, so the arena stays the single owner of every node.

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of a node. Links between nodes are stored as keys.
    pub struct NodeKey;
}

static NEXT_TREE: AtomicU64 = AtomicU64::new(1);

/// Tag naming the tree a [`NodeId`] was issued by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeTag(u64);

impl TreeTag {
    /// A tag no other tree in this process carries.
    pub(crate) fn fresh() -> Self {
        Self(NEXT_TREE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable handle to a node of an [`RbTree`](crate::RbTree).
///
/// A handle keeps addressing the same node across rotations and removal
/// of other nodes. Once its node is removed the handle goes stale; the slot
/// generation guarantees it never aliases a later node, and the tree tag
/// keeps it from addressing a node of another tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) key: NodeKey,
    pub(crate) tree: TreeTag,
}

impl NodeId {
    pub(crate) fn new(key: NodeKey, tree: TreeTag) -> Self {
        Self { key, tree }
    }

    /// Arena key, as used in [`RbNode`] links and [`Error`](crate::Error).
    pub fn key(&self) -> NodeKey {
        self.key
    }
}

/// Node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A single tree node: links, color, dirty flag, payload and augmentation.
#[derive(Clone, Debug)]
pub struct RbNode<P, A> {
    pub(crate) p: Option<NodeKey>,
    pub(crate) l: Option<NodeKey>,
    pub(crate) r: Option<NodeKey>,
    pub(crate) color: Color,
    /// Set while `augment` does not reflect the current subtree.
    pub(crate) dirty: bool,
    pub(crate) payload: P,
    /// `None` until the node is cleaned for the first time.
    pub(crate) augment: Option<A>,
}

impl<P, A> RbNode<P, A> {
    /// Fresh detached node. New nodes are red and dirty.
    pub fn new(payload: P) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            color: Color::Red,
            dirty: true,
            payload,
            augment: None,
        }
    }

    /// Whether the node is black.
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    /// Whether the stored augmentation is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Node color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Caller payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }
}

/// Node storage shared by all the free functions of this crate.
pub type Arena<P, A> = SlotMap<NodeKey, RbNode<P, A>>;

/// Result of [`RbTree::find`](crate::RbTree::find).
///
/// On an exact match `node` is set and `before`/`after` are its direct
/// in-order neighbours. Otherwise `node` is `None` and `before`/`after` are
/// the tightest bounds met during the descent, i.e. the position where the
/// searched element would be inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Found {
    pub node: Option<NodeId>,
    pub before: Option<NodeId>,
    pub after: Option<NodeId>,
}
