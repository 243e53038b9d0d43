//! Lazily recomputed per-subtree aggregates.
//!
//! A node's augmentation is valid only while its dirty flag is clear. Any
//! change to a node's payload or child set marks it dirty, together with
//! every ancestor up to the first one that is already dirty. Reading the
//! augmentation cleans the node, cleaning dirty descendants first.
//!
//! Invariant: a dirty node has only dirty ancestors. [`clean`] is the only
//! place that clears the flag, and it always recomputes before clearing, so
//! the early stop in [`mark_dirty`] never leaves a stale ancestor behind.
//!
//! The combine function has the shape `Fn(&P, Option<&A>, Option<&A>) -> A`:
//! the node's own payload plus the augmentations of its children, `None`
//! for an absent child.

use crate::types::{Arena, NodeKey};

/// Marks `n` and its ancestors dirty.
pub fn mark_dirty<P, A>(arena: &mut Arena<P, A>, n: NodeKey) {
    let mut curr = Some(n);
    while let Some(i) = curr {
        let node = &mut arena[i];
        if node.dirty {
            return;
        }
        node.dirty = true;
        curr = node.p;
    }
}

/// Recomputes the augmentation of `n` if it is dirty.
///
/// Only dirty nodes are visited, and those form a connected set that includes
/// the path to each of them, so the recursion depth never exceeds the tree
/// height.
pub fn clean<P, A, F>(arena: &mut Arena<P, A>, f: &F, n: NodeKey)
where
    F: Fn(&P, Option<&A>, Option<&A>) -> A,
{
    if !arena[n].dirty {
        return;
    }

    let l = arena[n].l;
    let r = arena[n].r;
    if let Some(l) = l {
        clean(arena, f, l);
    }
    if let Some(r) = r {
        clean(arena, f, r);
    }

    let value = {
        let left = l.and_then(|l| arena[l].augment.as_ref());
        let right = r.and_then(|r| arena[r].augment.as_ref());
        f(&arena[n].payload, left, right)
    };

    let node = &mut arena[n];
    node.augment = Some(value);
    node.dirty = false;
}

/// Cleans `n` and returns its now valid augmentation.
///
/// `clean` stores `Some` before it clears `dirty`, and nothing else clears the
/// flag, so a clean node always carries an augmentation.
pub fn get_augment<'a, P, A, F>(arena: &'a mut Arena<P, A>, f: &F, n: NodeKey) -> &'a A
where
    F: Fn(&P, Option<&A>, Option<&A>) -> A,
{
    clean(arena, f, n);
    arena[n]
        .augment
        .as_ref()
        .expect("clean node carries an augmentation")
}
