//! Link accessors and in-order navigation over an [`Arena`].
//!
//! All functions work on handles into the arena and never allocate. Passing a
//! handle that is not in `arena` panics (slot map indexing).

pub mod swap;

use crate::types::{Arena, Color, NodeKey};

pub use swap::swap;

#[inline]
pub(crate) fn get_p<P, A>(arena: &Arena<P, A>, idx: NodeKey) -> Option<NodeKey> {
    arena[idx].p
}

#[inline]
pub(crate) fn get_l<P, A>(arena: &Arena<P, A>, idx: NodeKey) -> Option<NodeKey> {
    arena[idx].l
}

#[inline]
pub(crate) fn get_r<P, A>(arena: &Arena<P, A>, idx: NodeKey) -> Option<NodeKey> {
    arena[idx].r
}

#[inline]
pub(crate) fn set_p<P, A>(arena: &mut Arena<P, A>, idx: NodeKey, v: Option<NodeKey>) {
    arena[idx].p = v;
}

#[inline]
pub(crate) fn set_l<P, A>(arena: &mut Arena<P, A>, idx: NodeKey, v: Option<NodeKey>) {
    arena[idx].l = v;
}

#[inline]
pub(crate) fn set_r<P, A>(arena: &mut Arena<P, A>, idx: NodeKey, v: Option<NodeKey>) {
    arena[idx].r = v;
}

/// Null leaves count as black.
#[inline]
pub(crate) fn is_black<P, A>(arena: &Arena<P, A>, idx: Option<NodeKey>) -> bool {
    idx.map_or(true, |i| arena[i].color == Color::Black)
}

#[inline]
pub(crate) fn is_red<P, A>(arena: &Arena<P, A>, idx: Option<NodeKey>) -> bool {
    !is_black(arena, idx)
}

#[inline]
pub(crate) fn set_color<P, A>(arena: &mut Arena<P, A>, idx: NodeKey, color: Color) {
    arena[idx].color = color;
}

/// Replaces `old` with `new` in the child slot of `parent` (or the root).
pub(crate) fn replace_child<P, A>(
    arena: &mut Arena<P, A>,
    root: &mut Option<NodeKey>,
    parent: Option<NodeKey>,
    old: NodeKey,
    new: Option<NodeKey>,
) {
    match parent {
        None => *root = new,
        Some(p) => {
            if get_l(arena, p) == Some(old) {
                set_l(arena, p, new);
            } else {
                set_r(arena, p, new);
            }
        }
    }
}

/// Leftmost node of the subtree rooted at `idx`.
pub fn leftmost<P, A>(arena: &Arena<P, A>, mut idx: NodeKey) -> NodeKey {
    while let Some(l) = get_l(arena, idx) {
        idx = l;
    }
    idx
}

/// Rightmost node of the subtree rooted at `idx`.
pub fn rightmost<P, A>(arena: &Arena<P, A>, mut idx: NodeKey) -> NodeKey {
    while let Some(r) = get_r(arena, idx) {
        idx = r;
    }
    idx
}

/// First node in in-order sequence.
pub fn first<P, A>(arena: &Arena<P, A>, root: Option<NodeKey>) -> Option<NodeKey> {
    root.map(|r| leftmost(arena, r))
}

/// Last node in in-order sequence.
pub fn last<P, A>(arena: &Arena<P, A>, root: Option<NodeKey>) -> Option<NodeKey> {
    root.map(|r| rightmost(arena, r))
}

/// In-order successor.
pub fn next<P, A>(arena: &Arena<P, A>, mut curr: NodeKey) -> Option<NodeKey> {
    if let Some(r) = get_r(arena, curr) {
        return Some(leftmost(arena, r));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<P, A>(arena: &Arena<P, A>, mut curr: NodeKey) -> Option<NodeKey> {
    if let Some(l) = get_l(arena, curr) {
        return Some(rightmost(arena, l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn size_inner<P, A>(arena: &Arena<P, A>, root: NodeKey) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`, counted by walking the links.
pub fn size<P, A>(arena: &Arena<P, A>, root: Option<NodeKey>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RbNode;

    /// Hand-wired three node tree: b is root, a and c its children.
    fn abc() -> (Arena<char, ()>, NodeKey, NodeKey, NodeKey) {
        let mut arena = Arena::with_key();
        let a = arena.insert(RbNode::new('a'));
        let b = arena.insert(RbNode::new('b'));
        let c = arena.insert(RbNode::new('c'));
        set_l(&mut arena, b, Some(a));
        set_r(&mut arena, b, Some(c));
        set_p(&mut arena, a, Some(b));
        set_p(&mut arena, c, Some(b));
        (arena, a, b, c)
    }

    #[test]
    fn walks_in_order_both_ways() {
        let (arena, a, b, c) = abc();
        assert_eq!(first(&arena, Some(b)), Some(a));
        assert_eq!(last(&arena, Some(b)), Some(c));
        assert_eq!(next(&arena, a), Some(b));
        assert_eq!(next(&arena, b), Some(c));
        assert_eq!(next(&arena, c), None);
        assert_eq!(prev(&arena, c), Some(b));
        assert_eq!(prev(&arena, b), Some(a));
        assert_eq!(prev(&arena, a), None);
        assert_eq!(size(&arena, Some(b)), 3);
        assert_eq!(size(&arena, None), 0);
    }

    #[test]
    fn null_leaves_are_black() {
        let (arena, a, _, _) = abc();
        assert!(is_black(&arena, None));
        assert!(is_red(&arena, Some(a)));
    }
}
