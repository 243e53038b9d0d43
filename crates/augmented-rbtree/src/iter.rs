use std::iter::FusedIterator;

use crate::types::{Arena, NodeId, NodeKey, TreeTag};
use crate::util::{next, prev};

/// In-order iterator over `(handle, payload)` pairs.
///
/// Walks successor links from both ends; the remaining count keeps the two
/// cursors from crossing.
#[derive(Clone, Debug)]
pub struct Iter<'a, P, A> {
    arena: &'a Arena<P, A>,
    tree: TreeTag,
    front: Option<NodeKey>,
    back: Option<NodeKey>,
    remaining: usize,
}

impl<'a, P, A> Iter<'a, P, A> {
    pub(crate) fn new(
        arena: &'a Arena<P, A>,
        tree: TreeTag,
        front: Option<NodeKey>,
        back: Option<NodeKey>,
    ) -> Self {
        Self {
            arena,
            tree,
            front,
            back,
            remaining: arena.len(),
        }
    }
}

impl<'a, P, A> Iterator for Iter<'a, P, A> {
    type Item = (NodeId, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let curr = self.front?;
        self.front = next(self.arena, curr);
        self.remaining -= 1;
        Some((NodeId::new(curr, self.tree), &self.arena[curr].payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P, A> DoubleEndedIterator for Iter<'_, P, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let curr = self.back?;
        self.back = prev(self.arena, curr);
        self.remaining -= 1;
        Some((NodeId::new(curr, self.tree), &self.arena[curr].payload))
    }
}

impl<P, A> ExactSizeIterator for Iter<'_, P, A> {}

impl<P, A> FusedIterator for Iter<'_, P, A> {}
