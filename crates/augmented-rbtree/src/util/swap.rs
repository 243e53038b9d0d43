use crate::types::{Arena, NodeKey};

use super::{get_l, get_p, get_r, replace_child, set_l, set_p, set_r};

/// Exchanges the tree positions of `x` and `y` by rewiring links.
///
/// Payloads, augmentations, colors and dirty flags stay with their nodes;
/// only the structure moves. Handles the case where one node is the direct
/// parent of the other.
pub fn swap<P, A>(
    arena: &mut Arena<P, A>,
    root: &mut Option<NodeKey>,
    x: NodeKey,
    y: NodeKey,
) {
    if x == y {
        return;
    }

    let xp = get_p(arena, x);
    let xl = get_l(arena, x);
    let xr = get_r(arena, x);

    let yp = get_p(arena, y);
    let yl = get_l(arena, y);
    let yr = get_r(arena, y);

    // Re-point the parents first, while their child slots still name the old
    // occupants. A parent that is one of the swapped nodes is handled below.
    match (xp, yp) {
        (Some(p), Some(q)) if p == q => {
            let l = get_l(arena, p);
            set_l(arena, p, get_r(arena, p));
            set_r(arena, p, l);
        }
        _ => {
            if xp != Some(y) {
                replace_child(arena, root, xp, x, Some(y));
            }
            if yp != Some(x) {
                replace_child(arena, root, yp, y, Some(x));
            }
        }
    }

    let swap_ref = |v: Option<NodeKey>| match v {
        Some(v) if v == x => Some(y),
        Some(v) if v == y => Some(x),
        other => other,
    };

    set_p(arena, x, swap_ref(yp));
    set_l(arena, x, swap_ref(yl));
    set_r(arena, x, swap_ref(yr));
    set_p(arena, y, swap_ref(xp));
    set_l(arena, y, swap_ref(xl));
    set_r(arena, y, swap_ref(xr));

    for child in [get_l(arena, x), get_r(arena, x)].into_iter().flatten() {
        set_p(arena, child, Some(x));
    }
    for child in [get_l(arena, y), get_r(arena, y)].into_iter().flatten() {
        set_p(arena, child, Some(y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RbNode;
    use crate::util::{first, next};

    fn in_order(arena: &Arena<u8, ()>, root: Option<NodeKey>) -> Vec<u8> {
        let mut out = Vec::new();
        let mut curr = first(arena, root);
        while let Some(i) = curr {
            out.push(arena[i].payload);
            curr = next(arena, i);
        }
        out
    }

    #[test]
    fn swaps_parent_with_direct_child() {
        let mut arena = Arena::with_key();
        let a = arena.insert(RbNode::new(1));
        let b = arena.insert(RbNode::new(2));
        let c = arena.insert(RbNode::new(3));
        // b(a, c)
        set_l(&mut arena, b, Some(a));
        set_r(&mut arena, b, Some(c));
        set_p(&mut arena, a, Some(b));
        set_p(&mut arena, c, Some(b));
        let mut root = Some(b);

        swap(&mut arena, &mut root, b, c);

        assert_eq!(root, Some(c));
        assert_eq!(get_p(&arena, c), None);
        assert_eq!(get_l(&arena, c), Some(a));
        assert_eq!(get_r(&arena, c), Some(b));
        assert_eq!(get_p(&arena, b), Some(c));
        assert_eq!(get_p(&arena, a), Some(c));
        assert_eq!(in_order(&arena, root), vec![1, 3, 2]);
    }

    #[test]
    fn swaps_distant_nodes() {
        let mut arena = Arena::with_key();
        let ids: Vec<NodeKey> = (1..=4).map(|v| arena.insert(RbNode::new(v))).collect();
        // ids[1](ids[0], ids[2](_, ids[3]))
        set_l(&mut arena, ids[1], Some(ids[0]));
        set_p(&mut arena, ids[0], Some(ids[1]));
        set_r(&mut arena, ids[1], Some(ids[2]));
        set_p(&mut arena, ids[2], Some(ids[1]));
        set_r(&mut arena, ids[2], Some(ids[3]));
        set_p(&mut arena, ids[3], Some(ids[2]));
        let mut root = Some(ids[1]);

        swap(&mut arena, &mut root, ids[0], ids[3]);

        assert_eq!(root, Some(ids[1]));
        assert_eq!(get_l(&arena, ids[1]), Some(ids[3]));
        assert_eq!(get_r(&arena, ids[2]), Some(ids[0]));
        assert_eq!(in_order(&arena, root), vec![4, 2, 3, 1]);
    }
}
