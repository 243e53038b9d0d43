use crate::augment::mark_dirty;
use crate::error::{Error, Result};
use crate::types::{Arena, Color, NodeKey};
use crate::util::{
    get_l, get_p, get_r, is_black, is_red, leftmost, replace_child, set_color, set_l, set_p,
    set_r, swap,
};

#[path = "util/print.rs"]
mod print_impl;

pub use print_impl::print;

/// Rotates `n` down to the left; its right child takes its place.
///
/// Both nodes change their child sets, so both are marked dirty.
pub fn rotate_left<P, A>(arena: &mut Arena<P, A>, root: &mut Option<NodeKey>, n: NodeKey) {
    let Some(nr) = get_r(arena, n) else {
        return;
    };
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }

    replace_child(arena, root, p, n, Some(nr));
    set_p(arena, nr, p);
    set_l(arena, nr, Some(n));
    set_p(arena, n, Some(nr));

    mark_dirty(arena, n);
    mark_dirty(arena, nr);
}

/// Rotates `n` down to the right; its left child takes its place.
pub fn rotate_right<P, A>(arena: &mut Arena<P, A>, root: &mut Option<NodeKey>, n: NodeKey) {
    let Some(nl) = get_l(arena, n) else {
        return;
    };
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }

    replace_child(arena, root, p, n, Some(nl));
    set_p(arena, nl, p);
    set_r(arena, nl, Some(n));
    set_p(arena, n, Some(nl));

    mark_dirty(arena, n);
    mark_dirty(arena, nl);
}

/// Attaches detached node `n` as the right child of `p` and rebalances.
///
/// `p` must not have a right child.
pub fn insert_right<P, A>(
    arena: &mut Arena<P, A>,
    root: &mut Option<NodeKey>,
    n: NodeKey,
    p: NodeKey,
) {
    debug_assert!(get_r(arena, p).is_none(), "right slot already taken");
    set_r(arena, p, Some(n));
    attach(arena, root, n, p);
}

/// Attaches detached node `n` as the left child of `p` and rebalances.
///
/// `p` must not have a left child.
pub fn insert_left<P, A>(
    arena: &mut Arena<P, A>,
    root: &mut Option<NodeKey>,
    n: NodeKey,
    p: NodeKey,
) {
    debug_assert!(get_l(arena, p).is_none(), "left slot already taken");
    set_l(arena, p, Some(n));
    attach(arena, root, n, p);
}

fn attach<P, A>(arena: &mut Arena<P, A>, root: &mut Option<NodeKey>, n: NodeKey, p: NodeKey) {
    set_p(arena, n, Some(p));
    set_color(arena, n, Color::Red);
    // `n` is fresh and already dirty; the walk has to start at the parent.
    mark_dirty(arena, p);
    insert_fixup(arena, root, n);
}

fn insert_fixup<P, A>(arena: &mut Arena<P, A>, root: &mut Option<NodeKey>, mut n: NodeKey) {
    while let Some(mut p) = get_p(arena, n) {
        if is_black(arena, Some(p)) {
            break;
        }
        // A red parent is never the root, so this only guards corrupt input.
        let Some(g) = get_p(arena, p) else {
            break;
        };

        let p_is_left = get_l(arena, g) == Some(p);
        let u = if p_is_left {
            get_r(arena, g)
        } else {
            get_l(arena, g)
        };

        if is_red(arena, u) {
            set_color(arena, p, Color::Black);
            if let Some(u) = u {
                set_color(arena, u, Color::Black);
            }
            set_color(arena, g, Color::Red);
            n = g;
            continue;
        }

        // Zig-zag: lift the inner grandchild to the outer position first.
        if p_is_left && get_r(arena, p) == Some(n) {
            rotate_left(arena, root, p);
            p = n;
        } else if !p_is_left && get_l(arena, p) == Some(n) {
            rotate_right(arena, root, p);
            p = n;
        }

        set_color(arena, p, Color::Black);
        set_color(arena, g, Color::Red);
        if p_is_left {
            rotate_right(arena, root, g);
        } else {
            rotate_left(arena, root, g);
        }
        break;
    }

    if let Some(r) = *root {
        set_color(arena, r, Color::Black);
    }
}

/// Unlinks `n` from the tree and rebalances. `n` stays in the arena,
/// detached, for the caller to free.
///
/// A node with two children trades places with its in-order successor first
/// (links and colors only), so the successor keeps its identity and every
/// outstanding handle stays valid. Returns `true` when that relocation
/// happened.
pub fn remove<P, A>(arena: &mut Arena<P, A>, root: &mut Option<NodeKey>, n: NodeKey) -> bool {
    let mut spliced = false;
    if let (Some(_), Some(r)) = (get_l(arena, n), get_r(arena, n)) {
        let successor = leftmost(arena, r);
        swap(arena, root, n, successor);
        let color = arena[n].color;
        arena[n].color = arena[successor].color;
        arena[successor].color = color;
        mark_dirty(arena, successor);
        spliced = true;
    }

    let child = get_l(arena, n).or(get_r(arena, n));
    let parent = get_p(arena, n);
    replace_child(arena, root, parent, n, child);
    if let Some(child) = child {
        set_p(arena, child, parent);
    }
    if let Some(parent) = parent {
        mark_dirty(arena, parent);
    }

    if is_black(arena, Some(n)) {
        remove_fixup(arena, root, child, parent);
    }

    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);
    spliced
}

/// Restores black height after a black node was unlinked. `x` is the node
/// that took its place (possibly a null leaf), `parent` is x's parent.
fn remove_fixup<P, A>(
    arena: &mut Arena<P, A>,
    root: &mut Option<NodeKey>,
    mut x: Option<NodeKey>,
    mut parent: Option<NodeKey>,
) {
    while x != *root && is_black(arena, x) {
        let Some(p) = parent else {
            break;
        };

        if get_l(arena, p) == x {
            let Some(mut s) = get_r(arena, p) else {
                break;
            };
            if is_red(arena, Some(s)) {
                set_color(arena, s, Color::Black);
                set_color(arena, p, Color::Red);
                rotate_left(arena, root, p);
                let Some(next) = get_r(arena, p) else {
                    break;
                };
                s = next;
            }
            if is_black(arena, get_l(arena, s)) && is_black(arena, get_r(arena, s)) {
                set_color(arena, s, Color::Red);
                x = Some(p);
                parent = get_p(arena, p);
                continue;
            }
            if is_black(arena, get_r(arena, s)) {
                if let Some(sl) = get_l(arena, s) {
                    set_color(arena, sl, Color::Black);
                }
                set_color(arena, s, Color::Red);
                rotate_right(arena, root, s);
                let Some(next) = get_r(arena, p) else {
                    break;
                };
                s = next;
            }
            let parent_color = arena[p].color;
            set_color(arena, s, parent_color);
            set_color(arena, p, Color::Black);
            if let Some(sr) = get_r(arena, s) {
                set_color(arena, sr, Color::Black);
            }
            rotate_left(arena, root, p);
        } else {
            let Some(mut s) = get_l(arena, p) else {
                break;
            };
            if is_red(arena, Some(s)) {
                set_color(arena, s, Color::Black);
                set_color(arena, p, Color::Red);
                rotate_right(arena, root, p);
                let Some(next) = get_l(arena, p) else {
                    break;
                };
                s = next;
            }
            if is_black(arena, get_l(arena, s)) && is_black(arena, get_r(arena, s)) {
                set_color(arena, s, Color::Red);
                x = Some(p);
                parent = get_p(arena, p);
                continue;
            }
            if is_black(arena, get_l(arena, s)) {
                if let Some(sr) = get_r(arena, s) {
                    set_color(arena, sr, Color::Black);
                }
                set_color(arena, s, Color::Red);
                rotate_left(arena, root, s);
                let Some(next) = get_l(arena, p) else {
                    break;
                };
                s = next;
            }
            let parent_color = arena[p].color;
            set_color(arena, s, parent_color);
            set_color(arena, p, Color::Black);
            if let Some(sl) = get_l(arena, s) {
                set_color(arena, sl, Color::Black);
            }
            rotate_right(arena, root, p);
        }
        x = *root;
        break;
    }

    if let Some(x) = x {
        set_color(arena, x, Color::Black);
    }
}

/// Checks the red-black invariants, parent links and dirty-flag propagation
/// of the tree rooted at `root`.
pub fn validate<P, A>(arena: &Arena<P, A>, root: Option<NodeKey>) -> Result<()> {
    let Some(root) = root else {
        return Ok(());
    };
    if get_p(arena, root).is_some() {
        return Err(Error::RootHasParent);
    }
    if !is_black(arena, Some(root)) {
        return Err(Error::RootNotBlack);
    }
    black_height(arena, root).map(|_| ())
}

fn black_height<P, A>(arena: &Arena<P, A>, node: NodeKey) -> Result<usize> {
    let l = get_l(arena, node);
    let r = get_r(arena, node);

    for child in [l, r].into_iter().flatten() {
        if get_p(arena, child) != Some(node) {
            return Err(Error::BrokenParentLink(child));
        }
        if is_red(arena, Some(node)) && is_red(arena, Some(child)) {
            return Err(Error::RedRedViolation(child));
        }
        if arena[child].dirty && !arena[node].dirty {
            return Err(Error::StaleAugment(node));
        }
    }

    let left = l.map_or(Ok(0), |l| black_height(arena, l))?;
    let right = r.map_or(Ok(0), |r| black_height(arena, r))?;
    if left != right {
        return Err(Error::BlackHeightMismatch { node, left, right });
    }

    Ok(left + usize::from(is_black(arena, Some(node))))
}

/// Checks that every clean node holds exactly what `f` computes from its
/// payload and its children's augmentations.
pub fn validate_augment<P, A, F>(arena: &Arena<P, A>, root: Option<NodeKey>, f: &F) -> Result<()>
where
    A: PartialEq,
    F: Fn(&P, Option<&A>, Option<&A>) -> A,
{
    let mut stack: Vec<NodeKey> = root.into_iter().collect();
    while let Some(node) = stack.pop() {
        let n = &arena[node];
        stack.extend(n.l);
        stack.extend(n.r);
        if n.dirty {
            continue;
        }
        let left = n.l.and_then(|l| arena[l].augment.as_ref());
        let right = n.r.and_then(|r| arena[r].augment.as_ref());
        let expected = f(&n.payload, left, right);
        if n.augment.as_ref() != Some(&expected) {
            return Err(Error::StaleAugment(node));
        }
    }
    Ok(())
}
