use std::fmt::Debug;

use crate::types::{Arena, NodeKey};

/// Debug printer for the tree rooted at `node`.
///
/// Dirty nodes are flagged with `*`.
pub fn print<P, A>(arena: &Arena<P, A>, node: Option<NodeKey>, tab: &str) -> String
where
    P: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i];
            let color = if n.is_black() { "black" } else { "red" };
            let dirty = if n.is_dirty() { "*" } else { "" };
            let left = print(arena, n.l, &format!("{tab}  "));
            let right = print(arena, n.r, &format!("{tab}  "));
            format!(
                "Node[{i:?}]{dirty} {color} {{ {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.payload
            )
        }
    }
}
