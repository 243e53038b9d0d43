use thiserror::Error;

use crate::types::NodeKey;

/// Invariant violation reported by [`RbTree::validate`](crate::RbTree::validate).
///
/// Tree operations never return these: a well-formed tree cannot reach an
/// invalid state. They exist to make corruption visible in tests and debug
/// tooling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("root has a parent")]
    RootHasParent,
    #[error("root is not black")]
    RootNotBlack,
    #[error("red node has red child {0:?}")]
    RedRedViolation(NodeKey),
    #[error("black height mismatch under {node:?}: left {left}, right {right}")]
    BlackHeightMismatch {
        node: NodeKey,
        left: usize,
        right: usize,
    },
    #[error("broken parent link on {0:?}")]
    BrokenParentLink(NodeKey),
    #[error("stale augmentation on clean node {0:?}")]
    StaleAugment(NodeKey),
    #[error("tree holds {actual} linked nodes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
