//! Arena-based red-black sequence tree with per-subtree augmentation.
//!
//! [`RbTree`] keeps an ordered sequence of payloads. Order comes from where
//! elements are inserted (before/after an existing node), not from keys. On
//! top of the sequence every subtree carries an aggregate, its augmentation,
//! computed by a caller-supplied combine function. Aggregates are recomputed
//! lazily: mutations only flag the affected path as dirty, and the next read
//! of an augmentation recomputes the dirty nodes bottom-up.
//!
//! Typical uses are flattened list views that need "how many rows are in this
//! subtree" to map a position to a node in O(log n), or any sequence that
//! needs running sums, concatenations or extents over ranges.
//!
//! Nodes live in a [`slotmap`] arena and are addressed by [`NodeId`] handles.
//! A handle stays attached to its payload across rebalancing and the removal
//! of other nodes.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`NodeId`], [`NodeKey`], [`TreeTag`], [`RbNode`], [`Color`], [`Found`] |
//! [`util`] | link accessors, `first` / `last` / `next` / `prev`, `swap` |
//! [`augment`] | dirty marking and lazy recomputation |
//! [`red_black`] | rotations, insert/remove rebalancing, validation, printing |
//! [`tree`] | the [`RbTree`] container |
//! [`iter`] | in-order [`Iter`] |

pub mod augment;
pub mod error;
pub mod iter;
pub mod red_black;
pub mod tree;
pub mod types;
pub mod util;

pub use error::{Error, Result};
pub use iter::Iter;
pub use tree::{AugmentFn, RbTree, SharedRbTree};
pub use types::{Color, Found, NodeId, NodeKey, RbNode, TreeTag};
