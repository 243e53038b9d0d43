//! Red-black balancing over the node arena.

pub mod util;

pub use util::{
    insert_left, insert_right, print, remove, rotate_left, rotate_right, validate,
    validate_augment,
};
