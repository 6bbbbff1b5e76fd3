//! Double-array trie construction, traversal and persisted format.
//!
//! A trie node is a unit of two integers. `base` gives the offset at which
//! the node's children live; `check` names the parent that owns a slot.
//! Following byte `b` out of node `p` lands on `base[p] + b + 1`, and the
//! move is valid only when `check` of that slot is `p`. Label `0` marks the
//! end of a key: that child's `base` stores `-(value + 1)`.
//!
//! # Cell Layout
//!
//! ```text
//! +----------+----------+----------+----------+-----
//! | base[0]  | check[0] | base[1]  | check[1] | ...
//! +----------+----------+----------+----------+-----
//!   u32 LE     u32 LE     u32 LE     u32 LE
//! ```
//!
//! There is no header, magic or checksum. The buffer holds `2 * size()`
//! cells and its length is tracked by whoever stores it.

mod array;
mod builder;
mod format;
mod keyset;
mod search;


pub use array::DoubleArray;
pub use builder::DoubleArrayBuilder;
pub use format::*;
pub use keyset::KeySet;
pub use search::{Cursor, Lookup, PrefixMatch, PrefixMatches, Traverse};
