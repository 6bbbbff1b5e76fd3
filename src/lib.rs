//! Datrie - A compact double-array trie for static byte-string dictionaries.
//!
//! This crate builds a double-array trie from a sorted key set, answers
//! exact-match and common-prefix queries in time proportional to the query
//! length, and persists the array as a flat buffer of 32-bit cells.
//!
//! # Features
//!
//! - **Exact match**: value of a key, or whether it is only a prefix
//! - **Common-prefix search**: every key that prefixes a query, shortest first
//! - **Incremental traversal**: resume a walk across input chunks
//! - **Binary-safe keys**: any byte, including `0x00` and `0xFF`
//! - **Flat format**: interleaved `base`/`check` cells with no header
//! - **Thread-safe reads**: a built array is immutable and `Sync`
//!
//! # Quick Start
//!
//! ```
//! use datrie::DoubleArray;
//!
//! let array = DoubleArray::build(&["a", "ab", "abc"], Some(&[1, 2, 3])).unwrap();
//!
//! assert_eq!(array.exact_match_search(b"ab"), Some(2));
//! assert_eq!(array.exact_match_search(b"b"), None);
//!
//! let values: Vec<i32> = array
//!     .common_prefix_search(b"abcd", 10)
//!     .iter()
//!     .map(|m| m.value)
//!     .collect();
//! assert_eq!(values, vec![1, 2, 3]);
//! ```
//!
//! # Persistence
//!
//! ```ignore
//! use datrie::DoubleArray;
//! use std::path::Path;
//!
//! array.save(Path::new("words.da"))?;
//! let restored = DoubleArray::open(Path::new("words.da"))?;
//! ```
//!
//! Saved files carry no header: the file length is the array size. Use
//! [`DoubleArray::save_at`] and [`DoubleArray::open_at`] to embed an array
//! inside a larger file.

mod datrie;
mod error;

pub mod dictionary;
pub mod trie;

pub use datrie::DoubleArrayTrie;
pub use dictionary::{Dictionary, DictionaryFormat};
pub use error::{BuildError, Error, Result};
pub use trie::{
    Cursor, DoubleArray, DoubleArrayBuilder, KeySet, Lookup, PrefixMatch, PrefixMatches, Traverse,
    UNIT_SIZE,
};
