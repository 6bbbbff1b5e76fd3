//! Stateful trie handle: created empty, built once, queried many times.

use std::path::Path;

use crate::trie::{
    Cursor, DoubleArray, DoubleArrayBuilder, KeySet, Lookup, PrefixMatch, Traverse, ROOT, UNIT_SIZE,
};
use crate::{BuildError, Result};

/// A double-array trie slot that is either empty or holds a built array.
///
/// `build`, `set_array`, `load` and `clear` replace the array wholesale and
/// need `&mut self`; every query takes `&self`. A failed build leaves the
/// trie empty.
///
/// # Example
///
/// ```
/// use datrie::DoubleArrayTrie;
///
/// let mut trie = DoubleArrayTrie::new();
/// trie.build_unsorted(&["hello", "world", "he", "hell"], Some(&[0, 1, 2, 3]))
///     .expect("build failed");
///
/// assert_eq!(trie.find("hello", None), Some(0));
/// let values: Vec<i32> = trie
///     .common_prefix_search("hello", 2, None)
///     .iter()
///     .map(|m| m.value)
///     .collect();
/// assert_eq!(values, vec![2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DoubleArrayTrie {
    array: Option<DoubleArray>,
}

impl DoubleArrayTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from keys in ascending byte order and return the unit count.
    pub fn build<K: AsRef<[u8]>>(
        &mut self,
        keys: &[K],
        values: Option<&[i32]>,
    ) -> std::result::Result<usize, BuildError> {
        self.array = None;
        let keyset = KeySet::new(keys, values)?;
        self.build_keyset(&keyset)
    }

    /// Build from keys in any order; values travel with their keys.
    pub fn build_unsorted<K: AsRef<[u8]>>(
        &mut self,
        keys: &[K],
        values: Option<&[i32]>,
    ) -> std::result::Result<usize, BuildError> {
        self.array = None;
        let keyset = KeySet::from_unsorted(keys, values)?;
        self.build_keyset(&keyset)
    }

    /// Build from a prepared key set.
    pub fn build_keyset(&mut self, keyset: &KeySet<'_>) -> std::result::Result<usize, BuildError> {
        self.array = None;
        let array = DoubleArrayBuilder::new().build(keyset)?;
        let size = array.size();
        self.array = Some(array);
        Ok(size)
    }

    /// Value of `key`, walking from `node_pos` (default: the root).
    pub fn find<K: AsRef<[u8]>>(&self, key: K, node_pos: Option<usize>) -> Option<i32> {
        self.array
            .as_ref()?
            .exact_match_search_from(key.as_ref(), node_pos.unwrap_or(ROOT))
    }

    /// Exact lookup distinguishing prefix-only paths from misses.
    pub fn lookup<K: AsRef<[u8]>>(&self, key: K) -> Lookup {
        match &self.array {
            Some(array) => array.lookup(key.as_ref()),
            None => Lookup::Absent,
        }
    }

    /// At most `max_results` prefixes of `key`, shortest first.
    pub fn common_prefix_search<K: AsRef<[u8]>>(
        &self,
        key: K,
        max_results: usize,
        node_pos: Option<usize>,
    ) -> Vec<PrefixMatch> {
        match &self.array {
            Some(array) => {
                array.common_prefix_search_from(key.as_ref(), max_results, node_pos.unwrap_or(ROOT))
            }
            None => Vec::new(),
        }
    }

    /// Number of prefixes of `key`, ignoring any cap.
    pub fn count_prefix_matches<K: AsRef<[u8]>>(&self, key: K, node_pos: Option<usize>) -> usize {
        match &self.array {
            Some(array) => {
                array.count_prefix_matches_from(key.as_ref(), node_pos.unwrap_or(ROOT))
            }
            None => 0,
        }
    }

    /// Advance `cursor` along `key`; see [`DoubleArray::traverse`].
    pub fn traverse<K: AsRef<[u8]>>(&self, key: K, cursor: &mut Cursor) -> Traverse {
        match &self.array {
            Some(array) => array.traverse(key.as_ref(), cursor),
            None => Traverse::Failed,
        }
    }

    /// Drop the built array.
    pub fn clear(&mut self) {
        self.array = None;
    }

    /// Whether no array is held, or the held array has no units.
    pub fn is_empty(&self) -> bool {
        self.array.as_ref().map_or(true, DoubleArray::is_empty)
    }

    /// Number of units.
    pub fn size(&self) -> usize {
        self.array.as_ref().map_or(0, DoubleArray::size)
    }

    /// Size of one unit in bytes.
    pub fn unit_size(&self) -> usize {
        UNIT_SIZE
    }

    /// Size of all units in bytes.
    pub fn total_size(&self) -> usize {
        self.size() * UNIT_SIZE
    }

    /// Borrow the built array.
    pub fn array(&self) -> Option<&DoubleArray> {
        self.array.as_ref()
    }

    /// Raw cells of the built array.
    pub fn get_array(&self) -> Option<&[u32]> {
        self.array.as_ref().map(DoubleArray::as_cells)
    }

    /// Replace the array with raw cells, trusting their contents.
    pub fn set_array(&mut self, cells: Vec<u32>) {
        self.array = Some(DoubleArray::from_cells(cells));
    }

    /// Load `size` bytes (default: to end of file) at `offset` (default: 0).
    pub fn load(&mut self, path: &Path, offset: Option<usize>, size: Option<usize>) -> Result<()> {
        self.array = None;
        self.array = Some(DoubleArray::open_at(path, offset.unwrap_or(0), size)?);
        Ok(())
    }

    /// Save the array to `path`; with an offset the rest of the file is kept.
    ///
    /// An empty trie is saved as zero units.
    pub fn dump(&self, path: &Path, offset: Option<u64>) -> Result<()> {
        let empty = DoubleArray::default();
        let array = self.array.as_ref().unwrap_or(&empty);
        match offset {
            Some(offset) => array.save_at(path, offset),
            None => array.save(path),
        }
    }
}

impl From<DoubleArray> for DoubleArrayTrie {
    fn from(array: DoubleArray) -> Self {
        Self { array: Some(array) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let trie = DoubleArrayTrie::new();
        assert!(trie.find("hello", None).is_none());
        assert!(trie.is_empty());
        assert_eq!(trie.size(), 0);
        assert!(trie.get_array().is_none());
    }

    #[test]
    fn test_builder() {
        let mut trie = DoubleArrayTrie::new();
        let keys = ["hello", "world", "he", "hell"];
        let values = [0, 1, 2, 3];
        let size = trie.build_unsorted(&keys, Some(&values)).expect("build failed");
        assert_eq!(size, trie.size());

        for (key, value) in keys.iter().zip(&values) {
            assert_eq!(trie.find(key, None), Some(*value));
        }

        trie.clear();
        assert!(trie.is_empty());
    }

    #[test]
    fn test_common_prefix_search() {
        let mut trie = DoubleArrayTrie::new();
        trie.build_unsorted(&["hello", "world", "he", "hell"], Some(&[0, 1, 2, 3]))
            .expect("build failed");

        let matches = trie.common_prefix_search("hello", 2, None);
        let values: Vec<i32> = matches.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2, 3]);
        assert_eq!(trie.count_prefix_matches("hello", None), 3);
    }

    #[test]
    fn test_traverse() {
        let mut trie = DoubleArrayTrie::new();
        trie.build_unsorted(&["hello", "world", "he"], Some(&[0, 1, 2]))
            .expect("build failed");

        let mut cursor = Cursor::new();
        assert_eq!(trie.traverse("hel", &mut cursor), Traverse::NoValue);
        cursor.key_pos = 0;
        assert_eq!(trie.traverse("l", &mut cursor), Traverse::NoValue);
        cursor.key_pos = 0;
        assert_eq!(trie.traverse("o", &mut cursor), Traverse::Value(0));
    }

    #[test]
    fn test_failed_build_leaves_trie_empty() {
        let mut trie = DoubleArrayTrie::new();
        trie.build(&["a"], None).unwrap();
        assert!(!trie.is_empty());

        let err = trie.build(&["a", "b"], Some(&[0, -1])).unwrap_err();
        assert_eq!(err, BuildError::NegativeValue { index: 1, value: -1 });
        assert!(trie.is_empty());
        assert_eq!(trie.find("a", None), None);
    }

    #[test]
    fn test_set_array_replaces_contents() {
        let mut source = DoubleArrayTrie::new();
        source.build(&["ab", "cd"], Some(&[4, 8])).unwrap();
        let cells = source.get_array().unwrap().to_vec();

        let mut trie = DoubleArrayTrie::new();
        trie.set_array(cells);
        assert_eq!(trie.size(), source.size());
        assert_eq!(trie.total_size(), source.size() * 8);
        assert_eq!(trie.find("cd", None), Some(8));
    }

    #[test]
    fn test_set_array_drops_odd_trailing_cell() {
        let mut source = DoubleArrayTrie::new();
        source.build(&["a", "b"], None).unwrap();
        let mut cells = source.get_array().unwrap().to_vec();
        cells.push(0xDEAD);

        let mut trie = DoubleArrayTrie::new();
        trie.set_array(cells);
        assert_eq!(trie.size(), source.size());
        assert_eq!(trie.get_array().unwrap().len(), trie.size() * 2);
        assert_eq!(trie.get_array(), source.get_array());
        assert_eq!(trie.find("b", None), Some(1));
    }

    #[test]
    fn test_find_from_node() {
        let mut trie = DoubleArrayTrie::new();
        trie.build(&["abc", "abd"], None).unwrap();

        let mut cursor = Cursor::new();
        trie.traverse("ab", &mut cursor);
        assert_eq!(trie.find("d", Some(cursor.node_pos)), Some(1));
    }

    #[test]
    fn test_queries_on_empty_trie() {
        let trie = DoubleArrayTrie::new();
        assert_eq!(trie.lookup("a"), Lookup::Absent);
        assert!(trie.common_prefix_search("abc", 4, None).is_empty());
        assert_eq!(trie.traverse("a", &mut Cursor::new()), Traverse::Failed);
    }
}
