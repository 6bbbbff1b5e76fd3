//! Traversal over a built double array.
//!
//! Exact match, common-prefix search and incremental traversal all walk the
//! same transition function: from node `p`, label `c` leads to
//! `base[p] + c` when that slot's `check` names `p`. Every read is
//! bounds-checked, so a corrupted array yields wrong answers, never a panic.

use super::array::DoubleArray;
use super::format::{decode_value, label, END_LABEL, ROOT};

/// A dictionary entry that is a prefix of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixMatch {
    /// Stored value.
    pub value: i32,
    /// Number of query bytes the entry spans.
    pub length: usize,
}

/// Outcome of an exact lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The key is in the dictionary.
    Found(i32),
    /// The key is a strict prefix of at least one key but not a key itself.
    PrefixOnly,
    /// No key starts with the query.
    Absent,
}

impl Lookup {
    /// Value if the key was found.
    pub fn value(self) -> Option<i32> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::PrefixOnly | Lookup::Absent => None,
        }
    }
}

/// Outcome of [`DoubleArray::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traverse {
    /// All bytes consumed; the reached node is a key.
    Value(i32),
    /// All bytes consumed; the reached node is not a key.
    NoValue,
    /// A transition was missing; the cursor stops at the failing byte.
    Failed,
}

/// Caller-owned traversal position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Node reached so far.
    pub node_pos: usize,
    /// Bytes of the current key consumed so far.
    pub key_pos: usize,
}

impl Cursor {
    /// A cursor at the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor at `node_pos`, about to read the first key byte.
    pub fn at(node_pos: usize) -> Self {
        Self {
            node_pos,
            key_pos: 0,
        }
    }
}

impl DoubleArray {
    /// Follow label `code` out of `node`.
    #[inline]
    pub(crate) fn child(&self, node: usize, code: usize) -> Option<usize> {
        let base = self.unit(node)?.base;
        if base <= 0 {
            return None;
        }
        let next = base as usize + code;
        match self.unit(next) {
            Some(unit) if unit.is_child_of(node) => Some(next),
            _ => None,
        }
    }

    /// Value stored for the key ending at `node`, if any.
    #[inline]
    pub(crate) fn value_at(&self, node: usize) -> Option<i32> {
        let terminal = self.child(node, END_LABEL)?;
        let base = self.unit(terminal)?.base;
        if base < 0 {
            Some(decode_value(base))
        } else {
            None
        }
    }

    /// Walk `key` from `node`; `None` once a transition is missing.
    fn walk(&self, key: &[u8], node: usize) -> Option<usize> {
        key.iter()
            .try_fold(node, |node, &byte| self.child(node, label(byte)))
    }

    /// Value of `key`, or `None` if it is not in the dictionary.
    pub fn exact_match_search(&self, key: &[u8]) -> Option<i32> {
        self.exact_match_search_from(key, ROOT)
    }

    /// Like [`exact_match_search`](Self::exact_match_search), starting at
    /// `node_pos` instead of the root.
    pub fn exact_match_search_from(&self, key: &[u8], node_pos: usize) -> Option<i32> {
        self.walk(key, node_pos)
            .and_then(|node| self.value_at(node))
    }

    /// Exact lookup that tells a prefix-only path apart from a miss.
    pub fn lookup(&self, key: &[u8]) -> Lookup {
        // A root without children is a prefix of nothing.
        if self.size() <= ROOT + 1 {
            return Lookup::Absent;
        }
        match self.walk(key, ROOT) {
            None => Lookup::Absent,
            Some(node) => match self.value_at(node) {
                Some(value) => Lookup::Found(value),
                None => Lookup::PrefixOnly,
            },
        }
    }

    /// Lazily enumerate the entries that are prefixes of `key`, shortest
    /// first, walking from `node_pos`.
    ///
    /// A key ending exactly at `node_pos` is not reported; resume a search
    /// from a node returned by [`traverse`](Self::traverse) to continue past
    /// the bytes already consumed.
    pub fn prefix_matches<'a>(&'a self, key: &'a [u8], node_pos: usize) -> PrefixMatches<'a> {
        PrefixMatches {
            array: self,
            key,
            node: Some(node_pos),
            pos: 0,
        }
    }

    /// At most `max_results` prefixes of `key`, shortest first.
    pub fn common_prefix_search(&self, key: &[u8], max_results: usize) -> Vec<PrefixMatch> {
        self.common_prefix_search_from(key, max_results, ROOT)
    }

    /// Like [`common_prefix_search`](Self::common_prefix_search), starting at
    /// `node_pos`.
    pub fn common_prefix_search_from(
        &self,
        key: &[u8],
        max_results: usize,
        node_pos: usize,
    ) -> Vec<PrefixMatch> {
        self.prefix_matches(key, node_pos).take(max_results).collect()
    }

    /// Total number of prefixes of `key`, regardless of any result cap.
    pub fn count_prefix_matches(&self, key: &[u8]) -> usize {
        self.count_prefix_matches_from(key, ROOT)
    }

    /// Like [`count_prefix_matches`](Self::count_prefix_matches), starting
    /// at `node_pos`.
    pub fn count_prefix_matches_from(&self, key: &[u8], node_pos: usize) -> usize {
        self.prefix_matches(key, node_pos).count()
    }

    /// Advance `cursor` along `key[cursor.key_pos..]`.
    ///
    /// On [`Traverse::Failed`] the cursor keeps the last node reached and the
    /// position of the byte that had no transition.
    pub fn traverse(&self, key: &[u8], cursor: &mut Cursor) -> Traverse {
        while let Some(&byte) = key.get(cursor.key_pos) {
            match self.child(cursor.node_pos, label(byte)) {
                Some(next) => {
                    cursor.node_pos = next;
                    cursor.key_pos += 1;
                }
                None => return Traverse::Failed,
            }
        }

        match self.value_at(cursor.node_pos) {
            Some(value) => Traverse::Value(value),
            None => Traverse::NoValue,
        }
    }
}

/// Iterator returned by [`DoubleArray::prefix_matches`].
#[derive(Debug, Clone)]
pub struct PrefixMatches<'a> {
    array: &'a DoubleArray,
    key: &'a [u8],
    node: Option<usize>,
    pos: usize,
}

impl Iterator for PrefixMatches<'_> {
    type Item = PrefixMatch;

    fn next(&mut self) -> Option<PrefixMatch> {
        loop {
            let node = self.node?;
            let byte = match self.key.get(self.pos) {
                Some(&byte) => byte,
                None => {
                    self.node = None;
                    return None;
                }
            };

            self.node = self.array.child(node, label(byte));
            self.pos += 1;

            if let Some(next) = self.node {
                if let Some(value) = self.array.value_at(next) {
                    return Some(PrefixMatch {
                        value,
                        length: self.pos,
                    });
                }
            }
        }
    }
}

impl std::iter::FusedIterator for PrefixMatches<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_world() -> DoubleArray {
        DoubleArray::build(&["he", "hell", "hello", "world"], Some(&[2, 3, 0, 1])).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let array = hello_world();
        assert_eq!(array.exact_match_search(b"hello"), Some(0));
        assert_eq!(array.exact_match_search(b"world"), Some(1));
        assert_eq!(array.exact_match_search(b"he"), Some(2));
        assert_eq!(array.exact_match_search(b"hell"), Some(3));
        assert_eq!(array.exact_match_search(b"hel"), None);
        assert_eq!(array.exact_match_search(b"helloo"), None);
        assert_eq!(array.exact_match_search(b""), None);
    }

    #[test]
    fn test_lookup_outcomes() {
        let array = hello_world();
        assert_eq!(array.lookup(b"hell"), Lookup::Found(3));
        assert_eq!(array.lookup(b"hel"), Lookup::PrefixOnly);
        assert_eq!(array.lookup(b"w"), Lookup::PrefixOnly);
        assert_eq!(array.lookup(b"help"), Lookup::Absent);
        assert_eq!(array.lookup(b"x"), Lookup::Absent);
        assert_eq!(array.lookup(b"hel").value(), None);
    }

    #[test]
    fn test_common_prefix_search() {
        let array = hello_world();
        let values: Vec<_> = array
            .common_prefix_search(b"hello", 2)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec![2, 3]);
        assert_eq!(array.count_prefix_matches(b"hello"), 3);
        assert_eq!(array.count_prefix_matches(b"world"), 1);
    }

    #[test]
    fn test_count_prefix_matches_from_node() {
        let array = hello_world();
        let mut cursor = Cursor::new();
        assert_eq!(array.traverse(b"he", &mut cursor), Traverse::Value(2));
        assert_eq!(array.count_prefix_matches_from(b"llo", cursor.node_pos), 2);
        assert_eq!(array.count_prefix_matches_from(b"llo", ROOT), 0);
    }

    #[test]
    fn test_prefix_matches_stop_on_missing_transition() {
        let array = hello_world();
        let matches: Vec<_> = array.prefix_matches(b"hexagon", ROOT).collect();
        assert_eq!(matches, vec![PrefixMatch { value: 2, length: 2 }]);
    }

    #[test]
    fn test_traverse_resumes() {
        let array = DoubleArray::build(&["he", "hello", "world"], Some(&[2, 0, 1])).unwrap();

        let mut cursor = Cursor::new();
        assert_eq!(array.traverse(b"hel", &mut cursor), Traverse::NoValue);
        assert_eq!(cursor.key_pos, 3);

        cursor.key_pos = 0;
        assert_eq!(array.traverse(b"l", &mut cursor), Traverse::NoValue);
        cursor.key_pos = 0;
        assert_eq!(array.traverse(b"o", &mut cursor), Traverse::Value(0));
    }

    #[test]
    fn test_traverse_failure_keeps_position() {
        let array = hello_world();
        let mut cursor = Cursor::new();
        assert_eq!(array.traverse(b"hex", &mut cursor), Traverse::Failed);
        assert_eq!(cursor.key_pos, 2);
        assert_eq!(array.exact_match_search_from(b"", cursor.node_pos), Some(2));
    }

    #[test]
    fn test_out_of_bounds_start_is_not_found() {
        let array = hello_world();
        let far = array.size() + 10;
        assert_eq!(array.exact_match_search_from(b"hello", far), None);
        assert!(array.common_prefix_search_from(b"hello", 4, far).is_empty());
        let mut cursor = Cursor::at(far);
        assert_eq!(array.traverse(b"", &mut cursor), Traverse::NoValue);
    }
}
