//! Validated key/value input for construction.

use std::cmp::Ordering;

use super::format::{label, END_LABEL, MAX_INDEX};
use crate::BuildError;

/// Keys in strictly ascending byte order with their values.
///
/// Keys are borrowed, so a key set is cheap to assemble from caller-owned
/// storage. Values default to the key's position in the input list.
#[derive(Debug, Clone, Default)]
pub struct KeySet<'a> {
    keys: Vec<&'a [u8]>,
    values: Vec<i32>,
}

impl<'a> KeySet<'a> {
    /// Validate keys that are already sorted.
    ///
    /// Fails with [`BuildError::OrderViolation`] if a key sorts before its
    /// predecessor. A key equal to its predecessor is merged when both carry
    /// the same value and rejected with [`BuildError::DuplicateKey`]
    /// otherwise.
    pub fn new<K: AsRef<[u8]>>(keys: &'a [K], values: Option<&[i32]>) -> Result<Self, BuildError> {
        let values = resolve_values(keys.len(), values)?;
        let entries = keys
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (key, value))| (key.as_ref(), value, index));
        Self::from_entries(entries)
    }

    /// Sort keys (with their values) before validating them.
    ///
    /// The sort is stable, so repeated keys keep their input order and the
    /// duplicate policy of [`KeySet::new`] applies unchanged. Error indices
    /// refer to input positions.
    pub fn from_unsorted<K: AsRef<[u8]>>(
        keys: &'a [K],
        values: Option<&[i32]>,
    ) -> Result<Self, BuildError> {
        let values = resolve_values(keys.len(), values)?;
        let mut entries: Vec<(&'a [u8], i32, usize)> = keys
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (key, value))| (key.as_ref(), value, index))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Self::from_entries(entries)
    }

    fn from_entries<I>(entries: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (&'a [u8], i32, usize)>,
    {
        let entries = entries.into_iter();
        let mut set = KeySet {
            keys: Vec::with_capacity(entries.size_hint().0),
            values: Vec::with_capacity(entries.size_hint().0),
        };

        for (key, value, index) in entries {
            if value < 0 {
                return Err(BuildError::NegativeValue { index, value });
            }

            if let (Some(prev_key), Some(prev_value)) = (set.keys.last(), set.values.last()) {
                match key.cmp(*prev_key) {
                    Ordering::Less => return Err(BuildError::OrderViolation { index }),
                    Ordering::Equal if value == *prev_value => continue,
                    Ordering::Equal => return Err(BuildError::DuplicateKey { index }),
                    Ordering::Greater => {}
                }
            }

            set.keys.push(key);
            set.values.push(value);
        }

        Ok(set)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at `index`.
    pub fn key(&self, index: usize) -> &'a [u8] {
        self.keys[index]
    }

    /// Value at `index`.
    pub fn value(&self, index: usize) -> i32 {
        self.values[index]
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a [u8], i32)> + '_ {
        self.keys.iter().copied().zip(self.values.iter().copied())
    }

    /// Label of key `index` at `depth`; end-of-key once the key is exhausted.
    #[inline]
    pub(crate) fn label_at(&self, index: usize, depth: usize) -> usize {
        match self.keys[index].get(depth) {
            Some(&byte) => label(byte),
            None => END_LABEL,
        }
    }
}

fn resolve_values(key_count: usize, values: Option<&[i32]>) -> Result<Vec<i32>, BuildError> {
    match values {
        Some(values) if values.len() != key_count => Err(BuildError::LengthMismatch {
            keys: key_count,
            values: values.len(),
        }),
        Some(values) => Ok(values.to_vec()),
        None => {
            if key_count > MAX_INDEX {
                return Err(BuildError::CapacityExceeded);
            }
            Ok((0..key_count as i32).collect())
        }
    }
}
