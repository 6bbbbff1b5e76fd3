//! Double-array construction.

use super::array::DoubleArray;
use super::format::*;
use super::keyset::KeySet;
use crate::BuildError;

/// Units allocated by the first growth step.
const MIN_CAPACITY: usize = 1024;

/// Occupancy of the scanned region above which the scan hint moves forward.
const DENSE_RATIO: f64 = 0.95;

/// A group of keys sharing a prefix and the label that follows it.
#[derive(Debug, Clone, Copy)]
struct Sibling {
    code: usize,
    begin: usize,
    end: usize,
}

/// A node whose children still need slots.
#[derive(Debug, Clone, Copy)]
struct Pending {
    node: usize,
    begin: usize,
    end: usize,
    depth: usize,
}

/// Builds a [`DoubleArray`] from a [`KeySet`].
///
/// The builder owns the units exclusively while slots are assigned and is
/// consumed by [`DoubleArrayBuilder::build`], so a partially built array is
/// never observable.
#[derive(Debug)]
pub struct DoubleArrayBuilder {
    units: Vec<Unit>,
    /// One past the highest claimed index.
    size: usize,
    /// Where the offset scan starts.
    next_check_pos: usize,
}

impl DoubleArrayBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            size: 0,
            next_check_pos: 0,
        }
    }

    /// Assign slots for every key and return the finished array.
    pub fn build(mut self, keyset: &KeySet<'_>) -> Result<DoubleArray, BuildError> {
        self.ensure(ROOT + 1)?;
        self.units[ROOT] = Unit {
            base: 1,
            check: ROOT as i32,
        };
        self.size = ROOT + 1;

        if !keyset.is_empty() {
            self.place_all(keyset)?;
        }

        log::debug!(
            "Built double array: {} keys, {} units, {} allocated",
            keyset.len(),
            self.size,
            self.units.len()
        );

        Ok(self.finish())
    }

    fn place_all(&mut self, keyset: &KeySet<'_>) -> Result<(), BuildError> {
        let mut stack = vec![Pending {
            node: ROOT,
            begin: 0,
            end: keyset.len(),
            depth: 0,
        }];
        let mut siblings = Vec::new();

        while let Some(pending) = stack.pop() {
            fetch_siblings(keyset, &pending, &mut siblings);
            let offset = self.find_offset(&siblings)?;

            self.units[pending.node].base = offset as i32;
            for sibling in &siblings {
                self.units[offset + sibling.code].check = pending.node as i32;
            }
            if let Some(last) = siblings.last() {
                self.size = self.size.max(offset + last.code + 1);
            }

            // Reverse push keeps children in ascending label order.
            for sibling in siblings.iter().rev() {
                let index = offset + sibling.code;
                if sibling.code == END_LABEL {
                    self.units[index].base = encode_value(keyset.value(sibling.begin));
                } else {
                    stack.push(Pending {
                        node: index,
                        begin: sibling.begin,
                        end: sibling.end,
                        depth: pending.depth + 1,
                    });
                }
            }
        }

        Ok(())
    }

    /// Smallest offset `>= 1` at which every sibling slot is free.
    fn find_offset(&mut self, siblings: &[Sibling]) -> Result<usize, BuildError> {
        let (first, last) = match (siblings.first(), siblings.last()) {
            (Some(first), Some(last)) => (first.code, last.code),
            _ => return Err(BuildError::CapacityExceeded),
        };

        let mut pos = self.next_check_pos.max(first + 1);
        let mut occupied = 0usize;
        let mut first_free = true;

        loop {
            self.ensure(pos + 1)?;
            if !self.units[pos].is_free() {
                occupied += 1;
                pos += 1;
                continue;
            }

            if first_free {
                self.next_check_pos = pos;
                first_free = false;
            }

            let begin = pos - first;
            self.ensure(begin + last + 1)?;
            let fits = siblings[1..]
                .iter()
                .all(|sibling| self.units[begin + sibling.code].is_free());

            if fits {
                let scanned = pos - self.next_check_pos + 1;
                if occupied as f64 / scanned as f64 >= DENSE_RATIO {
                    self.next_check_pos = pos;
                }
                return Ok(begin);
            }

            pos += 1;
        }
    }

    /// Grow storage so that `len` units exist, doubling as needed.
    fn ensure(&mut self, len: usize) -> Result<(), BuildError> {
        if len <= self.units.len() {
            return Ok(());
        }
        if len > MAX_INDEX + 1 {
            return Err(BuildError::CapacityExceeded);
        }

        let new_len = len
            .max(self.units.len() * 2)
            .max(MIN_CAPACITY)
            .min(MAX_INDEX + 1);
        log::debug!("Growing double array from {} to {} units", self.units.len(), new_len);
        self.units.resize(new_len, Unit::FREE);
        Ok(())
    }

    fn finish(mut self) -> DoubleArray {
        self.units.truncate(self.size);
        let cells = self
            .units
            .iter()
            .flat_map(|unit| unit.to_cells())
            .collect();
        DoubleArray::from_cells(cells)
    }
}

impl Default for DoubleArrayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `pending`'s key range into runs sharing the label at its depth.
fn fetch_siblings(keyset: &KeySet<'_>, pending: &Pending, siblings: &mut Vec<Sibling>) {
    siblings.clear();

    let mut index = pending.begin;
    while index < pending.end {
        let code = keyset.label_at(index, pending.depth);
        let begin = index;
        index += 1;
        while index < pending.end && keyset.label_at(index, pending.depth) == code {
            index += 1;
        }
        siblings.push(Sibling {
            code,
            begin,
            end: index,
        });
    }
}
