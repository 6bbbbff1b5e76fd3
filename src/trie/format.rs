//! Double-array unit layout and cell constants.

/// Number of `u32` cells per unit (`base`, `check`).
pub const CELLS_PER_UNIT: usize = 2;

/// Unit size in bytes.
pub const UNIT_SIZE: usize = CELLS_PER_UNIT * std::mem::size_of::<u32>();

/// Index of the root unit.
pub const ROOT: usize = 0;

/// `check` value of an unclaimed slot.
pub const FREE_CHECK: i32 = -1;

/// Label code of the end-of-key transition.
pub const END_LABEL: usize = 0;

/// Number of distinct label codes: end-of-key plus one per byte value.
pub const LABEL_COUNT: usize = 257;

/// Largest unit index a cell can address.
pub const MAX_INDEX: usize = i32::MAX as usize;

/// Label code of a key byte.
#[inline]
pub fn label(byte: u8) -> usize {
    byte as usize + 1
}

/// Encode a non-negative value into a terminal `base`.
#[inline]
pub fn encode_value(value: i32) -> i32 {
    debug_assert!(value >= 0);
    -value - 1
}

/// Decode the value stored in a terminal `base`.
#[inline]
pub fn decode_value(base: i32) -> i32 {
    debug_assert!(base < 0);
    -(base + 1)
}

/// Classification of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Slot not owned by any parent.
    Free,
    /// Interior node; children live at `offset + label`.
    Internal { offset: u32 },
    /// End-of-key node carrying a value.
    Terminal { value: i32 },
}

/// A single `(base, check)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Child offset, or `-(value + 1)` for terminals.
    pub base: i32,
    /// Index of the owning parent, or [`FREE_CHECK`].
    pub check: i32,
}

impl Unit {
    /// An unclaimed slot.
    pub const FREE: Unit = Unit {
        base: 0,
        check: FREE_CHECK,
    };

    /// Rebuild a unit from its two serialized cells.
    #[inline]
    pub fn from_cells(base: u32, check: u32) -> Self {
        Self {
            base: base as i32,
            check: check as i32,
        }
    }

    /// Serialized cells of this unit.
    #[inline]
    pub fn to_cells(self) -> [u32; CELLS_PER_UNIT] {
        [self.base as u32, self.check as u32]
    }

    /// Whether no parent owns this slot.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.check < 0
    }

    /// Whether this unit is owned by `parent`.
    #[inline]
    pub fn is_child_of(&self, parent: usize) -> bool {
        self.check >= 0 && self.check as usize == parent
    }

    /// Tagged view of the unit.
    pub fn kind(&self) -> NodeKind {
        if self.is_free() {
            NodeKind::Free
        } else if self.base < 0 {
            NodeKind::Terminal {
                value: decode_value(self.base),
            }
        } else {
            NodeKind::Internal {
                offset: self.base as u32,
            }
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::FREE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_size() {
        assert_eq!(UNIT_SIZE, 8);
    }

    #[test]
    fn test_value_encoding() {
        assert_eq!(encode_value(0), -1);
        assert_eq!(encode_value(41), -42);
        assert_eq!(decode_value(encode_value(0)), 0);
        assert_eq!(decode_value(encode_value(i32::MAX)), i32::MAX);
        assert_eq!(encode_value(i32::MAX), i32::MIN);
    }

    #[test]
    fn test_labels_reserve_zero_for_end_of_key() {
        assert_eq!(label(0), 1);
        assert_eq!(label(b'a'), 98);
        assert_eq!(label(255), LABEL_COUNT - 1);
    }

    #[test]
    fn test_unit_cells() {
        let unit = Unit {
            base: encode_value(7),
            check: 3,
        };
        let cells = unit.to_cells();
        assert_eq!(cells[0], 0xFFFF_FFF8);
        assert_eq!(Unit::from_cells(cells[0], cells[1]), unit);

        let [base, check] = Unit::FREE.to_cells();
        assert_eq!((base, check), (0, u32::MAX));
    }

    #[test]
    fn test_unit_kind() {
        assert_eq!(Unit::FREE.kind(), NodeKind::Free);
        assert_eq!(
            Unit { base: 12, check: 0 }.kind(),
            NodeKind::Internal { offset: 12 }
        );
        assert_eq!(
            Unit {
                base: encode_value(5),
                check: 9
            }
            .kind(),
            NodeKind::Terminal { value: 5 }
        );
    }

    #[test]
    fn test_is_child_of() {
        let unit = Unit { base: 1, check: 4 };
        assert!(unit.is_child_of(4));
        assert!(!unit.is_child_of(0));
        assert!(!Unit::FREE.is_child_of(0));
    }
}
