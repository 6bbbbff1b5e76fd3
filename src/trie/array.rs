//! The built, immutable double array and its persisted form.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::builder::DoubleArrayBuilder;
use super::format::*;
use super::keyset::KeySet;
use crate::{BuildError, Error, Result};

/// An immutable double-array trie.
///
/// The array is a flat run of `u32` cells, two per unit: `base` then
/// `check`. It carries no header; its length is the only metadata and the
/// caller keeps track of it when persisting the cells elsewhere.
///
/// All queries take `&self` and read nothing but the cells, so a
/// `DoubleArray` can be shared freely between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoubleArray {
    cells: Vec<u32>,
}

impl DoubleArray {
    /// Build from keys in ascending byte order.
    ///
    /// `values` defaults to each key's position in `keys`.
    pub fn build<K: AsRef<[u8]>>(
        keys: &[K],
        values: Option<&[i32]>,
    ) -> std::result::Result<Self, BuildError> {
        let keyset = KeySet::new(keys, values)?;
        DoubleArrayBuilder::new().build(&keyset)
    }

    /// Restore from raw cells without validating them.
    ///
    /// A trailing odd cell is dropped. Use [`validate`](Self::validate) when
    /// the cells come from an untrusted source.
    pub fn from_cells(mut cells: Vec<u32>) -> Self {
        cells.truncate(cells.len() - cells.len() % CELLS_PER_UNIT);
        Self { cells }
    }

    /// Raw cells, suitable for persisting verbatim.
    pub fn as_cells(&self) -> &[u32] {
        &self.cells
    }

    /// Consume the array, returning its cells.
    pub fn into_cells(self) -> Vec<u32> {
        self.cells
    }

    /// Number of units.
    pub fn size(&self) -> usize {
        self.cells.len() / CELLS_PER_UNIT
    }

    /// Size of one unit in bytes.
    pub fn unit_size(&self) -> usize {
        UNIT_SIZE
    }

    /// Size of all units in bytes.
    pub fn total_size(&self) -> usize {
        self.size() * UNIT_SIZE
    }

    /// Whether the array holds no units at all.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Unit at `index`, or `None` past the end.
    #[inline]
    pub fn unit(&self, index: usize) -> Option<Unit> {
        let start = index.checked_mul(CELLS_PER_UNIT)?;
        match self.cells.get(start..start.checked_add(CELLS_PER_UNIT)?) {
            Some(&[base, check]) => Some(Unit::from_cells(base, check)),
            _ => None,
        }
    }

    /// Check that every claimed unit is reachable from the parent it names.
    pub fn validate(&self) -> Result<()> {
        let size = self.size();
        let root = match self.unit(ROOT) {
            Some(root) => root,
            None => return Ok(()),
        };
        if root.base < 1 || root.check != ROOT as i32 {
            return Err(Error::Corrupted {
                index: ROOT,
                reason: "root is not an interior unit",
            });
        }

        for index in ROOT + 1..size {
            let unit = match self.unit(index) {
                Some(unit) if !unit.is_free() => unit,
                _ => continue,
            };

            let parent = unit.check as usize;
            let parent_unit = match self.unit(parent) {
                Some(parent_unit) if !parent_unit.is_free() => parent_unit,
                _ => {
                    return Err(Error::Corrupted {
                        index,
                        reason: "parent is out of bounds or unclaimed",
                    })
                }
            };

            let code = match index.checked_sub(parent_unit.base.max(0) as usize) {
                Some(code) if parent_unit.base > 0 && code < LABEL_COUNT => code,
                _ => {
                    return Err(Error::Corrupted {
                        index,
                        reason: "parent offset does not reach unit",
                    })
                }
            };

            if code == END_LABEL && unit.base >= 0 {
                return Err(Error::Corrupted {
                    index,
                    reason: "end-of-key unit carries no value",
                });
            }
            if code != END_LABEL && unit.base <= 0 {
                return Err(Error::Corrupted {
                    index,
                    reason: "interior unit has no children",
                });
            }
        }

        Ok(())
    }

    /// Cells as little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().flat_map(|cell| cell.to_le_bytes()).collect()
    }

    /// Restore from little-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % UNIT_SIZE != 0 {
            return Err(Error::InvalidLength {
                len: bytes.len(),
                unit_size: UNIT_SIZE,
            });
        }

        let cells = bytes
            .chunks_exact(std::mem::size_of::<u32>())
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(Self { cells })
    }

    /// Write the cells to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Save to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        self.write_to(&mut file)?;
        file.flush()?;
        log::info!("Saved double array to {:?} ({} units)", path, self.size());
        Ok(())
    }

    /// Save at byte `offset` of `path`, keeping the rest of the file.
    pub fn save_at(&self, path: &Path, offset: u64) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        self.write_to(&mut file)?;
        file.flush()?;
        log::info!(
            "Saved double array to {:?} at offset {} ({} units)",
            path,
            offset,
            self.size()
        );
        Ok(())
    }

    /// Open a file holding nothing but the cells.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_at(path, 0, None)
    }

    /// Open `size` bytes (default: the rest of the file) at `offset`.
    ///
    /// Only the requested window is read and decoded.
    pub fn open_at(path: &Path, offset: usize, size: Option<usize>) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_len = file.metadata()?.len() as usize;
        let size = size.unwrap_or_else(|| file_len.saturating_sub(offset));

        match offset.checked_add(size) {
            Some(end) if end <= file_len => {}
            _ => {
                return Err(Error::OutOfRange {
                    offset,
                    size,
                    file_len,
                })
            }
        }
        if size == 0 {
            return Ok(Self::default());
        }

        let mut bytes = vec![0u8; size];
        file.seek(SeekFrom::Start(offset as u64))?;
        file.read_exact(&mut bytes)?;
        let array = Self::from_bytes(&bytes)?;
        log::info!("Loaded double array from {:?} ({} units)", path, array.size());
        Ok(array)
    }
}
