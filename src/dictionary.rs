//! Dictionary sources: key/value entries read from TSV or JSON.
//!
//! # TSV
//!
//! ```text
//! # comment
//! hello	0
//! world	1
//! he
//! ```
//!
//! One entry per line, key and value separated by a tab. Lines without a
//! value take their entry's position as the value. Keys are raw bytes.
//!
//! # JSON
//!
//! ```text
//! [{"key": "hello", "value": 0}, {"key": "world"}]
//! ```

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::trie::{DoubleArray, KeySet};
use crate::{Error, Result};

/// Input format of a dictionary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictionaryFormat {
    /// Tab-separated `key<TAB>value` lines
    #[default]
    Tsv,
    /// JSON array of `{"key", "value"}` objects
    Json,
}

impl DictionaryFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DictionaryFormat::Json,
            _ => DictionaryFormat::Tsv,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DictionaryFormat::Tsv => "tsv",
            DictionaryFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for DictionaryFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" | "txt" => Ok(DictionaryFormat::Tsv),
            "json" => Ok(DictionaryFormat::Json),
            other => Err(format!("unknown dictionary format: {}", other)),
        }
    }
}

/// A single dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Key bytes
    pub key: Vec<u8>,
    /// Explicit value, if the source gave one
    pub value: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct JsonEntry {
    key: String,
    #[serde(default)]
    value: Option<i32>,
}

/// Entries in source order.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<Entry>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<Vec<u8>>, value: Option<i32>) {
        self.entries.push(Entry {
            key: key.into(),
            value,
        });
    }

    /// Read a dictionary file.
    pub fn read(path: &Path, format: DictionaryFormat) -> Result<Self> {
        let file = File::open(path)?;
        let dictionary = match format {
            DictionaryFormat::Tsv => Self::parse_tsv(file)?,
            DictionaryFormat::Json => Self::parse_json(file)?,
        };
        log::info!(
            "Read {} entries from {:?} ({})",
            dictionary.len(),
            path,
            format.as_str()
        );
        Ok(dictionary)
    }

    /// Parse tab-separated entries.
    pub fn parse_tsv<R: Read>(reader: R) -> Result<Self> {
        let mut dictionary = Self::new();

        for (number, line) in BufReader::new(reader).split(b'\n').enumerate() {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() || line[0] == b'#' {
                continue;
            }

            match line.iter().rposition(|&b| b == b'\t') {
                Some(tab) => {
                    let value = parse_value(&line[tab + 1..]).ok_or_else(|| Error::Dictionary {
                        line: number + 1,
                        message: format!(
                            "invalid value {:?}",
                            String::from_utf8_lossy(&line[tab + 1..])
                        ),
                    })?;
                    line.truncate(tab);
                    dictionary.push(line, Some(value));
                }
                None => dictionary.push(line, None),
            }
        }

        Ok(dictionary)
    }

    /// Parse a JSON array of entries.
    pub fn parse_json<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<JsonEntry> = serde_json::from_reader(BufReader::new(reader))?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|entry| Entry {
                    key: entry.key.into_bytes(),
                    value: entry.value,
                })
                .collect(),
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Keys in source order.
    pub fn keys(&self) -> Vec<&[u8]> {
        self.entries.iter().map(|entry| entry.key.as_slice()).collect()
    }

    /// Values in source order; missing values become the entry position.
    pub fn values(&self) -> Vec<i32> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.value.unwrap_or(index as i32))
            .collect()
    }

    /// Build a double array, sorting the entries first if `sort` is set.
    pub fn build(&self, sort: bool) -> Result<DoubleArray> {
        let keys = self.keys();
        let values = self.values();
        let keyset = if sort {
            KeySet::from_unsorted(&keys, Some(values.as_slice()))?
        } else {
            KeySet::new(&keys, Some(values.as_slice()))?
        };
        Ok(crate::trie::DoubleArrayBuilder::new().build(&keyset)?)
    }
}

fn parse_value(bytes: &[u8]) -> Option<i32> {
    std::str::from_utf8(bytes).ok()?.trim().parse().ok()
}
