//! Glyphs and the glyph table handed to renderers.

use serde::Serialize;
use std::collections::BTreeMap;

use super::class::CharClass;
use crate::canonical::canonical_hash_hex;

/// Errors raised while filling a glyph table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A character was inserted twice.
    #[error("Character {ch:?} from {incoming} collides with the same character from {existing}")]
    Collision {
        /// The duplicated character.
        ch: char,
        /// Class that inserted the character first.
        existing: CharClass,
        /// Class that tried to insert it again.
        incoming: CharClass,
    },
    /// A glyph does not have the table's row count.
    #[error("Glyph for {ch:?} ({class}) has {found} rows, table expects {expected}")]
    RowCount {
        /// The offending character.
        ch: char,
        /// Its class.
        class: CharClass,
        /// Row count of the table.
        expected: usize,
        /// Row count of the glyph.
        found: usize,
    },
}

/// One character's rendering: one string per atlas row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Glyph {
    rows: Vec<String>,
}

impl Glyph {
    /// Create a glyph from its rows.
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    /// A glyph of `row_count` empty rows (zero-width characters).
    pub fn empty(row_count: usize) -> Self {
        Self { rows: vec![String::new(); row_count] }
    }

    /// The rows, top to bottom.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    /// True when every row is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(String::is_empty)
    }
}

/// A table entry: character, its class, and its glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphEntry {
    /// The character.
    pub ch: char,
    /// Class the glyph was sliced from.
    pub class: CharClass,
    /// The glyph rows.
    #[serde(rename = "rows")]
    pub glyph: Glyph,
}

/// Ordered character → glyph mapping.
///
/// Entries keep insertion order, which the assembler makes letters, then
/// digits, then punctuation. Keys are unique: inserting an existing
/// character is an error, never an overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphTable {
    row_count: usize,
    entries: Vec<GlyphEntry>,
    #[serde(skip)]
    index: BTreeMap<char, usize>,
}

impl GlyphTable {
    /// Create an empty table whose glyphs have `row_count` rows.
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Append a glyph.
    pub fn insert(&mut self, class: CharClass, ch: char, glyph: Glyph) -> Result<(), TableError> {
        if glyph.row_count() != self.row_count {
            return Err(TableError::RowCount {
                ch,
                class,
                expected: self.row_count,
                found: glyph.row_count(),
            });
        }
        if let Some(&at) = self.index.get(&ch) {
            return Err(TableError::Collision {
                ch,
                existing: self.entries[at].class,
                incoming: class,
            });
        }

        self.index.insert(ch, self.entries.len());
        self.entries.push(GlyphEntry { ch, class, glyph });
        Ok(())
    }

    /// Append every entry of `other`, keeping its order.
    ///
    /// Fails on the first colliding key; entries before it stay merged.
    pub fn merge(&mut self, other: GlyphTable) -> Result<(), TableError> {
        for entry in other.entries {
            self.insert(entry.class, entry.ch, entry.glyph)?;
        }
        Ok(())
    }

    /// Glyph for a character.
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.index.get(&ch).map(|&at| &self.entries[at].glyph)
    }

    /// Whether the table has a glyph for `ch`.
    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// Class a character's glyph came from.
    pub fn class_of(&self, ch: char) -> Option<CharClass> {
        self.index.get(&ch).map(|&at| self.entries[at].class)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &GlyphEntry> {
        self.entries.iter()
    }

    /// Characters in table order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|e| e.ch)
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows per glyph (R).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Deterministic fingerprint of the table contents and order.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}

impl<'a> IntoIterator for &'a GlyphTable {
    type Item = &'a GlyphEntry;
    type IntoIter = std::slice::Iter<'a, GlyphEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
