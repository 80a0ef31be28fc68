//! Glyph atlases: rectangular blocks of art characters.
//!
//! An atlas holds R rows of identical length. Each row is the left-to-right
//! concatenation of every glyph of one class, with no separators, so the
//! only way to find a glyph is to know the widths of everything before it.
//!
//! Columns are Unicode scalar values, not bytes: the block-drawing
//! characters used by the art are all multi-byte in UTF-8.

use serde::{Deserialize, Serialize};

/// Errors raised while building an atlas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    /// The atlas has no rows at all.
    #[error("Atlas has no rows")]
    Empty,
    /// A row's column count differs from the first row's.
    #[error("Atlas row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count of row 0.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
}

/// A validated, rectangular glyph atlas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Atlas {
    rows: Vec<Vec<char>>,
}

impl Atlas {
    /// Build an atlas from its rows, kept verbatim.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, AtlasError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();

        let expected = rows.first().ok_or(AtlasError::Empty)?.len();
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(AtlasError::RaggedRow { row, expected, found });
        }

        Ok(Self { rows })
    }

    /// Parse a literal art block.
    ///
    /// The block is expected to open and close on its own line, as in
    ///
    /// ```text
    /// "
    /// ▄▀█ █▄▄
    /// █▀█ █▄█
    /// "
    /// ```
    ///
    /// so an empty first and last line are delimiters and are dropped. Every
    /// line in between is a row; spaces inside and at the end of a row are
    /// part of the art.
    pub fn parse(block: &str) -> Result<Self, AtlasError> {
        let mut lines: Vec<&str> = block.split('\n').collect();
        if lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self::from_rows(lines.into_iter().map(|l| l.strip_suffix('\r').unwrap_or(l)))
    }

    /// Number of rows (R).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in every row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Columns `[start, end)` of one row, or `None` when the range is not
    /// inside the row.
    pub fn columns(&self, row: usize, start: usize, end: usize) -> Option<String> {
        if start > end {
            return None;
        }
        self.rows
            .get(row)?
            .get(start..end)
            .map(|cols| cols.iter().collect())
    }

    /// Columns `[start, end)` of one row, clipped to the row.
    ///
    /// A range past the end yields the part that exists, possibly nothing.
    pub fn columns_clipped(&self, row: usize, start: usize, end: usize) -> String {
        let Some(cols) = self.rows.get(row) else {
            return String::new();
        };
        let end = end.min(cols.len());
        let start = start.min(end);
        cols[start..end].iter().collect()
    }

    /// The rows as owned strings.
    pub fn rows(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }
}

impl TryFrom<Vec<String>> for Atlas {
    type Error = AtlasError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Atlas> for Vec<String> {
    fn from(atlas: Atlas) -> Self {
        atlas.rows()
    }
}
