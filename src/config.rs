//! Generation run configuration.
//!
//! The variant with numerals and the variant without them are the same
//! assembler with the digit job present or absent; `include_digits` picks
//! between them.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::slicer::OverrunPolicy;
use crate::types::CharClass;

/// Rows per glyph in the small-text font.
pub const SMALL_TEXT_ROWS: usize = 2;

/// Configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Rows per glyph (R). Every atlas must have exactly this many rows.
    pub row_count: usize,
    /// Whether the digit atlas is sliced.
    pub include_digits: bool,
    /// What to do with a glyph that runs past the end of its atlas.
    pub overrun: OverrunPolicy,
}

impl GenerationConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Configuration without the digit atlas.
    pub fn letters_only() -> Self {
        Self {
            include_digits: false,
            ..Self::default()
        }
    }

    /// Classes sliced by this run, in table order.
    pub fn enabled_classes(&self) -> Vec<CharClass> {
        CharClass::ALL
            .into_iter()
            .filter(|class| *class != CharClass::Digits || self.include_digits)
            .collect()
    }

    /// Fingerprint of the configuration.
    pub fn params_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            row_count: SMALL_TEXT_ROWS,
            include_digits: true,
            overrun: OverrunPolicy::Truncate,
        }
    }
}
