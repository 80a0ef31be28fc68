//! # small-text-atlas
//!
//! Deterministic slicing of hand-drawn glyph atlases into glyph tables.
//!
//! The kernel answers one question:
//!
//! > Given an atlas of glyphs drawn end to end, which columns belong to which character?
//!
//! ## Core Contract
//!
//! 1. Resolve a column width for every character of a class (default + overrides)
//! 2. Walk a cursor across the class's atlas, keeping `width - 1` columns per glyph
//! 3. Merge the per-class results into one ordered [`GlyphTable`]
//!
//! ## Architecture
//!
//! ```text
//! WidthSpec → WidthPlan ─┐
//!                        ├→ AtlasSlicer → SliceOutcome ─┐
//! Atlas ─────────────────┘                              ├→ TableAssembler → GlyphTable
//!                            (one pass per CharClass) ──┘
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same atlases + same width specs → identical table and fingerprint
//! - Table order is letters A–Z, digits 0–9 (when enabled), then `!`, space, `?`
//! - Every class pass starts at column 0; no cursor state survives a pass
//!
//! ## Example
//!
//! ```
//! use small_text_atlas::{small_text, GenerationConfig};
//!
//! let table = small_text::glyph_table(&GenerationConfig::default()).unwrap();
//! assert_eq!(table.get('A').unwrap().rows(), &["▄▀█", "█▀█"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod slicer;
pub mod assembler;
pub mod canonical;
pub mod config;
pub mod small_text;

// Re-exports
pub use types::{CharClass, Atlas, AtlasError, Glyph, GlyphEntry, GlyphTable, TableError};
pub use policy::{WidthSpec, WidthPlan, WidthError, LETTER_DEFAULT_WIDTH, DIGIT_DEFAULT_WIDTH};
pub use slicer::{AtlasSlicer, OverrunPolicy, SliceOutcome, SlicerError};
pub use assembler::{
    TableAssembler, AtlasJob, AssemblyError, AssemblyReport, PassSummary, ErrorKind,
};
pub use config::{GenerationConfig, SMALL_TEXT_ROWS};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

