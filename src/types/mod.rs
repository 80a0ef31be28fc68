//! Core types for the glyph atlas kernel.

pub mod class;
pub mod atlas;
pub mod glyph;

pub use class::CharClass;
pub use atlas::{Atlas, AtlasError};
pub use glyph::{Glyph, GlyphEntry, GlyphTable, TableError};
