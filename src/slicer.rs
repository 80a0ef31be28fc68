//! Deterministic atlas slicer.
//!
//! The slicer walks a column cursor across an atlas, carving one glyph per
//! character of a resolved width plan.

use serde::{Deserialize, Serialize};

use crate::policy::WidthPlan;
use crate::types::{Atlas, CharClass, Glyph};

/// Error type for slicer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlicerError {
    /// The kept columns of a glyph run past the end of the atlas rows
    /// (only under [`OverrunPolicy::Reject`]).
    #[error(
        "Glyph {ch:?} ({class}) of width {width} at column {cursor} \
         overruns atlas rows of {row_width} columns"
    )]
    Overrun {
        /// The character being sliced.
        ch: char,
        /// Its class.
        class: CharClass,
        /// Cursor at which the glyph starts.
        cursor: usize,
        /// Resolved width of the glyph.
        width: usize,
        /// Column count of the atlas rows.
        row_width: usize,
    },
    /// Advancing the cursor past the glyph does not fit in a `usize`.
    #[error("Glyph {ch:?} ({class}) of width {width} at column {cursor} overflows the cursor")]
    CursorOverflow {
        /// The character being sliced.
        ch: char,
        /// Its class.
        class: CharClass,
        /// Cursor at which the glyph starts.
        cursor: usize,
        /// Resolved width of the glyph.
        width: usize,
    },
}

/// What to do when a glyph's columns run past the end of the atlas rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrunPolicy {
    /// Keep whatever columns exist, possibly none, and count the glyph as
    /// truncated.
    #[default]
    Truncate,
    /// Fail with [`SlicerError::Overrun`].
    Reject,
}

/// Result of slicing one atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceOutcome {
    /// Class of the sliced atlas.
    pub class: CharClass,
    /// Glyphs in plan order.
    pub glyphs: Vec<(char, Glyph)>,
    /// Starting cursor of each glyph, in plan order.
    pub starts: Vec<(char, usize)>,
    /// Cursor after the last glyph: the sum of all widths.
    pub cursor: usize,
    /// Column count of the atlas rows.
    pub atlas_width: usize,
    /// Glyphs whose kept columns ran past the end of the rows.
    pub truncated: usize,
}

impl SliceOutcome {
    /// Atlas columns past the final cursor that no glyph accounted for.
    pub fn trailing_columns(&self) -> usize {
        self.atlas_width.saturating_sub(self.cursor)
    }

    /// Column at which `ch` was cut.
    pub fn start_of(&self, ch: char) -> Option<usize> {
        self.starts.iter().find(|(c, _)| *c == ch).map(|&(_, start)| start)
    }

    /// Consume the outcome, yielding its glyphs.
    pub fn into_glyphs(self) -> Vec<(char, Glyph)> {
        self.glyphs
    }
}

/// Running state of one slicing pass.
struct Pass {
    cursor: usize,
    glyphs: Vec<(char, Glyph)>,
    starts: Vec<(char, usize)>,
    truncated: usize,
}

/// Deterministic atlas slicer.
///
/// ## Algorithm
///
/// Starting at cursor 0, for each `(ch, width)` of the plan:
///
/// 1. Keep columns `[cursor, cursor + width - 1)` of every row
/// 2. Advance the cursor by the full `width`, including the dropped
///    spacing column
///
/// The cursor is the fold accumulator, so every pass starts fresh and two
/// atlases never share a position.
///
/// ## Zero width
///
/// A width of 0 yields a glyph of empty rows and leaves the cursor where it
/// is. The range `[cursor, cursor - 1)` is never formed.
///
/// ## Overrun
///
/// Columns past the end of the rows do not exist. Under
/// [`OverrunPolicy::Truncate`] the glyph keeps the columns that do, and the
/// cursor still advances by the full width.
pub struct AtlasSlicer<'a> {
    atlas: &'a Atlas,
    overrun: OverrunPolicy,
}

impl<'a> AtlasSlicer<'a> {
    /// Create a slicer over an atlas that truncates overrunning glyphs.
    pub fn new(atlas: &'a Atlas) -> Self {
        Self { atlas, overrun: OverrunPolicy::default() }
    }

    /// Set the overrun policy.
    pub fn with_overrun(mut self, overrun: OverrunPolicy) -> Self {
        self.overrun = overrun;
        self
    }

    /// Slice the atlas according to `plan`.
    pub fn slice(&self, plan: &WidthPlan) -> Result<SliceOutcome, SlicerError> {
        let class = plan.class();
        let initial = Pass {
            cursor: 0,
            glyphs: Vec::with_capacity(plan.len()),
            starts: Vec::with_capacity(plan.len()),
            truncated: 0,
        };

        let pass = plan.entries().iter().try_fold(initial, |mut pass, &(ch, width)| {
            let next = pass
                .cursor
                .checked_add(width)
                .ok_or(SlicerError::CursorOverflow { ch, class, cursor: pass.cursor, width })?;

            let (glyph, truncated) = self.glyph_at(class, ch, pass.cursor, width)?;
            if truncated {
                tracing::warn!(
                    class = %class,
                    ch = ?ch,
                    cursor = pass.cursor,
                    width,
                    atlas_width = self.atlas.width(),
                    "Glyph runs past the end of the atlas rows"
                );
                pass.truncated += 1;
            }

            pass.starts.push((ch, pass.cursor));
            pass.glyphs.push((ch, glyph));
            pass.cursor = next;
            Ok::<_, SlicerError>(pass)
        })?;

        tracing::debug!(
            class = %class,
            glyphs = pass.glyphs.len(),
            cursor = pass.cursor,
            truncated = pass.truncated,
            atlas_width = self.atlas.width(),
            "Sliced atlas"
        );

        Ok(SliceOutcome {
            class,
            glyphs: pass.glyphs,
            starts: pass.starts,
            cursor: pass.cursor,
            atlas_width: self.atlas.width(),
            truncated: pass.truncated,
        })
    }

    /// Extract one glyph of `width` starting at `cursor`, reporting whether
    /// it was cut short by the end of the rows.
    fn glyph_at(
        &self,
        class: CharClass,
        ch: char,
        cursor: usize,
        width: usize,
    ) -> Result<(Glyph, bool), SlicerError> {
        if width == 0 {
            return Ok((Glyph::empty(self.atlas.row_count()), false));
        }

        // `cursor + width` was checked by the caller.
        let end = cursor + width - 1;
        let row_width = self.atlas.width();
        let truncated = end > row_width;

        if truncated && self.overrun == OverrunPolicy::Reject {
            return Err(SlicerError::Overrun { ch, class, cursor, width, row_width });
        }

        let rows = (0..self.atlas.row_count())
            .map(|row| self.atlas.columns_clipped(row, cursor, end))
            .collect();

        Ok((Glyph::new(rows), truncated))
    }

    /// The atlas being sliced.
    pub fn atlas(&self) -> &Atlas {
        self.atlas
    }

    /// The overrun policy in effect.
    pub fn overrun(&self) -> OverrunPolicy {
        self.overrun
    }
}
