//! Glyph table assembly across several atlases.
//!
//! Runs the slicer once per character class and merges the results into a
//! single table, in job order.
//!
//! ## Phases
//!
//! 1. **Setup**: check row counts, resolve every width plan and check that
//!    no character belongs to two jobs. All configuration errors surface
//!    here, before any atlas is touched.
//! 2. **Slice**: one pass per job, each with its own cursor. Glyphs that
//!    run off the end of their atlas are truncated unless the assembler
//!    uses [`OverrunPolicy::Reject`].
//! 3. **Merge**: append each pass to the table; a repeated key is an error.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::policy::{WidthError, WidthPlan, WidthSpec};
use crate::slicer::{AtlasSlicer, OverrunPolicy, SlicerError};
use crate::types::{Atlas, AtlasError, CharClass, GlyphTable, TableError};

/// Broad category of an assembly failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inputs disagree with each other; detected before slicing.
    Configuration,
    /// The atlas geometry does not fit the widths; detected while slicing.
    Geometry,
    /// Fingerprinting failed.
    Internal,
}

/// Error type for assembly.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// An atlas does not have the configured row count.
    #[error("Atlas for {class} has {found} rows, expected {expected}")]
    RowCount {
        /// Class of the atlas.
        class: CharClass,
        /// Configured row count.
        expected: usize,
        /// Rows in the atlas.
        found: usize,
    },
    /// An atlas could not be built.
    #[error("Invalid {class} atlas: {source}")]
    Atlas {
        /// Class of the atlas.
        class: CharClass,
        /// What is wrong with it.
        source: AtlasError,
    },
    /// A width plan could not be resolved.
    #[error(transparent)]
    Width(#[from] WidthError),
    /// Two jobs list the same character.
    #[error("Character {ch:?} is listed by both {first} and {second}")]
    Collision {
        /// The shared character.
        ch: char,
        /// Earlier job's class.
        first: CharClass,
        /// Later job's class.
        second: CharClass,
    },
    /// Slicing failed.
    #[error(transparent)]
    Slice(#[from] SlicerError),
    /// Merging into the table failed.
    #[error(transparent)]
    Table(#[from] TableError),
    /// Fingerprinting the table failed.
    #[error("Failed to fingerprint glyph table: {0}")]
    Canonical(#[from] serde_json::Error),
}

impl AssemblyError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RowCount { .. }
            | Self::Atlas { .. }
            | Self::Width(_)
            | Self::Collision { .. }
            | Self::Table(_) => ErrorKind::Configuration,
            Self::Slice(_) => ErrorKind::Geometry,
            Self::Canonical(_) => ErrorKind::Internal,
        }
    }
}

/// One atlas to slice: its class, art, iteration order and widths.
#[derive(Debug, Clone)]
pub struct AtlasJob {
    /// Class of the characters in the atlas.
    pub class: CharClass,
    /// The art.
    pub atlas: Atlas,
    /// Characters in the order they appear in the atlas.
    pub order: Vec<char>,
    /// Width rules for the class.
    pub widths: WidthSpec,
}

impl AtlasJob {
    /// Create a job that slices the class's full alphabet.
    pub fn new(class: CharClass, atlas: Atlas, widths: WidthSpec) -> Self {
        Self {
            class,
            atlas,
            order: class.alphabet().to_vec(),
            widths,
        }
    }

    /// Create a job from raw atlas rows, naming the class if the rows are
    /// not a valid atlas.
    pub fn from_rows<I, S>(
        class: CharClass,
        rows: I,
        widths: WidthSpec,
    ) -> Result<Self, AssemblyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let atlas = Atlas::from_rows(rows)
            .map_err(|source| AssemblyError::Atlas { class, source })?;
        Ok(Self::new(class, atlas, widths))
    }

    /// Replace the iteration order.
    pub fn with_order(mut self, order: impl IntoIterator<Item = char>) -> Self {
        self.order = order.into_iter().collect();
        self
    }
}

/// Summary of one slicing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Class of the pass.
    pub class: CharClass,
    /// Number of glyphs produced.
    pub glyphs: usize,
    /// Cursor after the last glyph.
    pub final_cursor: usize,
    /// Column count of the atlas.
    pub atlas_width: usize,
    /// Glyphs cut short by the end of the atlas rows.
    pub truncated: usize,
}

/// Summary of an assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    /// One summary per job, in job order.
    pub passes: Vec<PassSummary>,
    /// Fingerprint of the produced table.
    pub fingerprint: String,
}

/// Assembles one glyph table from several atlases.
#[derive(Debug, Clone)]
pub struct TableAssembler {
    row_count: usize,
    overrun: OverrunPolicy,
    jobs: Vec<AtlasJob>,
}

impl TableAssembler {
    /// Create an assembler for glyphs of `row_count` rows.
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            overrun: OverrunPolicy::default(),
            jobs: Vec::new(),
        }
    }

    /// Set the overrun policy used by every pass.
    pub fn with_overrun(mut self, overrun: OverrunPolicy) -> Self {
        self.overrun = overrun;
        self
    }

    /// Add a job.
    pub fn with_job(mut self, job: AtlasJob) -> Self {
        self.jobs.push(job);
        self
    }

    /// Add a job in place.
    pub fn push_job(&mut self, job: AtlasJob) {
        self.jobs.push(job);
    }

    /// Jobs in slicing order.
    pub fn jobs(&self) -> &[AtlasJob] {
        &self.jobs
    }

    /// Configured glyph row count.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Build the glyph table.
    pub fn assemble(&self) -> Result<GlyphTable, AssemblyError> {
        self.assemble_with_report().map(|(table, _)| table)
    }

    /// Build the glyph table and a per-pass report.
    pub fn assemble_with_report(
        &self,
    ) -> Result<(GlyphTable, AssemblyReport), AssemblyError> {
        let plans = self.prepare()?;

        let mut table = GlyphTable::new(self.row_count);
        let mut passes = Vec::with_capacity(plans.len());

        for (job, plan) in self.jobs.iter().zip(&plans) {
            let outcome = AtlasSlicer::new(&job.atlas)
                .with_overrun(self.overrun)
                .slice(plan)?;

            if outcome.trailing_columns() > 0 {
                tracing::warn!(
                    class = %job.class,
                    final_cursor = outcome.cursor,
                    atlas_width = outcome.atlas_width,
                    "Atlas is wider than the sum of its glyph widths"
                );
            }

            passes.push(PassSummary {
                class: outcome.class,
                glyphs: outcome.glyphs.len(),
                final_cursor: outcome.cursor,
                atlas_width: outcome.atlas_width,
                truncated: outcome.truncated,
            });

            for (ch, glyph) in outcome.into_glyphs() {
                table.insert(job.class, ch, glyph)?;
            }
            tracing::debug!(class = %job.class, total = table.len(), "Merged glyphs");
        }

        let fingerprint = table.fingerprint()?;
        tracing::info!(
            glyphs = table.len(),
            fingerprint = %fingerprint,
            "Assembled glyph table"
        );

        Ok((table, AssemblyReport { passes, fingerprint }))
    }

    /// Validate every job and resolve its width plan.
    fn prepare(&self) -> Result<Vec<WidthPlan>, AssemblyError> {
        let mut owners: BTreeMap<char, CharClass> = BTreeMap::new();
        let mut plans = Vec::with_capacity(self.jobs.len());

        for job in &self.jobs {
            if job.atlas.row_count() != self.row_count {
                return Err(AssemblyError::RowCount {
                    class: job.class,
                    expected: self.row_count,
                    found: job.atlas.row_count(),
                });
            }

            let plan = job.widths.resolve(&job.order)?;

            for &ch in &job.order {
                if let Some(&first) = owners.get(&ch) {
                    return Err(AssemblyError::Collision { ch, first, second: job.class });
                }
                owners.insert(ch, job.class);
            }

            plans.push(plan);
        }

        Ok(plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(class: CharClass, rows: [&str; 2], widths: &[(char, usize)]) -> AtlasJob {
        let mut spec = WidthSpec::new(class, None);
        for &(ch, w) in widths {
            spec = spec.with_override(ch, w);
        }
        AtlasJob::new(class, Atlas::from_rows(rows).unwrap(), spec)
            .with_order(widths.iter().map(|&(c, _)| c))
    }

    #[test]
    fn test_each_job_has_its_own_cursor() {
        let assembler = TableAssembler::new(2)
            .with_job(job(CharClass::Letters, ["ab ", "AB "], &[('A', 3)]))
            .with_job(job(CharClass::Digits, ["01 ", "23 "], &[('0', 3)]));

        let table = assembler.assemble().unwrap();

        assert_eq!(table.get('0').unwrap().rows(), &["01".to_string(), "23".to_string()]);
    }

    #[test]
    fn test_table_order_follows_jobs() {
        let assembler = TableAssembler::new(2)
            .with_job(job(CharClass::Letters, ["a b ", "a b "], &[('A', 2), ('B', 2)]))
            .with_job(job(CharClass::Digits, ["0 ", "0 "], &[('0', 2)]))
            .with_job(job(CharClass::Punctuation, ["! ", "! "], &[('!', 2)]));

        let table = assembler.assemble().unwrap();
        assert_eq!(table.chars().collect::<String>(), "AB0!");
    }

    #[test]
    fn test_collision_detected_before_slicing() {
        // The digit atlas would overrun, but the collision is reported first.
        let assembler = TableAssembler::new(2)
            .with_overrun(OverrunPolicy::Reject)
            .with_job(job(CharClass::Letters, ["a ", "a "], &[('A', 2)]))
            .with_job(job(CharClass::Digits, ["", ""], &[('A', 5)]));

        let err = assembler.assemble().unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Collision {
                ch: 'A',
                first: CharClass::Letters,
                second: CharClass::Digits,
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_row_count_mismatch() {
        let single = AtlasJob::new(
            CharClass::Punctuation,
            Atlas::from_rows(["! "]).unwrap(),
            WidthSpec::punctuation(),
        )
        .with_order(['!']);

        let err = TableAssembler::new(2).with_job(single).assemble().unwrap_err();
        assert!(matches!(err, AssemblyError::RowCount { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_ragged_rows_name_the_class() {
        let err = AtlasJob::from_rows(CharClass::Digits, ["0 1 ", "0 1"], WidthSpec::digits())
            .unwrap_err();

        assert!(matches!(
            err,
            AssemblyError::Atlas {
                class: CharClass::Digits,
                source: AtlasError::RaggedRow { row: 1, expected: 4, found: 3 },
            }
        ));
        assert!(err.to_string().contains("digits"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_width_is_configuration_error() {
        let spec = WidthSpec::new(CharClass::Punctuation, None).with_override('!', 2);
        let bad = AtlasJob::from_rows(CharClass::Punctuation, ["! ? ", "! ? "], spec)
            .unwrap()
            .with_order(['!', '?']);

        let err = TableAssembler::new(2).with_job(bad).assemble().unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Width(WidthError::MissingWidth {
                ch: '?',
                class: CharClass::Punctuation,
            })
        ));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_huge_deserialized_width_is_error() {
        let spec: WidthSpec = serde_json::from_str(concat!(
            r#"{"class":"letters","default_width":null,"#,
            r#""overrides":{"A":2,"B":18446744073709551615}}"#,
        ))
        .unwrap();
        let huge = AtlasJob::from_rows(CharClass::Letters, ["ab", "ab"], spec)
            .unwrap()
            .with_order(['A', 'B']);

        let err = TableAssembler::new(2).with_job(huge).assemble().unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Width(WidthError::WidthOverflow { ch: 'B', .. })
        ));
    }

    #[test]
    fn test_overrun_truncates_by_default() {
        let (table, report) = TableAssembler::new(2)
            .with_job(job(CharClass::Letters, ["ab", "ab"], &[('A', 2), ('B', 2)]))
            .assemble_with_report()
            .unwrap();

        assert_eq!(table.get('A').unwrap().rows(), &["a".to_string(), "a".to_string()]);
        assert_eq!(table.get('B'), Some(&crate::types::Glyph::empty(2)));
        assert_eq!(report.passes[0].truncated, 1);
    }

    #[test]
    fn test_overrun_is_geometry_error_when_strict() {
        let err = TableAssembler::new(2)
            .with_overrun(OverrunPolicy::Reject)
            .with_job(job(CharClass::Letters, ["ab", "ab"], &[('A', 4)]))
            .assemble()
            .unwrap_err();

        assert!(matches!(err, AssemblyError::Slice(SlicerError::Overrun { ch: 'A', .. })));
        assert_eq!(err.kind(), ErrorKind::Geometry);
    }

    #[test]
    fn test_report() {
        let (table, report) = TableAssembler::new(2)
            .with_job(job(CharClass::Letters, ["a b   ", "a b   "], &[('A', 2), ('B', 2)]))
            .assemble_with_report()
            .unwrap();

        assert_eq!(
            report.passes,
            vec![PassSummary {
                class: CharClass::Letters,
                glyphs: 2,
                final_cursor: 4,
                atlas_width: 6,
                truncated: 0,
            }]
        );
        assert_eq!(report.fingerprint, table.fingerprint().unwrap());
    }

    #[test]
    fn test_empty_assembler() {
        let table = TableAssembler::new(2).assemble().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 2);
    }
}
