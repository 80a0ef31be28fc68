//! The built-in small-text font.
//!
//! Two-row block-art glyphs for A–Z, 0–9, `!`, space and `?`. Each atlas
//! row is every glyph of its class laid end to end, one spacing column
//! after each glyph.
//!
//! Spacing columns are U+2003 (em space), except the final one of each
//! row, so they stay distinct from the space glyph itself.

use crate::assembler::{AssemblyError, AtlasJob, TableAssembler};
use crate::config::GenerationConfig;
use crate::policy::WidthSpec;
use crate::types::{Atlas, AtlasError, CharClass, GlyphTable};

const LETTER_ROWS: [&str; 2] = [
    concat!(
        "▄▀█\u{2003}█▄▄\u{2003}█▀▀\u{2003}█▀▄\u{2003}█▀▀\u{2003}█▀▀\u{2003}█▀▀\u{2003}",
        "█░█\u{2003}█\u{2003}░░█\u{2003}█▄▀\u{2003}█░░\u{2003}█▀▄▀█\u{2003}█▄░█\u{2003}",
        "█▀█\u{2003}█▀█\u{2003}█▀█\u{2003}█▀█\u{2003}█▀\u{2003}▀█▀\u{2003}█░█\u{2003}",
        "█░█\u{2003}█░█░█\u{2003}▀▄▀\u{2003}█▄█\u{2003}▀█ ",
    ),
    concat!(
        "█▀█\u{2003}█▄█\u{2003}█▄▄\u{2003}█▄▀\u{2003}██▄\u{2003}█▀░\u{2003}█▄█\u{2003}",
        "█▀█\u{2003}█\u{2003}█▄█\u{2003}█░█\u{2003}█▄▄\u{2003}█░▀░█\u{2003}█░▀█\u{2003}",
        "█▄█\u{2003}█▀▀\u{2003}▀▀█\u{2003}█▀▄\u{2003}▄█\u{2003}░█░\u{2003}█▄█\u{2003}",
        "▀▄▀\u{2003}▀▄▀▄▀\u{2003}█░█\u{2003}░█░\u{2003}█▄ ",
    ),
];

// `8` has width 0 and no columns here.
const DIGIT_ROWS: [&str; 2] = [
    "█▀█\u{2003}▄█\u{2003}▀█\u{2003}▀▀█\u{2003}█░█\u{2003}█▀\u{2003}█▄▄\u{2003}▀▀█\u{2003}█▀█ ",
    "█▄█\u{2003}░█\u{2003}█▄\u{2003}▄██\u{2003}▀▀█\u{2003}▄█\u{2003}█▄█\u{2003}░░█\u{2003}▀▀█ ",
];

const PUNCTUATION_ROWS: [&str; 2] = [
    "█\u{2003} \u{2003}▀█ ",
    "▄\u{2003} \u{2003}░▄ ",
];

/// The letter atlas, A–Z.
pub fn letter_atlas() -> Result<Atlas, AtlasError> {
    Atlas::from_rows(LETTER_ROWS)
}

/// The digit atlas, 0–9.
pub fn digit_atlas() -> Result<Atlas, AtlasError> {
    Atlas::from_rows(DIGIT_ROWS)
}

/// The punctuation atlas: `!`, space, `?`.
pub fn punctuation_atlas() -> Result<Atlas, AtlasError> {
    Atlas::from_rows(PUNCTUATION_ROWS)
}

/// Built-in atlas for `class`.
pub fn atlas_for(class: CharClass) -> Result<Atlas, AtlasError> {
    match class {
        CharClass::Letters => letter_atlas(),
        CharClass::Digits => digit_atlas(),
        CharClass::Punctuation => punctuation_atlas(),
    }
}

/// An assembler loaded with the built-in atlases enabled by `config`.
pub fn assembler(config: &GenerationConfig) -> Result<TableAssembler, AssemblyError> {
    let mut assembler = TableAssembler::new(config.row_count).with_overrun(config.overrun);
    for class in config.enabled_classes() {
        let atlas = atlas_for(class).map_err(|source| AssemblyError::Atlas { class, source })?;
        assembler.push_job(AtlasJob::new(class, atlas, WidthSpec::for_class(class)));
    }
    Ok(assembler)
}

/// Generate the small-text glyph table.
pub fn glyph_table(config: &GenerationConfig) -> Result<GlyphTable, AssemblyError> {
    assembler(config)?.assemble()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::OverrunPolicy;

    #[test]
    fn test_atlas_widths_match_width_specs() {
        for class in CharClass::ALL {
            let atlas = atlas_for(class).unwrap();
            let plan = WidthSpec::for_class(class).resolve(class.alphabet()).unwrap();
            assert_eq!(atlas.row_count(), 2, "{class}");
            assert_eq!(atlas.width(), plan.total_width(), "{class}");
        }
    }

    #[test]
    fn test_letters_only_variant() {
        let table = glyph_table(&GenerationConfig::letters_only()).unwrap();
        assert_eq!(table.len(), 29);
        assert!(!table.contains('0'));
        assert!(table.contains('?'));
    }

    #[test]
    fn test_full_variant() {
        let table = glyph_table(&GenerationConfig::default()).unwrap();
        assert_eq!(table.len(), 39);
        assert_eq!(table.get('8').unwrap().rows(), &[String::new(), String::new()]);
    }

    #[test]
    fn test_row_count_must_match_art() {
        let config = GenerationConfig { row_count: 3, ..GenerationConfig::default() };
        let err = glyph_table(&config).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::RowCount { class: CharClass::Letters, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_strict_overrun_accepts_builtin_art() {
        let config = GenerationConfig {
            overrun: OverrunPolicy::Reject,
            ..GenerationConfig::default()
        };
        let (_, report) = assembler(&config).unwrap().assemble_with_report().unwrap();
        assert!(report.passes.iter().all(|pass| pass.truncated == 0));
    }
}
