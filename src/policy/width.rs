//! Width specs: how many atlas columns each character occupies.
//!
//! A width counts the glyph's columns plus one spacing column. The slicer
//! keeps `width - 1` columns and skips the last one, so a width of 4 yields
//! a 3-column glyph.
//!
//! Resolution is split in two steps:
//!
//! 1. [`WidthSpec::resolve`] runs at setup time and turns a spec plus an
//!    iteration order into a [`WidthPlan`], failing on any character that
//!    has no width.
//! 2. The slicer walks the plan, so a width lookup can never fail mid-slice.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::canonical::canonical_hash_hex;
use crate::types::CharClass;

/// Default width of a letter.
pub const LETTER_DEFAULT_WIDTH: usize = 4;

/// Default width of a digit.
pub const DIGIT_DEFAULT_WIDTH: usize = 4;

/// Setup-time width errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidthError {
    /// The character has neither an override nor a class default.
    #[error("No width for {ch:?} in {class}: no override and no class default")]
    MissingWidth {
        /// The character.
        ch: char,
        /// Its class.
        class: CharClass,
    },
    /// The iteration order names a character twice.
    #[error("Character {ch:?} appears more than once in the {class} order")]
    DuplicateCharacter {
        /// The repeated character.
        ch: char,
        /// The class whose order repeats it.
        class: CharClass,
    },
    /// The widths up to and including this character do not fit in a `usize`.
    #[error("Widths in {class} overflow at {ch:?} (width {width})")]
    WidthOverflow {
        /// The character whose width overflows the running total.
        ch: char,
        /// Its class.
        class: CharClass,
        /// Its resolved width.
        width: usize,
    },
}

/// Width rules for one character class: a default plus overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthSpec {
    /// Class the spec applies to.
    pub class: CharClass,
    /// Width of any character without an override. `None` means every
    /// character needs an explicit override.
    pub default_width: Option<usize>,
    /// Per-character widths, taking precedence over the default.
    #[serde(default)]
    pub overrides: BTreeMap<char, usize>,
}

impl WidthSpec {
    /// Create a spec with no overrides.
    pub fn new(class: CharClass, default_width: Option<usize>) -> Self {
        Self {
            class,
            default_width,
            overrides: BTreeMap::new(),
        }
    }

    /// Add or replace an override.
    pub fn with_override(mut self, ch: char, width: usize) -> Self {
        self.overrides.insert(ch, width);
        self
    }

    /// Small-text letter widths.
    pub fn letters() -> Self {
        Self::new(CharClass::Letters, Some(LETTER_DEFAULT_WIDTH))
            .with_override('I', 2)
            .with_override('M', 6)
            .with_override('N', 5)
            .with_override('S', 3)
            .with_override('W', 6)
            .with_override('Z', 3)
    }

    /// Small-text digit widths. `8` has width 0 and slices to an empty glyph.
    pub fn digits() -> Self {
        Self::new(CharClass::Digits, Some(DIGIT_DEFAULT_WIDTH))
            .with_override('1', 3)
            .with_override('2', 3)
            .with_override('5', 3)
            .with_override('8', 0)
    }

    /// Small-text punctuation widths. There is no default.
    pub fn punctuation() -> Self {
        Self::new(CharClass::Punctuation, None)
            .with_override('!', 2)
            .with_override(' ', 2)
            .with_override('?', 3)
    }

    /// Small-text widths for `class`.
    pub fn for_class(class: CharClass) -> Self {
        match class {
            CharClass::Letters => Self::letters(),
            CharClass::Digits => Self::digits(),
            CharClass::Punctuation => Self::punctuation(),
        }
    }

    /// Width of `ch`: its override if any, else the class default.
    pub fn width_of(&self, ch: char) -> Option<usize> {
        self.overrides.get(&ch).copied().or(self.default_width)
    }

    /// Resolve a width for every character of `order`, in order.
    pub fn resolve(&self, order: &[char]) -> Result<WidthPlan, WidthError> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(order.len());
        let mut total: usize = 0;

        for &ch in order {
            if !seen.insert(ch) {
                return Err(WidthError::DuplicateCharacter { ch, class: self.class });
            }
            let width = self
                .width_of(ch)
                .ok_or(WidthError::MissingWidth { ch, class: self.class })?;
            total = total.checked_add(width).ok_or(WidthError::WidthOverflow {
                ch,
                class: self.class,
                width,
            })?;
            entries.push((ch, width));
        }

        for ch in self.overrides.keys().filter(|ch| !seen.contains(ch)) {
            tracing::debug!(
                class = %self.class,
                ch = ?ch,
                "Width override names a character outside the order"
            );
        }

        Ok(WidthPlan { class: self.class, entries })
    }

    /// Fingerprint of the width rules.
    pub fn params_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}

/// Resolved widths for one class, in iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidthPlan {
    class: CharClass,
    entries: Vec<(char, usize)>,
}

impl WidthPlan {
    /// Build a plan without the setup-time checks.
    #[cfg(test)]
    pub(crate) fn from_entries(class: CharClass, entries: Vec<(char, usize)>) -> Self {
        Self { class, entries }
    }

    /// Class the plan was resolved for.
    pub fn class(&self) -> CharClass {
        self.class
    }

    /// `(character, width)` pairs in iteration order.
    pub fn entries(&self) -> &[(char, usize)] {
        &self.entries
    }

    /// Resolved width of `ch`, if it is part of the plan.
    pub fn width_of(&self, ch: char) -> Option<usize> {
        self.entries.iter().find(|(c, _)| *c == ch).map(|&(_, w)| w)
    }

    /// Sum of all widths: the atlas width the plan expects. Saturates at
    /// `usize::MAX`.
    pub fn total_width(&self) -> usize {
        self.entries.iter().fold(0, |total, &(_, w)| total.saturating_add(w))
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the plan has no characters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_beats_default() {
        let spec = WidthSpec::letters();
        assert_eq!(spec.width_of('A'), Some(4));
        assert_eq!(spec.width_of('M'), Some(6));
        assert_eq!(spec.width_of('I'), Some(2));
    }

    #[test]
    fn test_digit_widths() {
        let spec = WidthSpec::digits();
        assert_eq!(spec.width_of('0'), Some(4));
        assert_eq!(spec.width_of('1'), Some(3));
        assert_eq!(spec.width_of('8'), Some(0));
    }

    #[test]
    fn test_punctuation_has_no_fallback() {
        let spec = WidthSpec::punctuation();
        assert_eq!(spec.width_of(' '), Some(2));
        assert_eq!(spec.width_of('.'), None);

        let err = spec.resolve(&['!', '.']).unwrap_err();
        assert_eq!(err, WidthError::MissingWidth { ch: '.', class: CharClass::Punctuation });
    }

    #[test]
    fn test_resolve_keeps_order() {
        let plan = WidthSpec::letters().resolve(CharClass::Letters.alphabet()).unwrap();
        assert_eq!(plan.len(), 26);
        assert_eq!(plan.entries()[0], ('A', 4));
        assert_eq!(plan.entries()[12], ('M', 6));
        assert_eq!(plan.total_width(), 105);
    }

    #[test]
    fn test_small_text_totals() {
        let digits = WidthSpec::digits().resolve(CharClass::Digits.alphabet()).unwrap();
        assert_eq!(digits.total_width(), 33);
        let punct = WidthSpec::punctuation().resolve(CharClass::Punctuation.alphabet()).unwrap();
        assert_eq!(punct.total_width(), 7);
    }

    #[test]
    fn test_duplicate_in_order() {
        let err = WidthSpec::letters().resolve(&['A', 'B', 'A']).unwrap_err();
        assert_eq!(err, WidthError::DuplicateCharacter { ch: 'A', class: CharClass::Letters });
    }

    #[test]
    fn test_overflowing_widths_rejected_at_setup() {
        let json = concat!(
            r#"{"class":"letters","default_width":null,"#,
            r#""overrides":{"A":2,"B":18446744073709551615}}"#,
        );
        let spec: WidthSpec = serde_json::from_str(json).unwrap();

        let err = spec.resolve(&['A', 'B']).unwrap_err();
        assert_eq!(
            err,
            WidthError::WidthOverflow { ch: 'B', class: CharClass::Letters, width: usize::MAX }
        );
    }

    #[test]
    fn test_single_huge_width_resolves() {
        let spec = WidthSpec::new(CharClass::Letters, None).with_override('A', usize::MAX);
        let plan = spec.resolve(&['A']).unwrap();
        assert_eq!(plan.total_width(), usize::MAX);
    }

    #[test]
    fn test_total_width_saturates() {
        let plan = WidthPlan::from_entries(CharClass::Letters, vec![('A', usize::MAX), ('B', 2)]);
        assert_eq!(plan.total_width(), usize::MAX);
    }

    #[test]
    fn test_params_hash_changes_with_override() {
        let base = WidthSpec::letters();
        let changed = WidthSpec::letters().with_override('M', 5);
        assert_eq!(base.params_hash().unwrap(), WidthSpec::letters().params_hash().unwrap());
        assert_ne!(base.params_hash().unwrap(), changed.params_hash().unwrap());
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = concat!(
            r#"{"class":"punctuation","default_width":null,"#,
            r#""overrides":{"!":2," ":2,"?":3}}"#,
        );
        let spec: WidthSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, WidthSpec::punctuation());
    }

    #[test]
    fn test_negative_width_rejected_by_serde() {
        let json = r#"{"class":"letters","default_width":4,"overrides":{"A":-1}}"#;
        assert!(serde_json::from_str::<WidthSpec>(json).is_err());
    }
}
