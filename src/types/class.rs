//! Character classes and their fixed alphabets.

use serde::{Deserialize, Serialize};

const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

const PUNCTUATION: [char; 3] = ['!', ' ', '?'];

/// A class of characters sharing one atlas and one width spec.
///
/// Each class is an independent address space: its atlas is sliced with
/// its own cursor starting at column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// Upper-case Latin letters A–Z.
    Letters,
    /// Decimal digits 0–9.
    Digits,
    /// Punctuation and space: `!`, ` `, `?`.
    Punctuation,
}

impl CharClass {
    /// All classes in table order.
    pub const ALL: [CharClass; 3] = [Self::Letters, Self::Digits, Self::Punctuation];

    /// The supported characters of this class, in iteration order.
    pub fn alphabet(&self) -> &'static [char] {
        match self {
            Self::Letters => &LETTERS,
            Self::Digits => &DIGITS,
            Self::Punctuation => &PUNCTUATION,
        }
    }

    /// Classify a supported character.
    pub fn of(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.alphabet().contains(&ch))
    }

    /// Stable lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letters => "letters",
            Self::Digits => "digits",
            Self::Punctuation => "punctuation",
        }
    }
}

impl std::fmt::Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
