//! Width policy definitions.

pub mod width;

pub use width::{WidthSpec, WidthPlan, WidthError, LETTER_DEFAULT_WIDTH, DIGIT_DEFAULT_WIDTH};
