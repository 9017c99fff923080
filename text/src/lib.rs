//! UTF-8 validated text over Strand slices.
//!
//! [`Text`] is a byte [`strand_vector::Slice`] carrying the invariant that
//! its contents are valid UTF-8, together with codepoint-level operations:
//! indexing, iteration, mapping and folding, searching, packing and
//! unpacking. Raw scalar decoding and encoding live in [`codec`]; Unicode
//! semantics (normalization, case mapping, collation, category tests) are
//! reached through the [`transform::TransformEngine`] seam and its default
//! engine.
//!
//! Everything reachable through the checked construction API is valid
//! UTF-8. The single unchecked path is
//! [`Text::from_slice_unchecked`], which is caller-guaranteed and
//! distinctly named so it never hides behind a checked-looking call site.

pub mod codec;
pub mod error;
pub mod text;
pub mod transform;

pub use error::TextError;
pub use text::{Chars, CharsBack, Text};
pub use transform::{Category, Locale, NormalizationMode, StdEngine, TransformEngine, TransformOp};
