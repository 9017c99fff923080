//! The error taxonomy for text operations.
//!
//! Validation failures are always surfaced, never silently repaired. The
//! one exception is [`crate::Text::from_slice_unchecked`], which trades
//! the runtime check for a caller guarantee. Broken collaborator contracts
//! (an engine reporting an implausible length) are not represented here:
//! they are unrecoverable and panic instead of returning a partial result.

use thiserror::Error;

/// Errors surfaced by the checked text API.
///
/// Every `Result`-returning convenience in this crate is a thin wrapper
/// around an `Option`-returning primary; the variants below are what the
/// wrappers attach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// The input bytes are not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// The input bytes are not pure ASCII.
    #[error("invalid ASCII")]
    InvalidAscii,
    /// A codepoint index beyond the end of the text.
    #[error("codepoint index {0} out of range")]
    IndexOutOfRange(usize),
    /// An operation requiring at least one codepoint was given an empty
    /// text.
    #[error("empty text")]
    EmptyContainer,
}
