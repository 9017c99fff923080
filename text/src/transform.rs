//! The Unicode transformation engine seam.
//!
//! The text layer never computes Unicode semantics itself: normalization,
//! case mapping, collation, and category tests all go through
//! [`TransformEngine`]. The protocol is two-phase: the core asks the
//! engine for the required output length, allocates exactly that buffer,
//! and has the engine fill it — each phase called exactly once. An engine
//! whose fill disagrees with its own length computation has broken its
//! contract, and the core aborts rather than returning a partial result.
//!
//! [`StdEngine`] is the default engine, built on the standard library's
//! case mappings, `unicode-normalization`, and `unicode-segmentation`.

use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr};

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::codec;

/// The closed set of case-mapping locales.
///
/// `Turkish` covers Azeri-Latin as well; the two share the dotted/dotless
/// I rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Default,
    Lithuanian,
    Turkish,
}

/// Unicode normalization forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMode {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

/// A byte-rewriting transformation, passed through both phases of the
/// protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    Normalize(NormalizationMode),
    CaseFold,
    Lower(Locale),
    Upper(Locale),
    Title(Locale),
}

/// A set of character-class flags for category tests.
///
/// General-category style flags and POSIX-compatibility flags combine
/// with `|`; a character matches the set if it matches any class flag.
/// [`Category::GRAPHEME_ATOMIC`] is a modifier rather than a class: it
/// makes span operations treat extended grapheme clusters atomically, so
/// a cluster only matches if every scalar in it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category(u32);

impl Category {
    pub const LETTER: Category = Category(1 << 0);
    pub const UPPERCASE: Category = Category(1 << 1);
    pub const LOWERCASE: Category = Category(1 << 2);
    pub const NUMBER: Category = Category(1 << 3);
    pub const ALPHANUMERIC: Category = Category(1 << 4);
    pub const WHITESPACE: Category = Category(1 << 5);
    pub const CONTROL: Category = Category(1 << 6);

    pub const POSIX_DIGIT: Category = Category(1 << 16);
    pub const POSIX_SPACE: Category = Category(1 << 17);
    pub const POSIX_ALNUM: Category = Category(1 << 18);
    pub const POSIX_PUNCT: Category = Category(1 << 19);

    /// Treat extended grapheme clusters atomically in span operations.
    pub const GRAPHEME_ATOMIC: Category = Category(1 << 31);

    /// Returns `true` if every flag of `other` is set in `self`.
    pub fn contains(self, other: Category) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if `ch` belongs to at least one class flag of this
    /// set (the `GRAPHEME_ATOMIC` modifier is not a class).
    pub fn matches_char(self, ch: char) -> bool {
        (self.contains(Category::LETTER) && ch.is_alphabetic())
            || (self.contains(Category::UPPERCASE) && ch.is_uppercase())
            || (self.contains(Category::LOWERCASE) && ch.is_lowercase())
            || (self.contains(Category::NUMBER) && ch.is_numeric())
            || (self.contains(Category::ALPHANUMERIC) && ch.is_alphanumeric())
            || (self.contains(Category::WHITESPACE) && ch.is_whitespace())
            || (self.contains(Category::CONTROL) && ch.is_control())
            || (self.contains(Category::POSIX_DIGIT) && ch.is_ascii_digit())
            || (self.contains(Category::POSIX_SPACE) && ch.is_ascii_whitespace())
            || (self.contains(Category::POSIX_ALNUM) && ch.is_ascii_alphanumeric())
            || (self.contains(Category::POSIX_PUNCT) && ch.is_ascii_punctuation())
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

impl BitAnd for Category {
    type Output = Category;

    fn bitand(self, rhs: Category) -> Category {
        Category(self.0 & rhs.0)
    }
}

/// The transformation engine interface.
///
/// All byte arguments are guaranteed valid UTF-8 by the caller (they come
/// out of [`crate::Text`] values). `compute_len` and `fill` are always
/// called in that order, exactly once each, on the same input and op;
/// `fill` returns the number of bytes it wrote, which the caller checks
/// against the reservation.
pub trait TransformEngine {
    fn compute_len(&self, bytes: &[u8], op: TransformOp) -> usize;
    fn fill(&self, bytes: &[u8], dest: &mut [u8], op: TransformOp) -> usize;

    /// Total order between two texts.
    fn collate(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// The length in bytes of the longest prefix whose characters all
    /// match `flags` (clusters matching atomically under
    /// [`Category::GRAPHEME_ATOMIC`]). Always a character boundary.
    fn matched_prefix_len(&self, bytes: &[u8], flags: Category) -> usize;
}

/// The default engine.
///
/// Case mapping uses the standard library's full (one-to-many) mappings
/// with the Turkish/Azeri dotted/dotless-I special cases layered on top;
/// the Lithuanian dot-above retention rules beyond what the default
/// mapping already covers are not implemented and fall back to the
/// default mapping. Normalization comes from `unicode-normalization`.
/// Collation is codepoint order over canonically decomposed, case-folded
/// streams — a simple total order, not full UCA (reproducing UCA tables
/// is out of scope).
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEngine;

/// A one-to-many case mapping step: either a fixed character or one of
/// the standard library's expansion iterators.
enum CaseIter {
    One(std::iter::Once<char>),
    Lower(std::char::ToLowercase),
    Upper(std::char::ToUppercase),
}

impl Iterator for CaseIter {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            CaseIter::One(it) => it.next(),
            CaseIter::Lower(it) => it.next(),
            CaseIter::Upper(it) => it.next(),
        }
    }
}

fn lower_char(ch: char, locale: Locale) -> CaseIter {
    match (locale, ch) {
        // Turkish/Azeri: dotted capital I lowers to plain i, dotless
        // capital I lowers to dotless ı.
        (Locale::Turkish, 'İ') => CaseIter::One(std::iter::once('i')),
        (Locale::Turkish, 'I') => CaseIter::One(std::iter::once('ı')),
        _ => CaseIter::Lower(ch.to_lowercase()),
    }
}

fn upper_char(ch: char, locale: Locale) -> CaseIter {
    match (locale, ch) {
        (Locale::Turkish, 'i') => CaseIter::One(std::iter::once('İ')),
        (Locale::Turkish, 'ı') => CaseIter::One(std::iter::once('I')),
        _ => CaseIter::Upper(ch.to_uppercase()),
    }
}

impl StdEngine {
    /// The transformed scalar stream for `op`. This is the single source
    /// of truth behind both protocol phases, so they cannot disagree.
    fn mapped<'a>(&self, input: &'a str, op: TransformOp) -> Box<dyn Iterator<Item = char> + 'a> {
        match op {
            TransformOp::Normalize(NormalizationMode::Nfc) => Box::new(input.nfc()),
            TransformOp::Normalize(NormalizationMode::Nfd) => Box::new(input.nfd()),
            TransformOp::Normalize(NormalizationMode::Nfkc) => Box::new(input.nfkc()),
            TransformOp::Normalize(NormalizationMode::Nfkd) => Box::new(input.nfkd()),
            TransformOp::CaseFold => {
                // Full case folding approximated by the full lowercase
                // mapping, locale-independent per the folding rules.
                Box::new(input.chars().flat_map(|c| lower_char(c, Locale::Default)))
            }
            TransformOp::Lower(locale) => {
                Box::new(input.chars().flat_map(move |c| lower_char(c, locale)))
            }
            TransformOp::Upper(locale) => {
                Box::new(input.chars().flat_map(move |c| upper_char(c, locale)))
            }
            TransformOp::Title(locale) => {
                let mut at_word_start = true;
                Box::new(input.chars().flat_map(move |c| {
                    if c.is_alphanumeric() {
                        let mapped = if at_word_start {
                            // Titlecase stand-in: the uppercase mapping.
                            upper_char(c, locale)
                        } else {
                            lower_char(c, locale)
                        };
                        at_word_start = false;
                        mapped
                    } else {
                        at_word_start = true;
                        CaseIter::One(std::iter::once(c))
                    }
                }))
            }
        }
    }
}

/// Engine inputs come out of `Text` values, so this cannot fail on a
/// well-behaved caller.
fn as_str(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).expect("engine input is validated text")
}

impl TransformEngine for StdEngine {
    fn compute_len(&self, bytes: &[u8], op: TransformOp) -> usize {
        self.mapped(as_str(bytes), op).map(char::len_utf8).sum()
    }

    fn fill(&self, bytes: &[u8], dest: &mut [u8], op: TransformOp) -> usize {
        let mut pos = 0;
        for ch in self.mapped(as_str(bytes), op) {
            pos = codec::encode(ch, dest, pos);
        }
        pos
    }

    fn collate(&self, a: &[u8], b: &[u8]) -> Ordering {
        let key = |s: &'_ str| {
            s.nfd()
                .flat_map(|c| lower_char(c, Locale::Default))
                .collect::<Vec<char>>()
        };
        key(as_str(a))
            .cmp(&key(as_str(b)))
            // Deterministic tie-break between texts that fold together.
            .then_with(|| a.cmp(b))
    }

    fn matched_prefix_len(&self, bytes: &[u8], flags: Category) -> usize {
        let input = as_str(bytes);
        let mut matched = 0;
        if flags.contains(Category::GRAPHEME_ATOMIC) {
            for cluster in input.graphemes(true) {
                if !cluster.chars().all(|c| flags.matches_char(c)) {
                    break;
                }
                matched += cluster.len();
            }
        } else {
            for ch in input.chars() {
                if !flags.matches_char(ch) {
                    break;
                }
                matched += ch.len_utf8();
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(op: TransformOp, input: &str) -> String {
        let engine = StdEngine;
        let n = engine.compute_len(input.as_bytes(), op);
        let mut dest = vec![0u8; n];
        let written = engine.fill(input.as_bytes(), &mut dest, op);
        assert_eq!(written, n);
        String::from_utf8(dest).unwrap()
    }

    #[test]
    fn lowercase_is_locale_sensitive() {
        let default = run(TransformOp::Lower(Locale::Default), "İstanbul");
        let turkish = run(TransformOp::Lower(Locale::Turkish), "İstanbul");
        assert_ne!(default, turkish);
        assert_eq!(turkish, "istanbul");
        assert_eq!(default, "i\u{307}stanbul");

        assert_eq!(run(TransformOp::Lower(Locale::Turkish), "I"), "ı");
        assert_eq!(run(TransformOp::Upper(Locale::Turkish), "i"), "İ");
    }

    #[test]
    fn normalization_modes() {
        // é as e + combining acute composes under NFC.
        assert_eq!(run(TransformOp::Normalize(NormalizationMode::Nfc), "e\u{301}"), "é");
        assert_eq!(run(TransformOp::Normalize(NormalizationMode::Nfd), "é"), "e\u{301}");
        // Compatibility forms unfold the ligature.
        assert_eq!(run(TransformOp::Normalize(NormalizationMode::Nfkc), "ﬁ"), "fi");
    }

    #[test]
    fn title_case_per_word() {
        assert_eq!(run(TransformOp::Title(Locale::Default), "hello wORLD"), "Hello World");
    }

    #[test]
    fn case_fold_expands() {
        // ẞ folds through the lowercase mapping to ß here; German sharp s.
        assert_eq!(run(TransformOp::CaseFold, "ẞ"), "ß");
        assert_eq!(run(TransformOp::CaseFold, "ABC"), "abc");
    }

    #[test]
    fn collation_folds_then_tie_breaks_on_bytes() {
        let engine = StdEngine;
        let composed = "é".as_bytes(); // [0xC3, 0xA9]
        let decomposed = "e\u{301}".as_bytes(); // [0x65, 0xCC, 0x81]

        assert_eq!(engine.collate(composed, composed), Ordering::Equal);

        // Composed and decomposed forms share an NFD+fold key, so the
        // raw-byte tie-break decides: 0x65 sorts before 0xC3.
        assert_eq!(engine.collate(decomposed, composed), Ordering::Less);
        assert_eq!(engine.collate(composed, decomposed), Ordering::Greater);

        // The fold dominates the raw bytes when keys differ.
        assert_eq!(engine.collate("a".as_bytes(), "B".as_bytes()), Ordering::Less);
    }

    #[test]
    fn matched_prefix_respects_clusters() {
        let engine = StdEngine;
        let flags = Category::LETTER;
        assert_eq!(engine.matched_prefix_len("abc1".as_bytes(), flags), 3);
        assert_eq!(engine.matched_prefix_len("1abc".as_bytes(), flags), 0);

        // The family emoji is one cluster glued with ZWJ (a control-ish
        // format char); atomically it must not half-match.
        let atomic = Category::LETTER | Category::GRAPHEME_ATOMIC;
        let input = "a👨\u{200d}👩b";
        let n = engine.matched_prefix_len(input.as_bytes(), atomic);
        assert_eq!(n, 1);

        // "e" + combining acute: scalar-wise the prefix is just the "e",
        // but the cluster as a whole contains a non-letter mark, so the
        // atomic match is empty.
        let decomposed = "e\u{301}x";
        assert_eq!(engine.matched_prefix_len(decomposed.as_bytes(), flags), 1);
        assert_eq!(engine.matched_prefix_len(decomposed.as_bytes(), atomic), 0);
    }
}
