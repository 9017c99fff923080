use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use strand_vector::{build_exact, shuffle::IndexSource, Builder, Slice};
use unicode_width::UnicodeWidthChar;

use crate::codec;
use crate::error::TextError;
use crate::transform::{Category, Locale, NormalizationMode, StdEngine, TransformEngine, TransformOp};

/// A byte slice that is always valid UTF-8, with codepoint-level
/// operations.
///
/// Every value reachable through the checked construction API
/// ([`Text::validate`], [`Text::validate_ascii`], the `From` impls for
/// string types) holds the invariant. The sole way around the runtime
/// check is [`Text::from_slice_unchecked`], which is `unsafe` and
/// caller-guaranteed.
///
/// `Text` is a thin wrapper over a [`Slice<u8>`]: cloning is cheap,
/// sub-texts share the backing array, and the bytes are frozen for the
/// life of the value.
#[derive(Clone)]
pub struct Text(Slice<u8>);

impl Text {
    /// The empty text. Always valid; never allocates.
    pub fn new() -> Text {
        Text(Slice::new())
    }

    /// Checks that `bytes` is valid UTF-8 and wraps it.
    ///
    /// Empty input is always valid. O(n).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_text::{Text, TextError};
    /// # use strand_vector::Slice;
    /// assert!(Text::validate(Slice::from(&b" "[..])).is_ok());
    /// assert_eq!(
    ///     Text::validate(Slice::from(&[0xe0, 0x80][..])),
    ///     Err(TextError::InvalidUtf8),
    /// );
    /// ```
    pub fn validate(bytes: Slice<u8>) -> Result<Text, TextError> {
        if codec::utf8_validate(bytes.as_slice()) {
            Ok(Text(bytes))
        } else {
            Err(TextError::InvalidUtf8)
        }
    }

    /// Checks that `bytes` is pure single-byte ASCII and wraps it.
    pub fn validate_ascii(bytes: Slice<u8>) -> Result<Text, TextError> {
        if codec::ascii_validate(bytes.as_slice()) {
            Ok(Text(bytes))
        } else {
            Err(TextError::InvalidAscii)
        }
    }

    /// Wraps `bytes` without any check.
    ///
    /// This is the one legitimate way to bypass the validity invariant,
    /// for callers who can prove validity out of band (a literal, the
    /// output of a trusted encoder). It is deliberately named so it can
    /// never be mistaken for a checked constructor.
    ///
    /// # Safety
    ///
    /// `bytes` must be valid UTF-8. Constructing a `Text` over invalid
    /// bytes is undefined behavior: downstream operations reinterpret the
    /// bytes as `str` without checking.
    pub unsafe fn from_slice_unchecked(bytes: Slice<u8>) -> Text {
        debug_assert!(codec::utf8_validate(bytes.as_slice()));
        Text(bytes)
    }

    /// The underlying byte slice.
    pub fn bytes(&self) -> &Slice<u8> {
        &self.0
    }

    /// Consumes the text, returning the underlying byte slice.
    pub fn into_bytes(self) -> Slice<u8> {
        self.0
    }

    /// The contiguous byte view.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// A `str` view of the bytes.
    pub fn as_str(&self) -> &str {
        // SAFETY: the type invariant guarantees the bytes are valid
        // UTF-8; the only constructor that skips the check is unsafe and
        // passes the obligation to its caller.
        unsafe { std::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// The length in bytes. O(1).
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the text contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every byte is ASCII.
    pub fn is_ascii(&self) -> bool {
        codec::ascii_validate(self.as_bytes())
    }

    /// The number of codepoints. O(n): UTF-8 has no constant-time count.
    pub fn char_count(&self) -> usize {
        self.chars().count()
    }

    /// The `n`th codepoint from the front, or `None` when `n` is at or
    /// past the codepoint count.
    ///
    /// O(n) scan from the front. This is the primary contract;
    /// [`Text::char_at`] is the failing wrapper.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_text::Text;
    /// let t = Text::from("abc");
    /// assert_eq!(t.get(1), Some('b'));
    /// assert_eq!(t.get(5), None);
    /// ```
    pub fn get(&self, n: usize) -> Option<char> {
        self.chars().nth(n)
    }

    /// The `n`th codepoint from the back (`0` is the last).
    pub fn get_back(&self, n: usize) -> Option<char> {
        self.chars_back().nth(n)
    }

    /// [`Text::get`], with an error instead of `None`.
    pub fn char_at(&self, n: usize) -> Result<char, TextError> {
        self.get(n).ok_or(TextError::IndexOutOfRange(n))
    }

    /// [`Text::get_back`], with an error instead of `None`.
    pub fn char_at_back(&self, n: usize) -> Result<char, TextError> {
        self.get_back(n).ok_or(TextError::IndexOutOfRange(n))
    }

    /// The first codepoint.
    pub fn first_char(&self) -> Result<char, TextError> {
        self.get(0).ok_or(TextError::EmptyContainer)
    }

    /// The last codepoint.
    pub fn last_char(&self) -> Result<char, TextError> {
        self.get_back(0).ok_or(TextError::EmptyContainer)
    }

    /// The byte offset where the `n`th codepoint starts.
    ///
    /// Never fails: when `n` is at or past the codepoint count, the end
    /// boundary is returned as a sentinel. The result is always aligned
    /// to a character boundary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_text::Text;
    /// let t = Text::from("aé!");
    /// assert_eq!(t.char_byte_index(1), 1);
    /// assert_eq!(t.char_byte_index(2), 3); // é is two bytes
    /// assert_eq!(t.char_byte_index(99), t.byte_len());
    /// ```
    pub fn char_byte_index(&self, n: usize) -> usize {
        let bytes = self.as_bytes();
        let mut pos = 0;
        for _ in 0..n {
            match codec::decode_forward(bytes, pos) {
                Some((_, width)) => pos += width,
                None => break,
            }
        }
        pos
    }

    /// The byte offset where the `n`th-from-the-back codepoint starts
    /// (`n = 0` is the end boundary itself).
    ///
    /// Never fails: when `n` exceeds the codepoint count, the start
    /// boundary (offset zero) is the sentinel.
    pub fn char_byte_index_back(&self, n: usize) -> usize {
        let bytes = self.as_bytes();
        let mut pos = bytes.len();
        for _ in 0..n {
            match codec::decode_backward(bytes, pos) {
                Some((_, width)) => pos -= width,
                None => break,
            }
        }
        pos
    }

    /// Applies `f` to every codepoint, strictly, producing a new text.
    ///
    /// The output buffer starts at `byte_len + 3`: the margin guarantees
    /// one worst-case four-byte encode always fits before a capacity
    /// check, and transforms that keep per-character width (pure ASCII
    /// being the common case) never reallocate.
    pub fn map(&self, mut f: impl FnMut(char) -> char) -> Text {
        self.imap(|_, ch| f(ch))
    }

    /// [`Text::map`] with the codepoint index supplied to `f`.
    pub fn imap(&self, mut f: impl FnMut(usize, char) -> char) -> Text {
        let mut builder = Builder::with_capacity(self.byte_len() + 3);
        let mut scratch = [0u8; 4];
        for (i, ch) in self.chars().enumerate() {
            let end = codec::encode(f(i, ch), &mut scratch, 0);
            builder.extend_from_slice(&scratch[..end]);
        }
        // SAFETY: the buffer is a concatenation of encoded scalars.
        unsafe { Text::from_slice_unchecked(builder.freeze()) }
    }

    /// Strict left fold over the codepoints. Single pass, no intermediate
    /// allocation.
    pub fn fold<B>(&self, init: B, f: impl FnMut(B, char) -> B) -> B {
        self.chars().fold(init, f)
    }

    /// Strict right-to-left fold over the codepoints.
    pub fn fold_back<B>(&self, init: B, f: impl FnMut(B, char) -> B) -> B {
        self.chars_back().fold(init, f)
    }

    /// [`Text::fold`] with the codepoint index supplied.
    pub fn fold_indexed<B>(&self, init: B, mut f: impl FnMut(B, usize, char) -> B) -> B {
        self.chars()
            .enumerate()
            .fold(init, |acc, (i, ch)| f(acc, i, ch))
    }

    /// [`Text::fold_back`] with the absolute codepoint index supplied.
    ///
    /// Counts codepoints first, so this is two passes where
    /// [`Text::fold_back`] is one.
    pub fn fold_back_indexed<B>(&self, init: B, mut f: impl FnMut(B, usize, char) -> B) -> B {
        let count = self.char_count();
        self.chars_back()
            .enumerate()
            .fold(init, |acc, (i, ch)| f(acc, count - 1 - i, ch))
    }

    /// Packs a scalar sequence into a text, sizing the buffer at four
    /// bytes per character of the iterator's lower size hint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_text::Text;
    /// let t = Text::pack("héllo".chars());
    /// assert_eq!(t.as_str(), "héllo");
    /// ```
    pub fn pack(items: impl IntoIterator<Item = char>) -> Text {
        let items = items.into_iter();
        let guess = items.size_hint().0.max(1);
        Self::pack_n(guess, items)
    }

    /// [`Text::pack`] with an explicit character-count hint used to size
    /// the initial buffer (four bytes per expected character).
    pub fn pack_n(n: usize, items: impl IntoIterator<Item = char>) -> Text {
        let mut builder = Builder::with_capacity(n.saturating_mul(4));
        let mut scratch = [0u8; 4];
        for ch in items {
            let end = codec::encode(ch, &mut scratch, 0);
            builder.extend_from_slice(&scratch[..end]);
        }
        // SAFETY: the buffer is a concatenation of encoded scalars.
        unsafe { Text::from_slice_unchecked(builder.freeze()) }
    }

    /// A lazy iterator over the codepoints.
    ///
    /// The iterator is a pure function of the frozen bytes: it carries
    /// its own position and never touches the text, so calling `chars`
    /// again always reproduces the identical sequence.
    pub fn chars(&self) -> Chars<'_> {
        Chars {
            bytes: self.as_bytes(),
            pos: 0,
        }
    }

    /// [`Text::chars`], from the back.
    pub fn chars_back(&self) -> CharsBack<'_> {
        let bytes = self.as_bytes();
        CharsBack {
            bytes,
            pos: bytes.len(),
        }
    }

    /// Counts occurrences of `needle`.
    ///
    /// Single-byte characters go through the flat byte scan; wider ones
    /// run a non-overlapping substring search.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_text::Text;
    /// assert_eq!(Text::from("banana").count('a'), 3);
    /// assert_eq!(Text::from("hi🎉🎉bye").count('🎉'), 2);
    /// ```
    pub fn count(&self, needle: char) -> usize {
        if needle.len_utf8() == 1 {
            self.0.count_byte(needle as u8)
        } else {
            self.as_str().matches(needle).count()
        }
    }

    /// The sum of per-codepoint display widths.
    ///
    /// Control characters contribute `-1` each; feed a control-free text
    /// if a meaningful total is required.
    pub fn display_width(&self) -> isize {
        self.chars().map(Self::char_width).sum()
    }

    /// The display width of one codepoint, `-1` for control characters.
    pub fn char_width(ch: char) -> isize {
        match ch.width() {
            Some(w) => w as isize,
            None => -1,
        }
    }

    /// A uniformly shuffled copy, drawing indices from `src`.
    ///
    /// Round-trips through the scalar sequence and the generic slice
    /// shuffle; the multiset of codepoints is preserved.
    pub fn shuffle(&self, src: &mut impl IndexSource) -> Text {
        let scalars: Slice<char> = self.chars().collect();
        Text::pack_n(scalars.len(), strand_vector::shuffle(&scalars, src))
    }

    /// Lazily enumerates all `n!` codepoint orderings, one text each.
    pub fn permutations(&self) -> impl Iterator<Item = Text> {
        let scalars: Slice<char> = self.chars().collect();
        let n = scalars.len();
        strand_vector::permutations(&scalars).map(move |p| Text::pack_n(n, p))
    }

    /// The concatenation of `self` and `other`.
    ///
    /// Inherits the slice append law: appending the empty text returns
    /// the other operand as-is, sharing its array.
    pub fn append(&self, other: &Text) -> Text {
        // SAFETY: the concatenation of two valid UTF-8 sequences is valid.
        unsafe { Text::from_slice_unchecked(self.0.append(&other.0)) }
    }

    /// Drives one two-phase transformation through `engine`: compute the
    /// required length, allocate exactly that, fill once, freeze.
    fn transform_with(&self, engine: &impl TransformEngine, op: TransformOp) -> Text {
        let n = engine.compute_len(self.as_bytes(), op);
        let out = build_exact(n, |dest: &mut [u8]| {
            let written = engine.fill(self.as_bytes(), dest, op);
            assert!(
                written == n,
                "transform engine filled {written} bytes of a {n}-byte reservation"
            );
        });
        debug_assert!(codec::utf8_validate(out.as_slice()));
        // SAFETY: engines transform valid text to valid text; the debug
        // assertion above backstops a misbehaving engine in test builds.
        unsafe { Text::from_slice_unchecked(out) }
    }

    /// Normalizes to the given form, through `engine`.
    pub fn normalize_with(&self, engine: &impl TransformEngine, mode: NormalizationMode) -> Text {
        self.transform_with(engine, TransformOp::Normalize(mode))
    }

    /// Normalizes to the given form with the default engine.
    pub fn normalize(&self, mode: NormalizationMode) -> Text {
        self.normalize_with(&StdEngine, mode)
    }

    /// Case-folds for caseless comparison, through `engine`.
    pub fn case_fold_with(&self, engine: &impl TransformEngine) -> Text {
        self.transform_with(engine, TransformOp::CaseFold)
    }

    /// Case-folds with the default engine.
    pub fn case_fold(&self) -> Text {
        self.case_fold_with(&StdEngine)
    }

    /// Lowercases under `locale`, through `engine`.
    pub fn to_lower_with(&self, engine: &impl TransformEngine, locale: Locale) -> Text {
        self.transform_with(engine, TransformOp::Lower(locale))
    }

    /// Lowercases under `locale` with the default engine.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_text::{Locale, Text};
    /// let t = Text::from("İstanbul");
    /// assert_ne!(t.to_lower(Locale::Default), t.to_lower(Locale::Turkish));
    /// ```
    pub fn to_lower(&self, locale: Locale) -> Text {
        self.to_lower_with(&StdEngine, locale)
    }

    /// Uppercases under `locale`, through `engine`.
    pub fn to_upper_with(&self, engine: &impl TransformEngine, locale: Locale) -> Text {
        self.transform_with(engine, TransformOp::Upper(locale))
    }

    /// Uppercases under `locale` with the default engine.
    pub fn to_upper(&self, locale: Locale) -> Text {
        self.to_upper_with(&StdEngine, locale)
    }

    /// Titlecases word-initially under `locale`, through `engine`.
    pub fn to_title_with(&self, engine: &impl TransformEngine, locale: Locale) -> Text {
        self.transform_with(engine, TransformOp::Title(locale))
    }

    /// Titlecases with the default engine.
    pub fn to_title(&self, locale: Locale) -> Text {
        self.to_title_with(&StdEngine, locale)
    }

    /// Collation order between two texts, through `engine`.
    pub fn collate_with(&self, engine: &impl TransformEngine, other: &Text) -> Ordering {
        engine.collate(self.as_bytes(), other.as_bytes())
    }

    /// Collation order with the default engine.
    pub fn collate(&self, other: &Text) -> Ordering {
        self.collate_with(&StdEngine, other)
    }

    /// Returns `true` if every codepoint matches `flags` (vacuously true
    /// for the empty text).
    pub fn is_category_with(&self, engine: &impl TransformEngine, flags: Category) -> bool {
        engine.matched_prefix_len(self.as_bytes(), flags) == self.byte_len()
    }

    /// [`Text::is_category_with`] with the default engine.
    pub fn is_category(&self, flags: Category) -> bool {
        self.is_category_with(&StdEngine, flags)
    }

    /// Splits into the longest matching prefix and the remainder, without
    /// copying: both halves are slices into this text's array.
    pub fn span_category_with(
        &self,
        engine: &impl TransformEngine,
        flags: Category,
    ) -> (Text, Text) {
        let matched = engine.matched_prefix_len(self.as_bytes(), flags);
        assert!(
            matched <= self.byte_len(),
            "engine reported prefix {matched} past the end {}",
            self.byte_len()
        );
        let (prefix, rest) = self.0.split_at(matched);
        // SAFETY: `matched` is a character boundary per the engine
        // contract, so both halves remain valid UTF-8.
        unsafe {
            (
                Text::from_slice_unchecked(prefix),
                Text::from_slice_unchecked(rest),
            )
        }
    }

    /// [`Text::span_category_with`] with the default engine.
    pub fn span_category(&self, flags: Category) -> (Text, Text) {
        self.span_category_with(&StdEngine, flags)
    }
}

/// The forward codepoint iterator; see [`Text::chars`].
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let (ch, width) = codec::decode_forward(self.bytes, self.pos)?;
        self.pos += width;
        Some(ch)
    }
}

/// The backward codepoint iterator; see [`Text::chars_back`].
#[derive(Debug, Clone)]
pub struct CharsBack<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Iterator for CharsBack<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let (ch, width) = codec::decode_backward(self.bytes, self.pos)?;
        self.pos -= width;
        Some(ch)
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::new()
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Text {
        // SAFETY: `str` is valid UTF-8 by construction.
        unsafe { Text::from_slice_unchecked(Slice::from(s.as_bytes())) }
    }
}

impl From<String> for Text {
    fn from(s: String) -> Text {
        // SAFETY: `String` is valid UTF-8 by construction.
        unsafe { Text::from_slice_unchecked(Slice::from_vec(s.into_bytes())) }
    }
}

impl FromIterator<char> for Text {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Text {
        Text::pack(iter)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Text {}

impl PartialOrd for Text {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Text {
    /// Byte-lexicographic order, which for UTF-8 coincides with scalar
    /// order. Collation order is a separate notion; see [`Text::collate`].
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl serde::Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Text::from(s))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validate_round_trip() {
        let bytes = Slice::from("héllo 🎉".as_bytes());
        let text = Text::validate(bytes.clone()).unwrap();
        assert!(text.bytes().same_array(&bytes));

        let repacked = Text::pack(text.chars());
        assert_eq!(repacked.as_bytes(), text.as_bytes());
    }

    #[test]
    fn validate_rejects_bad_bytes() {
        assert_eq!(
            Text::validate(Slice::from(&[0xe0, 0x80][..])),
            Err(TextError::InvalidUtf8)
        );
        assert_eq!(
            Text::validate_ascii(Slice::from("é".as_bytes())),
            Err(TextError::InvalidAscii)
        );
        assert!(Text::validate(Slice::new()).is_ok());
    }

    #[test]
    fn indexing() {
        let t = Text::from("abc");
        assert_eq!(t.get(1), Some('b'));
        assert_eq!(t.get(5), None);
        assert_eq!(t.get_back(0), Some('c'));
        assert_eq!(t.char_at(5), Err(TextError::IndexOutOfRange(5)));
        assert_eq!(Text::new().first_char(), Err(TextError::EmptyContainer));
        assert_eq!(t.last_char(), Ok('c'));
    }

    #[test]
    fn byte_index_sentinels() {
        let t = Text::from("aé🎉");
        assert_eq!(t.char_byte_index(0), 0);
        assert_eq!(t.char_byte_index(1), 1);
        assert_eq!(t.char_byte_index(2), 3);
        assert_eq!(t.char_byte_index(3), 7);
        // Past the count: end boundary.
        assert_eq!(t.char_byte_index(99), t.byte_len());

        assert_eq!(t.char_byte_index_back(0), 7);
        assert_eq!(t.char_byte_index_back(1), 3);
        // Past the count: start boundary.
        assert_eq!(t.char_byte_index_back(99), 0);
    }

    #[test]
    fn pack_unpack_inverse() {
        let scalars: Vec<char> = "héllo 🎉 wörld".chars().collect();
        let packed = Text::pack(scalars.iter().copied());
        assert_eq!(packed.chars().collect::<Vec<_>>(), scalars);
        assert_eq!(packed.char_count(), scalars.len());
    }

    #[test]
    fn chars_are_restartable() {
        let t = Text::from("aé🎉");
        let once: Vec<char> = t.chars().collect();
        let twice: Vec<char> = t.chars().collect();
        assert_eq!(once, twice);

        let mut back: Vec<char> = t.chars_back().collect();
        back.reverse();
        assert_eq!(back, once);
    }

    #[test]
    fn map_and_folds() {
        let t = Text::from("abc");
        assert_eq!(t.map(|c| c.to_ascii_uppercase()).as_str(), "ABC");
        assert_eq!(
            t.imap(|i, c| if i == 1 { '_' } else { c }).as_str(),
            "a_c"
        );

        // Widening map: ASCII to a 3-byte character forces regrowth past
        // the +3 margin.
        let wide = Text::from("aaaaaaaa").map(|_| '€');
        assert_eq!(wide.as_str(), "€€€€€€€€");

        assert_eq!(t.fold(String::new(), |mut acc, c| {
            acc.push(c);
            acc
        }), "abc");
        assert_eq!(t.fold_back(String::new(), |mut acc, c| {
            acc.push(c);
            acc
        }), "cba");
        assert_eq!(
            t.fold_indexed(Vec::new(), |mut acc, i, c| {
                acc.push((i, c));
                acc
            }),
            vec![(0, 'a'), (1, 'b'), (2, 'c')]
        );
        assert_eq!(
            t.fold_back_indexed(Vec::new(), |mut acc, i, c| {
                acc.push((i, c));
                acc
            }),
            vec![(2, 'c'), (1, 'b'), (0, 'a')]
        );
    }

    #[test]
    fn counting() {
        assert_eq!(Text::from("banana").count('a'), 3);
        assert_eq!(Text::from("hi🎉🎉bye").count('🎉'), 2);
        assert_eq!(Text::from("banana").count('z'), 0);
    }

    #[test]
    fn widths() {
        assert_eq!(Text::from("abc").display_width(), 3);
        // CJK is double width.
        assert_eq!(Text::from("漢").display_width(), 2);
        // Control characters contribute -1.
        assert_eq!(Text::from("a\u{7}").display_width(), 0);
    }

    #[test]
    fn append_law() {
        let t = Text::from("xy");
        let joined = Text::new().append(&t);
        assert!(joined.bytes().same_array(t.bytes()));
        assert_eq!(Text::from("ab").append(&t).as_str(), "abxy");
    }

    #[test]
    fn shuffle_is_a_permutation() {
        use rand::SeedableRng;

        let t = Text::from("héllo 🎉 wörld");
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let shuffled = t.shuffle(&mut rng);
        assert_eq!(shuffled.char_count(), t.char_count());

        let mut before: Vec<char> = t.chars().collect();
        let mut after: Vec<char> = shuffled.chars().collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn permutations_of_abc() {
        let perms: Vec<String> = Text::from("abc")
            .permutations()
            .map(|p| p.as_str().to_owned())
            .collect();
        assert_eq!(perms.len(), 6);
        let mut sorted = perms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 6);
    }

    #[test]
    fn span_category_is_zero_copy() {
        let t = Text::from("abc123");
        let (prefix, rest) = t.span_category(Category::LETTER);
        assert_eq!(prefix.as_str(), "abc");
        assert_eq!(rest.as_str(), "123");
        assert!(prefix.bytes().same_array(&t.bytes().slice(0..3)));
        assert!(t.is_category(Category::ALPHANUMERIC));
        assert!(Text::new().is_category(Category::LETTER));
    }

    #[test]
    fn locale_sensitive_casing() {
        let t = Text::from("İstanbul");
        assert_ne!(t.to_lower(Locale::Default), t.to_lower(Locale::Turkish));
        assert_eq!(t.to_lower(Locale::Turkish).as_str(), "istanbul");
    }

    #[test]
    fn collation_vs_byte_order() {
        let a = Text::from("a");
        let b = Text::from("B");
        // Byte order puts capitals first; collation folds case.
        assert!(b < a);
        assert_eq!(a.collate(&b), Ordering::Less);
    }

    /// An engine that reports one length and fills another.
    struct LyingEngine;

    impl TransformEngine for LyingEngine {
        fn compute_len(&self, bytes: &[u8], _op: TransformOp) -> usize {
            bytes.len() + 2
        }

        fn fill(&self, bytes: &[u8], dest: &mut [u8], _op: TransformOp) -> usize {
            dest[..bytes.len()].copy_from_slice(bytes);
            bytes.len()
        }

        fn collate(&self, a: &[u8], b: &[u8]) -> Ordering {
            a.cmp(b)
        }

        fn matched_prefix_len(&self, _bytes: &[u8], _flags: Category) -> usize {
            0
        }
    }

    #[test]
    #[should_panic(expected = "reservation")]
    fn broken_engine_contract_panics() {
        Text::from("ab").to_lower_with(&LyingEngine, Locale::Default);
    }

    #[test]
    fn serde_round_trip() {
        let t = Text::from("héllo");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"héllo\"");
        let back: Text = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
