//! The byte-level UTF-8 scalar codec.
//!
//! This is the narrow seam the text layer decodes and encodes through. The
//! decoding functions assume their input already sits behind the [`Text`]
//! validity invariant; validation itself is a separate, single O(n) pass
//! ([`utf8_validate`]) which rejects overlong encodings, lone surrogates,
//! and scalar values above U+10FFFF.
//!
//! [`Text`]: crate::Text

/// Decodes the scalar starting at byte offset `pos`, returning it together
/// with the number of bytes it occupies.
///
/// Returns `None` when `pos` is at or past the end of the input. `pos`
/// must be a character boundary in validated input.
pub fn decode_forward(bytes: &[u8], pos: usize) -> Option<(char, usize)> {
    let first = *bytes.get(pos)?;
    let (width, mut scalar) = match first {
        0x00..=0x7f => return Some((first as char, 1)),
        0xc0..=0xdf => (2, u32::from(first & 0x1f)),
        0xe0..=0xef => (3, u32::from(first & 0x0f)),
        _ => (4, u32::from(first & 0x07)),
    };
    debug_assert!(pos + width <= bytes.len(), "truncated sequence in validated input");
    for &cont in &bytes[pos + 1..pos + width] {
        debug_assert_eq!(cont & 0xc0, 0x80, "bad continuation byte in validated input");
        scalar = (scalar << 6) | u32::from(cont & 0x3f);
    }
    let ch = char::from_u32(scalar).expect("codec: invalid scalar in validated input");
    Some((ch, width))
}

/// Decodes the scalar that ends at byte offset `pos`, scanning backward
/// over at most three continuation bytes.
///
/// Returns `None` when `pos` is zero. `pos` must be a character boundary
/// in validated input.
pub fn decode_backward(bytes: &[u8], pos: usize) -> Option<(char, usize)> {
    if pos == 0 {
        return None;
    }
    let mut start = pos - 1;
    while bytes[start] & 0xc0 == 0x80 {
        debug_assert!(pos - start < 4, "overlong backward scan in validated input");
        start -= 1;
    }
    decode_forward(bytes, start)
}

/// Encodes `ch` into `dest` starting at `pos`, writing 1–4 bytes.
/// Returns the position just past the written bytes.
///
/// # Panics
///
/// Panics if fewer than `ch.len_utf8()` bytes remain in `dest`.
pub fn encode(ch: char, dest: &mut [u8], pos: usize) -> usize {
    let written = ch.encode_utf8(&mut dest[pos..]).len();
    pos + written
}

/// One O(n) pass deciding whether `bytes` is valid UTF-8.
///
/// Delegates to the standard library's validator, which rejects overlong
/// encodings, lone surrogates, and scalars above U+10FFFF.
pub fn utf8_validate(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok()
}

/// One O(n) pass deciding whether `bytes` is pure single-byte ASCII.
pub fn ascii_validate(bytes: &[u8]) -> bool {
    bytes.is_ascii()
}
