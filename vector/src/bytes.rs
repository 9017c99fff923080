//! Flat-layout fast paths for byte slices.
//!
//! `Slice<u8>` is the byte vector: it backs `strand-text`'s `Text` and is
//! also used standalone. Its elements are laid out as raw contiguous
//! memory, so comparison already lowers to a block compare through the
//! generic `Ord` impl; this module adds the operations that only make
//! sense for the flat kind.

use crate::Slice;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl Slice<u8> {
    /// The dedicated byte-content hash: FNV-1a over the raw bytes.
    ///
    /// This is deliberately a different hash family from the generic
    /// element-wise [`std::hash::Hash`] impl on `Slice<T>`. The two
    /// produce different values for what may look like the same content;
    /// callers must pick one family and stay in it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_vector::Slice;
    /// let a = Slice::from(&b"hello"[..]);
    /// let b = Slice::from(&b"hello"[..]);
    /// assert_eq!(a.fnv1a(), b.fnv1a());
    /// ```
    pub fn fnv1a(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        for &byte in self.as_slice() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    /// The index of the first occurrence of `needle`, scanning the
    /// contiguous byte view directly.
    ///
    /// This is the flat-kind fast path behind the generic
    /// [`Slice::elem_index`].
    pub fn find_byte(&self, needle: u8) -> Option<usize> {
        self.as_slice().iter().position(|&b| b == needle)
    }

    /// Counts occurrences of a single byte.
    pub fn count_byte(&self, needle: u8) -> usize {
        self.as_slice().iter().filter(|&&b| b == needle).count()
    }
}
