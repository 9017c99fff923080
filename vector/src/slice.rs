use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::{Index, Range};
use std::sync::Arc;

/// An `(array, offset, length)` view over shared, frozen storage.
///
/// A `Slice` is created by freezing a [`crate::Builder`], by re-slicing an
/// existing `Slice` (which is O(1) and never allocates), or by an explicit
/// copy. Many slices may alias the same backing array; the array stays
/// alive as long as any of them does, and nothing ever mutates it once it
/// is frozen, which is what makes the sharing safe.
///
/// The empty slice is represented without any backing array at all, so
/// empty results never allocate.
#[derive(Debug)]
pub struct Slice<T> {
    buf: Option<Arc<Vec<T>>>,
    start: usize,
    len: usize,
}

impl<T> Clone for Slice<T> {
    fn clone(&self) -> Self {
        Slice {
            buf: self.buf.clone(),
            start: self.start,
            len: self.len,
        }
    }
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slice<T> {
    /// The shared empty slice. Never allocates.
    pub fn new() -> Self {
        Slice {
            buf: None,
            start: 0,
            len: 0,
        }
    }

    /// Freezes a `Vec` into a slice covering all of it.
    ///
    /// An empty vec produces the empty slice and drops the vec's
    /// allocation (if any) on the spot.
    pub fn from_vec(vec: Vec<T>) -> Self {
        if vec.is_empty() {
            Slice::new()
        } else {
            let len = vec.len();
            Slice {
                buf: Some(Arc::new(vec)),
                start: 0,
                len,
            }
        }
    }

    /// The number of elements in this slice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_vector::Slice;
    /// let s = Slice::from_iter([0, 1, 2, 3, 4, 5]);
    /// assert_eq!(s.len(), 6);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the length is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_vector::Slice;
    /// assert!(Slice::<i32>::new().is_empty());
    /// assert!(!Slice::from_iter([1]).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A contiguous view of the elements.
    pub fn as_slice(&self) -> &[T] {
        match &self.buf {
            Some(buf) => &buf[self.start..self.start + self.len],
            None => &[],
        }
    }

    /// Gets an element at a given index, or `None` if `idx` is
    /// out-of-bounds.
    ///
    /// This is the primary indexing contract; the [`Index`] impl is a
    /// panicking wrapper around it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_vector::Slice;
    /// let s = Slice::from_iter([0, 1, 2]);
    /// assert_eq!(s.get(2), Some(&2));
    /// assert_eq!(s.get(3), None);
    /// ```
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.as_slice().get(idx)
    }

    /// The first element, or `None` if empty.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The last element, or `None` if empty.
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns an iterator over references to the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// The subslice covering `range`, sharing this slice's backing array.
    ///
    /// O(1); never copies. Panics if the range is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_vector::Slice;
    /// let s = Slice::from_iter([0, 1, 2, 3, 4, 5]);
    /// let mid = s.slice(1..5);
    /// assert_eq!(mid.as_slice(), &[1, 2, 3, 4]);
    /// assert!(mid.same_array(&s));
    /// ```
    pub fn slice(&self, range: Range<usize>) -> Slice<T> {
        assert!(range.start <= range.end);
        assert!(range.end <= self.len);
        if range.start == range.end {
            // Zero-length slices normalize to the empty representation,
            // releasing the parent array.
            return Slice::new();
        }
        Slice {
            buf: self.buf.clone(),
            start: self.start + range.start,
            len: range.end - range.start,
        }
    }

    /// Splits into `(self[..at], self[at..])` without copying.
    pub fn split_at(&self, at: usize) -> (Slice<T>, Slice<T>) {
        (self.slice(0..at), self.slice(at..self.len))
    }

    /// Returns `true` if both slices share the same backing array,
    /// whatever range of it they cover. This is the identity predicate
    /// tests use to check zero-copy behavior: a subslice of `s` has the
    /// same array as `s`.
    ///
    /// Two empty slices always have the same (absent) array; note that
    /// zero-length subslices normalize to the empty representation and so
    /// detach from their parent's array.
    pub fn same_array(&self, other: &Slice<T>) -> bool {
        match (&self.buf, &other.buf) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Same array, same offset, same length: the two slices are one view.
    fn same_view(&self, other: &Slice<T>) -> bool {
        self.same_array(other) && self.start == other.start && self.len == other.len
    }

    /// The index of the first element equal to `needle`, if any.
    pub fn elem_index(&self, needle: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|x| x == needle)
    }
}

impl<T: Clone> Slice<T> {
    /// The concatenation of `self` and `other`.
    ///
    /// If either operand is empty the other is returned as-is, sharing its
    /// array; otherwise a single fresh array of exactly the combined
    /// length is filled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strand_vector::Slice;
    /// let a = Slice::from_iter([1, 2]);
    /// let b = Slice::from_iter([3]);
    /// assert_eq!(a.append(&b).as_slice(), &[1, 2, 3]);
    /// assert!(Slice::new().append(&b).same_array(&b));
    /// ```
    pub fn append(&self, other: &Slice<T>) -> Slice<T> {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut builder = crate::Builder::with_capacity(self.len + other.len);
        builder.extend_from_slice(self.as_slice());
        builder.extend_from_slice(other.as_slice());
        builder.freeze()
    }

    /// An explicit deep copy: allocates a fresh array of exactly
    /// `self.len()` elements and duplicates them.
    pub fn to_copied(&self) -> Slice<T> {
        Slice::from_vec(self.as_slice().to_vec())
    }

    /// Concatenates a list of slices into one.
    ///
    /// A pre-scan computes the total length and skips empty inputs without
    /// copying; if exactly one non-empty input remains it is returned
    /// directly, sharing its array.
    pub fn concat(parts: &[Slice<T>]) -> Slice<T> {
        let total: usize = parts.iter().map(Slice::len).sum();
        if total == 0 {
            return Slice::new();
        }
        let mut non_empty = parts.iter().filter(|p| !p.is_empty());
        // Unwrap: total > 0, so at least one part is non-empty.
        let head = non_empty.next().unwrap();
        if head.len == total {
            return head.clone();
        }
        let mut builder = crate::Builder::with_capacity(total);
        builder.extend_from_slice(head.as_slice());
        for part in non_empty {
            builder.extend_from_slice(part.as_slice());
        }
        builder.freeze()
    }

    /// Like [`Slice::concat`], but the inputs are laid out in reverse
    /// order.
    pub fn concat_r(parts: &[Slice<T>]) -> Slice<T> {
        let total: usize = parts.iter().map(Slice::len).sum();
        if total == 0 {
            return Slice::new();
        }
        let mut non_empty = parts.iter().rev().filter(|p| !p.is_empty());
        // Unwrap: total > 0, so at least one part is non-empty.
        let head = non_empty.next().unwrap();
        if head.len == total {
            return head.clone();
        }
        let mut builder = crate::Builder::with_capacity(total);
        builder.extend_from_slice(head.as_slice());
        for part in non_empty {
            builder.extend_from_slice(part.as_slice());
        }
        builder.freeze()
    }
}

impl<T: PartialEq> PartialEq for Slice<T> {
    fn eq(&self, other: &Self) -> bool {
        // Same array, same range: equal without looking at elements.
        self.same_view(other) || self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Slice<T> {}

impl<T: PartialOrd> PartialOrd for Slice<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Slice<T> {
    /// Element-wise lexicographic order; length breaks the tie when one
    /// slice is a prefix of the other. For `Slice<u8>` the underlying
    /// slice comparison is a block compare.
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

/// The generic, element-wise hash. `Slice<u8>` additionally has a
/// dedicated content hash ([`Slice::fnv1a`]) which deliberately belongs to
/// a different hash family; the two must not be mixed.
impl<T: Hash> Hash for Slice<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Index<usize> for Slice<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("index out of bounds")
    }
}

impl<T> FromIterator<T> for Slice<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Slice::from_vec(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for Slice<T> {
    fn from(vec: Vec<T>) -> Self {
        Slice::from_vec(vec)
    }
}

impl<T: Clone> From<&[T]> for Slice<T> {
    fn from(slice: &[T]) -> Self {
        Slice::from_vec(slice.to_vec())
    }
}

impl<'a, T> IntoIterator for &'a Slice<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// An owning iterator over a slice's elements, cloning each one out of the
/// shared array.
pub struct IntoIter<T> {
    slice: Slice<T>,
    front: usize,
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.slice.get(self.front).cloned()?;
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.slice.len() - self.front;
        (rest, Some(rest))
    }
}

impl<T: Clone> IntoIterator for Slice<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slice: self,
            front: 0,
        }
    }
}

impl<T: serde::Serialize> serde::Serialize for Slice<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elt in self.iter() {
            seq.serialize_element(elt)?;
        }
        seq.end()
    }
}

impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Slice<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let vec: Vec<T> = Vec::deserialize(deserializer)?;
        Ok(Slice::from_vec(vec))
    }
}
