//! The growable buffer builder: the exclusively-owned, pre-freeze side of
//! the storage lifecycle.
//!
//! A [`Builder`] is created with a capacity guess, grows by doubling when
//! the write cursor would overflow (copying the written prefix, for a
//! total copy cost of O(n) over n insertions), is shrunk to its true final
//! length, and is consumed by [`Builder::freeze`], producing exactly one
//! [`Slice`]. Its exclusive ownership over the whole building phase is a
//! correctness requirement: growth reallocation assumes no concurrent
//! reader.
//!
//! The free functions cover the allocation patterns used throughout the
//! text layer: exact-size fills, bounded fills, shrinkable fills, and
//! element-at-a-time packing in either direction.

use crate::Slice;

/// Smallest capacity a growing builder jumps to. Doubling from a guess of
/// zero would go nowhere.
const MIN_GROWTH: usize = 4;

/// An exclusively owned, growable buffer with a write cursor, consumed by
/// [`Builder::freeze`].
///
/// # Examples
///
/// ```rust
/// # use strand_vector::Builder;
/// let mut b = Builder::with_capacity(2);
/// b.push(1);
/// b.push(2);
/// b.push(3); // doubles
/// assert_eq!(b.freeze().as_slice(), &[1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct Builder<T> {
    data: Vec<T>,
}

impl<T> Builder<T> {
    /// Creates a builder with the given capacity guess.
    pub fn with_capacity(capacity: usize) -> Self {
        Builder {
            data: Vec::with_capacity(capacity),
        }
    }

    /// The write cursor: how many elements have been written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The current capacity.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Doubles capacity until at least `extra` more elements fit.
    fn grow(&mut self, extra: usize) {
        let needed = self.data.len() + extra;
        let mut new_cap = (self.data.capacity() * 2).max(MIN_GROWTH);
        while new_cap < needed {
            new_cap *= 2;
        }
        self.data.reserve_exact(new_cap - self.data.len());
    }

    /// Appends one element, doubling capacity on overflow.
    pub fn push(&mut self, elt: T) {
        if self.data.len() == self.data.capacity() {
            self.grow(1);
        }
        self.data.push(elt);
    }

    /// Shrinks to the written length and freezes into a [`Slice`].
    ///
    /// This is the only way out of the building state, and it is one-way:
    /// the frozen array is never mutated again. An empty builder freezes
    /// to the shared empty slice without allocating.
    pub fn freeze(mut self) -> Slice<T> {
        self.data.shrink_to_fit();
        Slice::from_vec(self.data)
    }
}

impl<T: Clone> Builder<T> {
    /// Appends a run of elements, doubling capacity as needed.
    pub fn extend_from_slice(&mut self, elts: &[T]) {
        if self.data.len() + elts.len() > self.data.capacity() {
            self.grow(elts.len());
        }
        self.data.extend_from_slice(elts);
    }
}

/// Allocates exactly `n` elements, hands `fill` exclusive write access
/// over the whole range, and freezes at length `n`.
///
/// For when the final length is known exactly up front (the fill half of
/// the two-phase transformation protocol, concatenation into a pre-sized
/// array, and so on).
pub fn build_exact<T: Clone + Default>(n: usize, fill: impl FnOnce(&mut [T])) -> Slice<T> {
    if n == 0 {
        return Slice::new();
    }
    let mut data = vec![T::default(); n];
    fill(&mut data);
    Slice::from_vec(data)
}

/// Allocates `n` elements of capacity and lets `fill` grow or shrink the
/// buffer freely; the buffer's final length is the result's length.
pub fn build_shrinkable<T>(n: usize, fill: impl FnOnce(&mut Vec<T>)) -> Slice<T> {
    let mut data = Vec::with_capacity(n);
    fill(&mut data);
    data.shrink_to_fit();
    Slice::from_vec(data)
}

/// Like [`build_exact`], but `fill` reports the length actually used,
/// which must not exceed `n_max`.
///
/// # Panics
///
/// Panics if `fill` reports a length greater than `n_max`. That is a
/// broken collaborator contract, not a user error, and is never surfaced
/// as a recoverable result.
pub fn build_bounded<T: Clone + Default>(
    n_max: usize,
    fill: impl FnOnce(&mut [T]) -> usize,
) -> Slice<T> {
    let mut data = vec![T::default(); n_max];
    let used = fill(&mut data);
    assert!(
        used <= n_max,
        "collaborator reported length {used} over capacity {n_max}"
    );
    data.truncate(used);
    data.shrink_to_fit();
    Slice::from_vec(data)
}

/// Folds `items` into a frozen slice, starting from a guessed capacity and
/// doubling on overflow.
///
/// Total copy work across all reallocations is O(n) by the standard
/// doubling argument. An empty input yields the shared empty slice with no
/// allocation.
pub fn pack_sequence<T>(initial_guess: usize, items: impl IntoIterator<Item = T>) -> Slice<T> {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Slice::new();
    }
    let mut builder = Builder::with_capacity(initial_guess.max(1));
    for item in items {
        builder.push(item);
    }
    builder.freeze()
}

/// The mirror of [`pack_sequence`]: writes from the high end backward, for
/// producers that emit their output in reverse order.
///
/// Growth copies the written suffix to the high end of the doubled buffer,
/// and the freeze slices off the written suffix, so there is no final
/// reversal pass.
pub fn pack_sequence_rev<T: Clone + Default>(
    initial_guess: usize,
    items: impl IntoIterator<Item = T>,
) -> Slice<T> {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Slice::new();
    }
    let mut data = vec![T::default(); initial_guess.max(MIN_GROWTH)];
    let mut cursor = data.len();
    for item in items {
        if cursor == 0 {
            let old_len = data.len();
            let mut grown = vec![T::default(); old_len * 2];
            grown[old_len..].clone_from_slice(&data);
            data = grown;
            cursor = old_len;
        }
        cursor -= 1;
        data[cursor] = item;
    }
    let len = data.len();
    Slice::from_vec(data).slice(cursor..len)
}
