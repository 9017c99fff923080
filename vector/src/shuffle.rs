//! Fisher–Yates shuffling and Heap's-algorithm permutation enumeration
//! over slices.
//!
//! Randomness comes in through [`IndexSource`], an opaque, strictly
//! sequential capability. A source shared across concurrent shuffles needs
//! caller-side synchronization; this module does not provide any.

use crate::Slice;

/// A supplier of uniformly distributed indices.
///
/// `draw_uniform(bound)` returns a value in `[0, bound)`. A shuffle of `n`
/// elements draws exactly `n - 1` times, following the standard
/// Fisher–Yates recurrence.
pub trait IndexSource {
    fn draw_uniform(&mut self, bound: usize) -> usize;
}

/// Any `rand` generator is an index source.
impl<R: rand::Rng> IndexSource for R {
    fn draw_uniform(&mut self, bound: usize) -> usize {
        self.random_range(0..bound)
    }
}

/// A uniformly shuffled copy of `slice`.
///
/// The input is never mutated; the result is a freshly frozen slice.
pub fn shuffle<T: Clone>(slice: &Slice<T>, src: &mut impl IndexSource) -> Slice<T> {
    let mut items = slice.as_slice().to_vec();
    for i in (1..items.len()).rev() {
        let j = src.draw_uniform(i + 1);
        items.swap(i, j);
    }
    Slice::from_vec(items)
}

/// Lazily enumerates all `n!` orderings of `slice`, one freshly frozen
/// slice per permutation, using Heap's algorithm.
///
/// # Examples
///
/// ```rust
/// # use strand_vector::{permutations, Slice};
/// let perms: Vec<_> = permutations(&Slice::from_iter([1, 2, 3])).collect();
/// assert_eq!(perms.len(), 6);
/// ```
pub fn permutations<T: Clone>(slice: &Slice<T>) -> Permutations<T> {
    Permutations {
        items: slice.as_slice().to_vec(),
        counters: vec![0; slice.len()],
        level: 0,
        started: false,
    }
}

/// The iterator returned by [`permutations`].
pub struct Permutations<T> {
    items: Vec<T>,
    counters: Vec<usize>,
    level: usize,
    started: bool,
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Slice<T>;

    fn next(&mut self) -> Option<Slice<T>> {
        if !self.started {
            self.started = true;
            // The identity ordering counts: 0! = 1! = 1.
            return Some(Slice::from_vec(self.items.clone()));
        }
        while self.level < self.items.len() {
            if self.counters[self.level] < self.level {
                if self.level % 2 == 0 {
                    self.items.swap(0, self.level);
                } else {
                    let c = self.counters[self.level];
                    self.items.swap(c, self.level);
                }
                self.counters[self.level] += 1;
                self.level = 0;
                return Some(Slice::from_vec(self.items.clone()));
            } else {
                self.counters[self.level] = 0;
                self.level += 1;
            }
        }
        None
    }
}
