//! This crate provides the contiguous-storage primitives that Strand's text
//! layer is built on.
//!
//! [`Slice`] is an `(array, offset, length)` view over shared, frozen
//! storage: cheap to clone, O(1) to re-slice, and never mutated once
//! frozen. [`Builder`] is the exclusively-owned, pre-freeze counterpart; it
//! grows by doubling and is consumed by `freeze`, producing exactly one
//! [`Slice`]. The [`shuffle`] module holds the generic Fisher–Yates shuffle
//! and Heap's-algorithm permutation enumeration over slices.
//!
//! Byte slices (`Slice<u8>`) get a handful of flat-layout fast paths; see
//! the inherent impl in [`bytes`].

// Not yet implemented (do we need them?)
// - chunked (non-contiguous) storage
// - in-place mutation of frozen arrays (there deliberately is none)

pub mod buffer;
pub mod bytes;
pub mod shuffle;
pub mod slice;

pub use buffer::{
    build_bounded, build_exact, build_shrinkable, pack_sequence, pack_sequence_rev, Builder,
};
pub use shuffle::{permutations, shuffle, IndexSource, Permutations};
pub use slice::Slice;
