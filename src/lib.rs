//! A growable, contiguous array with hand-managed storage and a pluggable allocation strategy.
//!
//! # Purpose
//! [`Vector`](collections::contiguous::Vector) is written from scratch on top of raw, typed
//! allocations rather than on top of [`Vec`]. It owns a buffer of `cap` slots of which the first
//! `len` hold live values, and it is responsible for constructing, moving and destroying every one
//! of those values correctly through growth, insertion, removal, cloning and teardown.
//!
//! # Layers
//! - [`alloc`]: the [`Allocator`](alloc::Allocator) strategy. It hands out and takes back raw
//!   storage for `n` values of `T` and knows nothing about element lifetimes.
//!   [`Global`](alloc::Global) wraps [`std::alloc`], and `Malloc` (feature `malloc`) wraps the C
//!   heap through `libc`.
//! - [`collections::contiguous`]: the storage engine. A private `RawBuf` owns the allocation and
//!   the allocator, and [`Vector`](collections::contiguous::Vector) tracks which slots are live.
//! - Iteration and comparison come from the contiguous layout. `Vector` derefs to a slice, so
//!   forward and reverse iteration, sorting and filling are the slice's. Equality and ordering
//!   are lexicographic over the live elements.
//!
//! # Error Handling
//! It is more ergonomic for a collection to panic in some cases, because users don't want to be
//! forced to handle an error every time they push a value. Every fallible operation therefore
//! comes in two forms: a panicking one (`push`, `insert`, `reserve`, ...) and a `try_` form that
//! returns a strongly typed error from [`error`]. Errors are enums and structs that implement
//! [`Error`](std::error::Error), using static dispatch rather than boxed trait objects.
//!
//! In both forms, a failed allocation leaves the Vector exactly as it was.
//!
//! # Logging
//! Reallocations are reported through the [`log`] facade at `trace` level. Lossy capacity
//! adjustments and allocator refusals are reported at `debug` level. The crate never installs a
//! logger itself.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
pub mod collections;

pub(crate) mod util;

/// Error types produced by allocation strategies and collections.
pub mod error {
    #[doc(inline)]
    pub use crate::util::error::{
        AllocationFailure, CapacityOverflow, IndexOutOfBounds, InsertError, OutOfMemory,
        PositionOutOfBounds,
    };
}
