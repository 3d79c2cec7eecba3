//! Collection types built on the allocation strategies in [`alloc`](crate::alloc).
//!
//! # Method
//! Applicable types here implement [`Deref<Target = [T]>`](std::ops::Deref) (and DerefMut), which
//! saves rewriting the slice's read-only and in-place functionality: iteration in both directions,
//! searching, sorting, filling and unchecked indexing all come from there.

pub mod contiguous;
