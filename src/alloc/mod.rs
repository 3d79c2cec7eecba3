//! Allocation strategies, which supply collections with raw, uninitialized storage.
//!
//! An [`Allocator`] only deals in storage. It hands out room for `count` values of a type and
//! takes it back later. It also provides the hooks that place a value into a slot and destroy
//! it again, but it never decides *when* a value is live. That bookkeeping belongs to the
//! collection which owns the storage.
//!
//! Two strategies are provided:
//! - [`Global`], backed by Rust's global allocator.
//! - `Malloc` (feature `malloc`, unix only), backed by the C heap through `libc`. This lets a
//!   preloaded C allocator such as jemalloc serve a collection's storage directly.

mod global;
#[cfg(all(feature = "malloc", unix))]
mod malloc;

use std::ptr::{self, NonNull};

pub use global::*;
#[cfg(all(feature = "malloc", unix))]
pub use malloc::*;

use crate::util::error::AllocationFailure;

/// A strategy for obtaining and releasing raw storage for values of any type.
///
/// Collections call [`allocate`](Allocator::allocate) and [`deallocate`](Allocator::deallocate)
/// in matching pairs, and bracket each value's lifetime with [`construct`](Allocator::construct)
/// and [`destroy`](Allocator::destroy). Collections never request storage for zero elements or
/// for zero-sized types, so implementations don't need to handle either case.
///
/// # Safety
/// Implementors must guarantee that a pointer returned by `allocate::<T>(count)` is non-null,
/// aligned for `T` and valid for reads and writes of `count` values of `T` until it is passed back
/// to `deallocate` with the same `count`. Distinct live allocations must not overlap.
pub unsafe trait Allocator {
    /// Obtains uninitialized storage for `count` values of `T`.
    ///
    /// # Errors
    /// Returns [`AllocationFailure::CapacityOverflow`] if the layout of `count` values would exceed
    /// [`isize::MAX`] bytes and [`AllocationFailure::OutOfMemory`] if the request was refused.
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocationFailure>;

    /// Releases storage previously obtained from this allocator.
    ///
    /// # Safety
    /// `ptr` must have been returned by `self.allocate::<T>(count)` with exactly this `count`, and
    /// must not have been deallocated since. Any values still in the storage are not dropped.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize);

    /// Moves `value` into the slot at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for writes and properly aligned. Any value already in the slot is
    /// overwritten without being dropped.
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: The caller guarantees that ptr is valid for writes and aligned.
        unsafe { ptr.write(value) }
    }

    /// Constructs a value in the slot at `ptr` from the result of `make`. If `make` panics, the
    /// slot is left untouched and unconstructed.
    ///
    /// # Safety
    /// See [`construct`](Allocator::construct).
    unsafe fn construct_with<T, F: FnOnce() -> T>(&self, ptr: NonNull<T>, make: F) {
        let value = make();
        // SAFETY: The caller upholds the requirements of construct.
        unsafe { self.construct(ptr, value) }
    }

    /// Runs the destructor of the value at `ptr` without releasing the storage.
    ///
    /// # Safety
    /// `ptr` must point to a live, properly aligned value of `T` which isn't used again until a
    /// new value is constructed in its place.
    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        // SAFETY: The caller guarantees that the slot holds a live value which won't be reused.
        unsafe { ptr::drop_in_place(ptr.as_ptr()) }
    }
}
