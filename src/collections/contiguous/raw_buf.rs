use std::any;
use std::cmp;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::alloc::Allocator;
use crate::util::error::AllocationFailure;

/// An owned allocation with room for `cap` values of `T`, together with the [`Allocator`] it was
/// obtained from.
///
/// RawBuf doesn't know which of its slots hold live values. Dropping it releases the storage
/// without running any destructors, so the owning collection must destroy its live values first.
///
/// A RawBuf with `cap == 0`, or one holding a zero-sized type, never owns an allocation. Its
/// pointer is dangling and is never passed to the allocator.
pub(crate) struct RawBuf<T, A: Allocator> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T, A: Allocator> RawBuf<T, A> {
    pub(crate) const fn new_in(alloc: A) -> RawBuf<T, A> {
        RawBuf {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a RawBuf with exactly `cap` uninitialized slots.
    ///
    /// # Errors
    /// Returns an [`AllocationFailure`] if the storage couldn't be obtained.
    pub(crate) fn try_with_cap_in(cap: usize, alloc: A) -> Result<RawBuf<T, A>, AllocationFailure> {
        let ptr = Self::make_ptr(&alloc, cap)?;
        Ok(RawBuf {
            ptr,
            cap,
            alloc,
            _phantom: PhantomData,
        })
    }

    /// Returns true if this RawBuf currently owns memory obtained from its allocator.
    pub(crate) const fn is_allocated(&self) -> bool {
        self.cap != 0 && size_of::<T>() != 0
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// # Safety
    /// `index` must be `<= cap`, keeping the offset within (or one past the end of) the allocation.
    pub(crate) const unsafe fn slot(&self, index: usize) -> NonNull<T> {
        // SAFETY: The caller guarantees that the offset stays within the allocation.
        unsafe { self.ptr.add(index) }
    }

    /// Moves the buffer onto a fresh allocation of `new_cap` slots, carrying the first `len` values
    /// across in order. If `new_cap < len`, `len` is reduced to `new_cap` and the values at
    /// `new_cap..len` are destroyed once the new buffer is in place.
    ///
    /// The new storage is obtained before anything else is touched, so on failure the buffer and
    /// all of its values are exactly as they were. If a destructor panics, the remaining
    /// truncated values are leaked but the old storage is still released.
    ///
    /// # Errors
    /// Returns an [`AllocationFailure`] if the new storage couldn't be obtained.
    ///
    /// # Safety
    /// `*len` must be `<= cap` and the slots `0..*len` must hold live values.
    pub(crate) unsafe fn try_realloc(
        &mut self,
        new_cap: usize,
        len: &mut usize,
    ) -> Result<(), AllocationFailure> {
        if new_cap == self.cap {
            return Ok(());
        }

        log::trace!(
            "reallocating buffer of {} from {} to {} slots",
            any::type_name::<T>(),
            self.cap,
            new_cap
        );

        let new_ptr = Self::make_ptr(&self.alloc, new_cap)?;
        let kept = cmp::min(*len, new_cap);

        if size_of::<T>() != 0 {
            // SAFETY: Both allocations are valid for kept values, which is <= both capacities.
            // They can't overlap because new_ptr was only just allocated. Values are moved
            // bitwise, after which the old slots are considered uninitialized.
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), kept);
            }
        }

        // The new buffer is installed before any destructor runs. The old one is released when
        // `old` drops, even if one of those destructors panics.
        let old = Retired {
            alloc: &self.alloc,
            ptr: mem::replace(&mut self.ptr, new_ptr),
            cap: mem::replace(&mut self.cap, new_cap),
        };

        let old_len = mem::replace(len, kept);
        for i in kept..old_len {
            // SAFETY: i < old_len <= old.cap, so the old slot still holds a live value that was
            // not moved. len has already been lowered, so it is never considered live again.
            unsafe { self.alloc.destroy(old.ptr.add(i)); }
        }

        Ok(())
    }

    /// Swaps in a fresh allocator, releasing the current storage first.
    ///
    /// # Safety
    /// No slot may hold a live value.
    pub(crate) unsafe fn reset_with(&mut self, alloc: A) {
        // SAFETY: The caller guarantees that there are no live values.
        unsafe { self.release(); }
        self.ptr = NonNull::dangling();
        self.cap = 0;
        self.alloc = alloc;
    }

    /// Returns the storage to the allocator without updating `ptr` or `cap`.
    ///
    /// # Safety
    /// Must be followed by replacing `ptr` and `cap`, or by dropping self without calling release
    /// again.
    unsafe fn release(&mut self) {
        if self.is_allocated() {
            // SAFETY: ptr was obtained from self.alloc with exactly cap slots.
            unsafe { self.alloc.deallocate(self.ptr, self.cap); }
        }
    }

    /// A helper function to obtain storage for `cap` values. Returns a dangling pointer without
    /// consulting the allocator if no memory is needed.
    fn make_ptr(alloc: &A, cap: usize) -> Result<NonNull<T>, AllocationFailure> {
        if cap == 0 || size_of::<T>() == 0 {
            // Zero-sized types never need storage. ptr::read and friends handle them for us, so
            // a dangling pointer with any capacity is valid.
            Ok(NonNull::dangling())
        } else {
            alloc.allocate(cap)
        }
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        // SAFETY: self is being dropped, so release won't be called again.
        unsafe { self.release(); }
    }
}

/// A buffer that has been swapped out of a [`RawBuf`] and is released to its allocator on drop.
struct Retired<'a, T, A: Allocator> {
    alloc: &'a A,
    ptr: NonNull<T>,
    cap: usize,
}

impl<T, A: Allocator> Drop for Retired<'_, T, A> {
    fn drop(&mut self) {
        if self.cap != 0 && size_of::<T>() != 0 {
            // SAFETY: ptr and cap were a RawBuf's allocation from this allocator, and every value
            // in it has been moved out or destroyed.
            unsafe { self.alloc.deallocate(self.ptr, self.cap); }
        }
    }
}
