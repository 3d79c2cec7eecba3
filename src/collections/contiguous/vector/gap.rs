use std::ptr;

use super::Vector;
use crate::alloc::Allocator;

/// A run of uninitialized slots opened inside a [`Vector`], ready to be filled with new values.
///
/// While a Gap is open, the Vector's length only covers the elements before it, and the elements
/// after it sit `size` slots further right than usual. Dropping the Gap, whether normally or
/// while unwinding from a panic in the code filling it, shifts those elements back against
/// whatever was filled and restores the length. Every value stays owned exactly once.
pub(crate) struct Gap<'a, T, A: Allocator> {
    vec: &'a mut Vector<T, A>,
    start: usize,
    size: usize,
    filled: usize,
    tail: usize,
}

impl<'a, T, A: Allocator> Gap<'a, T, A> {
    /// Opens a gap of `size` slots at `start`, moving the following elements out of the way.
    ///
    /// # Safety
    /// `start` must be `<= vec.len()` and the Vector must have capacity for `vec.len() + size`
    /// elements.
    pub(crate) unsafe fn open(vec: &'a mut Vector<T, A>, start: usize, size: usize) -> Self {
        let tail = vec.len - start;

        // SAFETY: Both ranges are within the capacity. ptr::copy handles the overlap.
        unsafe {
            let src = vec.buf.slot(start);
            ptr::copy(src.as_ptr(), src.add(size).as_ptr(), tail);
        }

        // The tail is no longer where len expects it to be.
        vec.len = start;

        Gap {
            vec,
            start,
            size,
            filled: 0,
            tail,
        }
    }

    /// Moves `value` into the next unfilled slot of the gap.
    pub(crate) fn fill(&mut self, value: T) {
        debug_assert!(self.filled < self.size, "gap overfilled");
        if self.filled == self.size { return; }

        // SAFETY: filled < size, so the slot lies within the gap and is uninitialized.
        unsafe {
            let slot = self.vec.buf.slot(self.start + self.filled);
            self.vec.buf.alloc.construct(slot, value);
        }
        self.filled += 1;
    }

    /// Closes the gap, returning the number of slots that were filled.
    pub(crate) fn close(self) -> usize {
        self.filled
    }
}

impl<T, A: Allocator> Drop for Gap<'_, T, A> {
    fn drop(&mut self) {
        let end = self.start + self.filled;

        if self.filled != self.size {
            // SAFETY: The tail currently starts at start + size. Moving it down to end keeps it
            // within the capacity, and the slots it vacates are never read again.
            unsafe {
                ptr::copy(
                    self.vec.buf.slot(self.start + self.size).as_ptr(),
                    self.vec.buf.slot(end).as_ptr(),
                    self.tail,
                );
            }
        }

        self.vec.len = end + self.tail;
    }
}
