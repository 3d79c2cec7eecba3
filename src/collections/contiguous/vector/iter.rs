use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

use super::Vector;
use crate::alloc::{Allocator, Global};
use crate::collections::contiguous::raw_buf::RawBuf;

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let vec = ManuallyDrop::new(self);
        IntoIter {
            // SAFETY: vec is never used or dropped again, so ownership of the buffer moves to the
            // iterator exactly once.
            buf: unsafe { ptr::read(&vec.buf) },
            start: 0,
            end: vec.len,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

/// An owned type for owned iteration over a [`Vector`], from either end. See
/// [`Vector::into_iter`].
///
/// The slots `start..end` of the buffer hold the values that haven't been yielded yet.
pub struct IntoIter<T, A: Allocator = Global> {
    pub(crate) buf: RawBuf<T, A>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// Returns the values that haven't been yielded yet as a slice.
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: start <= end <= cap and the slots start..end hold live values.
        unsafe { slice::from_raw_parts(self.buf.slot(self.start).as_ptr(), self.end - self.start) }
    }
}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        for i in self.start..self.end {
            // SAFETY: The slots start..end still hold live values, none of which have been yielded.
            unsafe { self.buf.alloc.destroy(self.buf.slot(i)); }
        }
        // Implicitly drop self.buf, which releases the storage.
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            // SAFETY: start < end, so the slot holds a live value. Incrementing start afterwards
            // means it is never read again, effectively moving it out of the buffer.
            let value = unsafe { self.buf.slot(self.start).read() };
            self.start += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: The slot at the newly decremented end holds a live value which won't be read
            // again.
            Some(unsafe { self.buf.slot(self.end).read() })
        } else {
            None
        }
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T: Debug, A: Allocator> Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

// SAFETY: IntoIter uniquely owns its remaining values and its buffer.
unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}
// SAFETY: IntoIter only hands out shared access through &self.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}
