use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Display, Formatter};
use std::iter;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use super::Gap;
use crate::alloc::{Allocator, Global};
use crate::collections::contiguous::raw_buf::RawBuf;
#[doc(inline)]
pub use crate::util::error::{
    AllocationFailure, CapacityOverflow, IndexOutOfBounds, InsertError, PositionOutOfBounds,
};
use crate::util::result::ResultExtension;

const MIN_CAP: usize = 1;
const MAX_SIZE: usize = isize::MAX as usize;

const GROWTH_FACTOR: usize = 2;

/// A variable size contiguous collection, which manages its own storage through an [`Allocator`].
///
/// A Vector owns a buffer of [`cap`](Vector::cap) slots, the first [`len`](Vector::len) of which
/// hold live values. The remaining slots are uninitialized. Every operation that changes the
/// capacity moves the live values onto a fresh allocation in order, and the old allocation is
/// only released once that has happened, so a failed allocation never disturbs existing values.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items being inserted or appended.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` / `at` | `O(1)` |
/// | `len` / `cap` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_unchecked` | `O(1)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)`*, `O(n)` |
/// | `insert_iter` | `O(n-i+m)`*, `O(n+m)` |
/// | `remove` | `O(n-i)` |
/// | `replace` | `O(1)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `shrink_to_fit` | `O(n)` |
/// | `adjust_cap` | `O(n)` |
/// | `swap_with` | `O(1)` |
/// | `append` | `O(m)`*, `O(n+m)` |
///
/// \* If the Vector doesn't have enough capacity for the new elements it has to reallocate first,
/// which takes `O(n)`.
///
/// \** If the Vector has enough capacity for the additional items already, `reserve` is `O(1)`.
pub struct Vector<T, A: Allocator = Global> {
    pub(crate) buf: RawBuf<T, A>,
    pub(crate) len: usize,
}

impl<T> Vector<T> {
    /// Creates a new Vector with length and capacity 0. Memory will be allocated when the capacity
    /// changes.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub const fn new() -> Vector<T> {
        Vector::new_in(Global)
    }

    /// Creates a new, empty Vector with room for at least `hint` elements. The capacity is rounded
    /// up to the next power of two, and a hint of 0 doesn't allocate at all.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`] or if the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 8);
    /// assert_eq!(Vector::<u8>::with_cap(0).cap(), 0);
    /// ```
    pub fn with_cap(hint: usize) -> Vector<T> {
        Vector::with_cap_in(hint, Global)
    }

    /// Creates a Vector holding a clone of every element of `items`, in order.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec = Vector::from_slice(&["a", "b", "c"]);
    /// assert_eq!(vec, ["a", "b", "c"]);
    /// assert_eq!(vec.cap(), 4);
    /// ```
    pub fn from_slice(items: &[T]) -> Vector<T>
    where
        T: Clone,
    {
        Vector::from_slice_in(items, Global)
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Creates a new, empty Vector which will obtain its storage from `alloc`.
    pub const fn new_in(alloc: A) -> Vector<T, A> {
        Vector {
            buf: RawBuf::new_in(alloc),
            len: 0,
        }
    }

    /// The same as [`Vector::with_cap`], but using the provided allocator.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`] or if the allocation fails.
    pub fn with_cap_in(hint: usize, alloc: A) -> Vector<T, A> {
        Vector::try_with_cap_in(hint, alloc).throw()
    }

    /// The same as [`Vector::with_cap_in`], but returning an error instead of panicking.
    ///
    /// # Errors
    /// Returns an [`AllocationFailure`] if the rounded capacity can't be allocated.
    pub fn try_with_cap_in(hint: usize, alloc: A) -> Result<Vector<T, A>, AllocationFailure> {
        Ok(Vector {
            buf: RawBuf::try_with_cap_in(round_cap(hint)?, alloc)?,
            len: 0,
        })
    }

    /// The same as [`Vector::from_slice`], but using the provided allocator.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    pub fn from_slice_in(items: &[T], alloc: A) -> Vector<T, A>
    where
        T: Clone,
    {
        let mut vec = Vector::with_cap_in(items.len(), alloc);

        for item in items {
            // SAFETY: vec has been created with enough capacity for every item.
            unsafe { vec.push_unchecked(item.clone()); }
        }

        vec
    }

    /// Returns the length of the Vector.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let vec = vector![1_u8, 2, 3];
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Vector contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::new();
    /// assert!(vec.is_empty());
    /// vec.push(1);
    /// assert!(!vec.is_empty())
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the Vector, the number of elements it can hold before it
    /// has to reallocate.
    pub const fn cap(&self) -> usize {
        self.buf.cap
    }

    /// Returns a reference to the allocator backing this Vector.
    pub const fn allocator(&self) -> &A {
        &self.buf.alloc
    }

    /// Returns a raw pointer to the Vector's buffer. The pointer is dangling if nothing is
    /// allocated, and is invalidated by any operation that reallocates.
    pub const fn as_ptr(&self) -> *const T {
        self.buf.ptr.as_ptr().cast_const()
    }

    /// Returns a mutable raw pointer to the Vector's buffer. See [`Vector::as_ptr`].
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr.as_ptr()
    }

    /// Returns the live elements of the Vector as a slice.
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: The first len slots hold live values. The pointer is nonnull and properly
        // aligned, even when dangling, and the total size is <= isize::MAX as the result of being
        // a valid allocation. The borrow checker prevents mutation while the slice is borrowed.
        unsafe { slice::from_raw_parts(self.buf.ptr.as_ptr(), self.len) }
    }

    /// Returns the live elements of the Vector as a mutable slice.
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: See as_slice. self is borrowed mutably, so the slice is the only access.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr.as_ptr(), self.len) }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// This is the checked counterpart of indexing. See also [`get_unchecked`](slice::get_unchecked)
    /// for access without a bounds check.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let vec = vector![0.0, 1.0, 2.0];
    /// assert_eq!(vec.at(2), Ok(&2.0));
    /// assert!(vec.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(&self.as_slice()[index])
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Returns a reference to the first element, if there is one.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns a mutable reference to the first element, if there is one.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Returns a reference to the last element, if there is one.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns a mutable reference to the last element, if there is one.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Push the provided value onto the end of the Vector, doubling the capacity if required.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`], or
    /// if the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::<u8>::new();
    /// for i in 0..=5 {
    ///     vec.push(i);
    /// }
    /// assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 8);
    /// ```
    pub fn push(&mut self, value: T) {
        self.try_grow_for(1).throw();
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
    }

    /// Push the provided value onto the end of the Vector, returning an error instead of panicking
    /// if the Vector needs to grow but can't. On failure, `value` is dropped and the Vector is left
    /// unchanged.
    ///
    /// # Errors
    /// Returns an [`AllocationFailure`] if growing the Vector failed.
    pub fn try_push(&mut self, value: T) -> Result<(), AllocationFailure> {
        self.try_grow_for(1)?;
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
        Ok(())
    }

    /// Constructs a new element at the end of the Vector from the result of `make`, returning a
    /// reference to it. If `make` panics, the Vector keeps its previous elements.
    ///
    /// # Panics
    /// Panics if growing the Vector fails, and propagates any panic from `make`.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::new();
    /// let last = vec.push_with(|| String::from("built in place"));
    /// last.push('!');
    /// assert_eq!(vec[0], "built in place!");
    /// ```
    pub fn push_with<F: FnOnce() -> T>(&mut self, make: F) -> &mut T {
        self.try_grow_for(1).throw();
        // SAFETY: There is capacity for at least one more value, so the slot at len is in bounds
        // and uninitialized. len is only incremented once the value exists.
        unsafe {
            let slot = self.buf.slot(self.len);
            self.buf.alloc.construct_with(slot, make);
            self.len += 1;
            &mut *slot.as_ptr()
        }
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough capacity
    /// to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the Vector has enough capacity to add the provided
    /// value, using methods like [`reserve`](Vector::reserve) or [`with_cap`](Vector::with_cap) to
    /// do so. Using this method on a Vector without enough capacity is undefined behavior.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::with_cap(3);
    /// for i in 1_u8..=3 {
    ///     // SAFETY: vec has been created with enough capacity for all three elements.
    ///     unsafe { vec.push_unchecked(i); }
    /// }
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// ```
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: It is up to the caller to ensure that the Vector has enough capacity for this
        // push, so the slot at len is in bounds and uninitialized.
        unsafe { self.buf.alloc.construct(self.buf.slot(self.len), value); }
        self.len += 1;
    }

    /// Pops the last value off the end of the Vector, returning an owned value if the Vector has
    /// length greater than 0. Popping an empty Vector does nothing.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![0, 1, 2, 3, 4];
    /// for i in (0..vec.len()).rev() {
    ///     assert_eq!(vec.pop(), Some(i));
    /// }
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // Decrement len before reading.
            self.len -= 1;

            // SAFETY: len has just been decremented, so the slot holds a live value that is no
            // longer tracked. Reading it moves the value out.
            Some(unsafe { self.buf.slot(self.len).read() })
        }
    }

    /// Inserts the provided value at `index`, shifting all following elements one place to the
    /// right. Returns a reference to the inserted element.
    ///
    /// # Panics
    /// Panics if `index > len` or if growing the Vector fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![0, 1, 2];
    /// vec.insert(1, 100);
    /// vec.insert(1, 200);
    /// vec.insert(5, 300);
    /// assert_eq!(vec, [0, 200, 100, 1, 2, 300]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.try_insert(index, value).throw()
    }

    /// The same as [`Vector::insert`], but returning an error instead of panicking. On failure,
    /// `value` is dropped and the Vector is left unchanged.
    ///
    /// # Errors
    /// Returns [`InsertError::PositionOutOfBounds`] if `index > len` and
    /// [`InsertError::AllocationFailure`] if growing the Vector failed.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T, InsertError> {
        self.try_insert_with(index, || value)
    }

    /// Constructs a new element at `index` from the result of `make`, shifting all following
    /// elements one place to the right.
    ///
    /// # Panics
    /// Panics if `index > len` or if growing the Vector fails, and propagates any panic from
    /// `make`.
    pub fn insert_with<F: FnOnce() -> T>(&mut self, index: usize, make: F) -> &mut T {
        self.try_insert_with(index, make).throw()
    }

    /// The same as [`Vector::insert_with`], but returning an error instead of panicking.
    ///
    /// # Errors
    /// Returns [`InsertError::PositionOutOfBounds`] if `index > len` and
    /// [`InsertError::AllocationFailure`] if growing the Vector failed. In both cases `make` isn't
    /// called.
    pub fn try_insert_with<F: FnOnce() -> T>(
        &mut self,
        index: usize,
        make: F,
    ) -> Result<&mut T, InsertError> {
        self.check_position(index)?;
        self.try_grow_for(1)?;

        // Evaluated before anything is shifted, so a panic leaves the Vector untouched.
        let value = make();

        // SAFETY: index <= len < cap, so both the slot and the shifted tail are in bounds. The
        // tail is moved bitwise (ptr::copy handles the overlap), leaving the slot at index free
        // for the new value.
        unsafe {
            let slot = self.buf.slot(index);
            ptr::copy(slot.as_ptr(), slot.add(1).as_ptr(), self.len - index);
            self.buf.alloc.construct(slot, value);
            self.len += 1;
            Ok(&mut *slot.as_ptr())
        }
    }

    /// Inserts `count` copies of `value` starting at `index`. Returns the inserted elements.
    ///
    /// # Panics
    /// Panics if `index > len` or if growing the Vector fails. If cloning `value` panics, the
    /// copies made so far stay in the Vector and the panic is propagated.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![1, 8, 5, 5, 0, 0, 0, 2];
    /// vec.insert_n(4, 3, 1);
    /// assert_eq!(vec, [1, 8, 5, 5, 1, 1, 1, 0, 0, 0, 2]);
    /// ```
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) -> &mut [T]
    where
        T: Clone,
    {
        self.insert_iter(index, iter::repeat_n(value, count))
    }

    /// Inserts a clone of every element of `items`, in order, starting at `index`. Returns the
    /// inserted elements.
    ///
    /// # Panics
    /// Panics if `index > len` or if growing the Vector fails. If a clone panics, the elements
    /// inserted so far stay in the Vector and the panic is propagated.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![1, 8, 5, 5, 2];
    /// vec.insert_slice(vec.len() - 1, &[0, 0, 0]);
    /// assert_eq!(vec, [1, 8, 5, 5, 0, 0, 0, 2]);
    /// ```
    pub fn insert_slice(&mut self, index: usize, items: &[T]) -> &mut [T]
    where
        T: Clone,
    {
        self.insert_iter(index, items.iter().cloned())
    }

    /// Inserts every element produced by `items`, in order, starting at `index`. Returns the
    /// inserted elements.
    ///
    /// Room is made for as many elements as the iterator reports. If it produces fewer, the gap
    /// is closed again. If it produces more, the excess is left in the iterator.
    ///
    /// # Panics
    /// Panics if `index > len` or if growing the Vector fails, and propagates any panic from the
    /// iterator. After a panic, the elements inserted so far stay in the Vector.
    pub fn insert_iter<I>(&mut self, index: usize, items: I) -> &mut [T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.try_insert_iter(index, items).throw()
    }

    /// The same as [`Vector::insert_iter`], but returning an error instead of panicking.
    ///
    /// # Errors
    /// Returns [`InsertError::PositionOutOfBounds`] if `index > len` and
    /// [`InsertError::AllocationFailure`] if growing the Vector failed. In both cases the iterator
    /// isn't advanced.
    pub fn try_insert_iter<I>(&mut self, index: usize, items: I) -> Result<&mut [T], InsertError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.check_position(index)?;

        let items = items.into_iter();
        let count = items.len();
        self.try_grow_for(count)?;

        // SAFETY: index <= len and the capacity has just been adjusted to hold count more values.
        let mut gap = unsafe { Gap::open(self, index, count) };
        for item in items.take(count) {
            gap.fill(item);
        }
        let filled = gap.close();

        // SAFETY: The slots index..index + filled now hold the inserted values, all of which are
        // within len.
        Ok(unsafe { slice::from_raw_parts_mut(self.buf.slot(index).as_ptr(), filled) })
    }

    /// Removes the element at the provided index, moving all following values to fill in the gap.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = "Hello world!".chars().collect();
    /// assert_eq!(vec.remove(1), 'e');
    /// assert_eq!(vec.remove(4), ' ');
    /// assert_eq!(vec, "Hlloworld!".chars().collect::<Vector<_>>());
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).throw()
    }

    /// The same as [`Vector::remove`], but returning an error instead of panicking.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn try_remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.check_index(index)?;

        // SAFETY: index < len, so the slot holds a live value, which is moved out before the tail
        // is shifted over it. len is then lowered to forget the duplicate left in the last slot.
        unsafe {
            let slot = self.buf.slot(index);
            let value = slot.read();
            ptr::copy(slot.add(1).as_ptr(), slot.as_ptr(), self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Replaces the element at the provided index with `new_value`, returning the old value.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        mem::replace(self.at_mut(index).throw(), new_value)
    }

    /// Ensures that the Vector has capacity to hold an additional `extra` elements. After invoking
    /// this method, the capacity will be >= len + extra. The length is never changed.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`], or
    /// if the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![1, 2, 3];
    /// vec.reserve(29);
    /// assert_eq!(vec.cap(), 32);
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub fn reserve(&mut self, extra: usize) {
        self.try_reserve(extra).throw()
    }

    /// The same as [`Vector::reserve`], but returning an error instead of panicking.
    ///
    /// # Errors
    /// Returns an [`AllocationFailure`] if `len + extra` can't be allocated, in which case the
    /// Vector is left unchanged.
    pub fn try_reserve(&mut self, extra: usize) -> Result<(), AllocationFailure> {
        let new_cap = self.len.checked_add(extra).ok_or(CapacityOverflow)?;

        if new_cap <= self.cap() { return Ok(()); }

        self.try_realloc_with_cap(new_cap)
    }

    /// Shrinks the Vector so that its capacity is equal to its length.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    pub fn shrink_to_fit(&mut self) {
        self.try_realloc_with_cap(self.len).throw()
    }

    /// Reallocates the Vector with a capacity of exactly `new_cap`.
    ///
    /// **This is lossy**: if `new_cap` is less than the current length, the elements at
    /// `new_cap..len` are dropped and the length is reduced to `new_cap`.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`], or
    /// if the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![1, 2, 3, 4, 5];
    /// vec.adjust_cap(100);
    /// assert_eq!((vec.len(), vec.cap()), (5, 100));
    /// vec.adjust_cap(2);
    /// assert_eq!(vec, [1, 2]);
    /// ```
    pub fn adjust_cap(&mut self, new_cap: usize) {
        self.try_adjust_cap(new_cap).throw()
    }

    /// The same as [`Vector::adjust_cap`], but returning an error instead of panicking.
    ///
    /// # Errors
    /// Returns an [`AllocationFailure`] if the new capacity can't be allocated, in which case no
    /// elements are dropped and the Vector is left unchanged.
    pub fn try_adjust_cap(&mut self, new_cap: usize) -> Result<(), AllocationFailure> {
        let dropped = self.len.saturating_sub(new_cap);
        self.try_realloc_with_cap(new_cap)?;

        if dropped != 0 {
            log::debug!("adjust_cap to {new_cap} dropped {dropped} elements");
        }
        Ok(())
    }

    /// Drops every element after the first `len`. Does nothing if the Vector is already shorter.
    /// The capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len { return; }

        // Lower len first, so a panicking destructor leaks the remaining values instead of
        // exposing them twice.
        let old_len = mem::replace(&mut self.len, len);
        for i in len..old_len {
            // SAFETY: i < old_len, so the slot holds a live value, which is no longer tracked.
            unsafe { self.buf.alloc.destroy(self.buf.slot(i)); }
        }
    }

    /// Drops every element of the Vector, in order. The capacity is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![1, 2, 3];
    /// vec.clear();
    /// assert!(vec.is_empty());
    /// assert_eq!(vec.cap(), 4);
    /// ```
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the Vector to `new_len` elements, filling new slots with the results of `make` or
    /// dropping elements from the end.
    ///
    /// # Panics
    /// Panics if growing the Vector fails, and propagates any panic from `make`. Elements produced
    /// before such a panic stay in the Vector.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut make: F) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        self.try_grow_for(new_len - self.len).throw();
        while self.len < new_len {
            // SAFETY: Enough capacity was reserved for new_len elements. len is only incremented
            // once each value exists.
            unsafe {
                self.buf.alloc.construct_with(self.buf.slot(self.len), &mut make);
            }
            self.len += 1;
        }
    }

    /// Exchanges the contents of two Vectors, including their storage and allocators, without
    /// touching any elements.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut a = vector![0, 1, 2, 3, 4];
    /// let mut b = vector![4, 3, 2, 1];
    /// a.swap_with(&mut b);
    /// assert_eq!((a.len(), b.len()), (4, 5));
    /// ```
    pub fn swap_with(&mut self, other: &mut Vector<T, A>) {
        mem::swap(self, other);
    }

    /// Moves the contents out of self, leaving it empty and unallocated with a clone of its
    /// allocator.
    pub fn take(&mut self) -> Vector<T, A>
    where
        A: Clone,
    {
        let empty = Vector::new_in(self.buf.alloc.clone());
        mem::replace(self, empty)
    }

    /// Moves all elements from `other` onto the end of self, leaving `other` empty. `other` keeps
    /// its allocation.
    ///
    /// # Panics
    /// Panics if growing the Vector fails.
    pub fn append<B: Allocator>(&mut self, other: &mut Vector<T, B>) {
        self.try_grow_for(other.len).throw();

        // SAFETY: self has room for other.len values after its own len and other holds other.len
        // live values. Both are properly aligned and can't overlap, as they are distinct
        // allocations (or dangling for zero-sized types, where nothing is copied).
        unsafe {
            ptr::copy_nonoverlapping(
                other.buf.ptr.as_ptr().cast_const(),
                self.buf.slot(self.len).as_ptr(),
                other.len,
            );
        }

        self.len += other.len;
        // The values now belong to self.
        other.len = 0;
    }

    /// Decomposes the Vector into its raw parts: the buffer, the length, the capacity and the
    /// allocator. The caller becomes responsible for destroying the elements and releasing the
    /// buffer, which can be done by rebuilding the Vector with [`Vector::from_raw_parts_in`].
    pub fn into_raw_parts_with_alloc(self) -> (*mut T, usize, usize, A) {
        let vec = ManuallyDrop::new(self);
        // SAFETY: vec is never used or dropped again, so the allocator is moved out exactly once.
        let alloc = unsafe { ptr::read(&vec.buf.alloc) };
        (vec.buf.ptr.as_ptr(), vec.len, vec.buf.cap, alloc)
    }

    /// Rebuilds a Vector from its raw parts.
    ///
    /// # Safety
    /// The parts must have come from [`Vector::into_raw_parts_with_alloc`] (with the same `T`),
    /// and must not have been used to build another Vector since.
    pub unsafe fn from_raw_parts_in(ptr: *mut T, len: usize, cap: usize, alloc: A) -> Vector<T, A> {
        Vector {
            buf: RawBuf {
                // SAFETY: A Vector's buffer pointer is never null, even when dangling.
                ptr: unsafe { NonNull::new_unchecked(ptr) },
                cap,
                alloc,
                _phantom: PhantomData,
            },
            len,
        }
    }

    /// Reallocates the internal buffer with exactly the provided capacity, dropping elements that
    /// no longer fit.
    pub(crate) fn try_realloc_with_cap(&mut self, new_cap: usize) -> Result<(), AllocationFailure> {
        // SAFETY: len <= cap and the first len slots are live, as for every valid Vector.
        unsafe { self.buf.try_realloc(new_cap, &mut self.len) }
    }

    /// Grows the internal buffer so that it can take at least `additional` more elements. The
    /// capacity is at least doubled so that repeated growth is amortized `O(1)`.
    pub(crate) fn try_grow_for(&mut self, additional: usize) -> Result<(), AllocationFailure> {
        let required = self.len.checked_add(additional).ok_or(CapacityOverflow)?;

        if required <= self.cap() { return Ok(()); }

        let mut new_cap = cmp::max(
            cmp::max(self.cap().saturating_mul(GROWTH_FACTOR), required),
            MIN_CAP,
        );

        // If doubling would grow past the maximum layout size, settle for what is required.
        if size_of::<T>().saturating_mul(new_cap) > MAX_SIZE {
            new_cap = required;
        }

        self.try_realloc_with_cap(new_cap)
    }

    /// Checks that the provided index refers to a live element.
    pub(crate) const fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index >= self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }

    /// Checks that the provided position is somewhere an element can be inserted.
    pub(crate) const fn check_position(&self, position: usize) -> Result<(), PositionOutOfBounds> {
        if position > self.len {
            Err(PositionOutOfBounds {
                position,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }
}

impl<T: Clone, A: Allocator> Vector<T, A> {
    /// Resizes the Vector to `new_len` elements, filling new slots with clones of `value` or
    /// dropping elements from the end.
    ///
    /// # Panics
    /// Panics if growing the Vector fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::vector;
    /// let mut vec = vector![1, 2];
    /// vec.resize(4, 0);
    /// assert_eq!(vec, [1, 2, 0, 0]);
    /// vec.resize(1, 0);
    /// assert_eq!(vec, [1]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        if new_len <= self.len {
            self.truncate(new_len);
        } else {
            self.insert_iter(self.len, iter::repeat_n(value, new_len - self.len));
        }
    }
}

/// Rounds a capacity hint up to the next power of two, leaving 0 as is.
fn round_cap(hint: usize) -> Result<usize, CapacityOverflow> {
    match hint {
        0 => Ok(0),
        _ => hint.checked_next_power_of_two().ok_or(CapacityOverflow),
    }
}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.try_grow_for(iter.size_hint().0).throw();

        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        <Self as Extend<T>>::extend(self, iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let mut vec = Vector::new();
        vec.extend(value);
        vec
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    /// Creates a Vector from an array, moving each element in order. The capacity is `N` rounded
    /// up to the next power of two.
    fn from(value: [T; N]) -> Self {
        let mut vec = Vector::with_cap(N);

        for item in value {
            // SAFETY: vec has been created with a capacity of at least N.
            unsafe { vec.push_unchecked(item); }
        }

        vec
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(value: &[T]) -> Self {
        Vector::from_slice(value)
    }
}

impl<T, A: Allocator + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // Destroy all live values in order.
        self.clear();

        // Implicitly drop self.buf, which only releases the storage.
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    /// Creates a deep copy of the Vector, with the same capacity and a clone of its allocator.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    fn clone(&self) -> Self {
        let mut vec = Vector {
            buf: RawBuf::try_with_cap_in(self.cap(), self.buf.alloc.clone()).throw(),
            len: 0,
        };

        for value in self.iter() {
            // SAFETY: vec has the same capacity as self, which holds at least len values.
            unsafe { vec.push_unchecked(value.clone()); }
        }

        vec
    }

    /// Replaces the contents of self with a deep copy of `source`. The existing elements are
    /// destroyed and the existing storage is released before anything is copied.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        // SAFETY: clear has just destroyed every live value.
        unsafe { self.buf.reset_with(source.buf.alloc.clone()); }
        self.try_realloc_with_cap(source.cap()).throw();

        for value in source.iter() {
            // SAFETY: self now has the same capacity as source.
            unsafe { self.push_unchecked(value.clone()); }
        }
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vector<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> Borrow<[T]> for Vector<T, A> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for Vector<T, A> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

// SAFETY: Vectors uniquely own their buffer and allocator, so they are safe to send when both T
// and A are.
unsafe impl<T: Send, A: Allocator + Send> Send for Vector<T, A> {}
// SAFETY: Vector's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs. This means that Vector<T, A> can safely implement Sync when T and A do.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Vector<T, A> {}

impl<T: Debug, A: Allocator> Debug for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &self.as_slice())
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug, A: Allocator> Display for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
