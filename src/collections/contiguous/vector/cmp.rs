use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::Vector;
use crate::alloc::Allocator;

// Two Vectors are equal when they hold the same number of elements and each pair of elements at
// the same index is equal. Capacity and allocators play no part.

impl<T, U, A: Allocator, B: Allocator> PartialEq<Vector<U, B>> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A: Allocator> PartialEq<[U]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator> PartialEq<&[U]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

// Ordering is lexicographic: the first index at which the elements differ decides, and if one
// Vector is a prefix of the other, the shorter one orders first.

impl<T: PartialOrd, A: Allocator, B: Allocator> PartialOrd<Vector<T, B>> for Vector<T, A> {
    fn partial_cmp(&self, other: &Vector<T, B>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
