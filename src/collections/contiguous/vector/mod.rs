//! A module containing [`Vector`] and associated types.
//!
//! Currently, the only other included type is [`IntoIter`] for owned iteration over a Vector.
//! [`IterMut`](std::slice::IterMut) and [`Iter`](std::slice::Iter) from [`std::slice`] are used for
//! borrowed iteration, and reverse iteration is available through
//! [`DoubleEndedIterator::rev`] on all three.
//!
//! [`Vector`] is also re-exported under the parent module.

mod cmp;
mod gap;
mod iter;
mod vector;

pub(crate) use gap::Gap;
pub use iter::*;
pub use vector::*;

/// Creates a [`Vector`] containing the provided elements, much like an initializer list.
///
/// - `vector![]` creates an empty Vector.
/// - `vector![a, b, c]` moves each element in order, with the capacity rounded up to the next
///   power of two.
/// - `vector![value; count]` creates `count` clones of `value`.
///
/// # Examples
/// ```
/// # use raw_vector::vector;
/// let vec = vector![1, 2, 3];
/// assert_eq!(vec, [1, 2, 3]);
/// assert_eq!(vec.cap(), 4);
///
/// assert_eq!(vector!["a"; 3], ["a", "a", "a"]);
/// ```
#[macro_export]
macro_rules! vector {
    () => {
        $crate::collections::contiguous::Vector::new()
    };
    ($value:expr; $count:expr) => {{
        let mut vec = $crate::collections::contiguous::Vector::new();
        vec.resize($count, $value);
        vec
    }};
    ($($item:expr),+ $(,)?) => {
        $crate::collections::contiguous::Vector::from([$($item),+])
    };
}
