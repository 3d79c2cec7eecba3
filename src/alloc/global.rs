use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::Allocator;
use crate::util::error::{AllocationFailure, CapacityOverflow, OutOfMemory};

/// The default allocation strategy, which forwards to Rust's global allocator via [`std::alloc`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

/// Creates a [`Layout`] for `count` contiguous values of `T`.
///
/// # Errors
/// Returns [`CapacityOverflow`] if the size of the layout would exceed [`isize::MAX`].
pub(crate) fn array_layout<T>(count: usize) -> Result<Layout, CapacityOverflow> {
    Layout::array::<T>(count).map_err(|_| CapacityOverflow)
}

// SAFETY: Pointers are produced by alloc::alloc with Layout::array::<T>(count), which is aligned
// for T and sized for count values, and are only released with that same layout.
unsafe impl Allocator for Global {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocationFailure> {
        let layout = array_layout::<T>(count)?;
        debug_assert!(layout.size() != 0, "zero-sized allocations are never requested");

        // SAFETY: Collections never request zero-sized layouts.
        NonNull::new(unsafe { alloc::alloc(layout).cast() }).ok_or_else(|| {
            log::debug!("global allocator refused {} bytes", layout.size());
            AllocationFailure::from(OutOfMemory {
                size: layout.size(),
                align: layout.align(),
            })
        })
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // The layout was valid when allocated, so it can't overflow now.
        if let Ok(layout) = array_layout::<T>(count) {
            // SAFETY: ptr was allocated in the global allocator with this exact layout.
            unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
        }
    }
}
