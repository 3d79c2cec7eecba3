use std::ffi::c_void;
use std::mem;
use std::ptr::{self, NonNull};

use super::Allocator;
use super::global::array_layout;
use crate::util::error::{AllocationFailure, OutOfMemory};

/// An allocation strategy backed by the C heap (`malloc`, `posix_memalign` and `free`).
///
/// Storage obtained this way is served by whichever C allocator the process is linked or
/// preloaded with, making it possible to benchmark a collection against e.g. jemalloc without
/// replacing Rust's global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Malloc;

/// The alignment that `malloc` is guaranteed to provide on every supported platform.
const MALLOC_ALIGN: usize = 2 * mem::size_of::<usize>();

// SAFETY: malloc and posix_memalign return storage valid for the requested size, aligned to at
// least the requested alignment, and it is only ever released through free.
unsafe impl Allocator for Malloc {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocationFailure> {
        let layout = array_layout::<T>(count)?;
        debug_assert!(layout.size() != 0, "zero-sized allocations are never requested");

        let raw_ptr = if layout.align() <= MALLOC_ALIGN {
            // SAFETY: malloc has no preconditions. A null return is handled below.
            unsafe { libc::malloc(layout.size()) }
        } else {
            let mut out: *mut c_void = ptr::null_mut();
            // posix_memalign requires the alignment to be a multiple of size_of::<*mut c_void>(),
            // which holds for any power of two larger than MALLOC_ALIGN.
            // SAFETY: out is a valid location to write the resulting pointer to.
            match unsafe { libc::posix_memalign(&mut out, layout.align(), layout.size()) } {
                0 => out,
                _ => ptr::null_mut(),
            }
        };

        NonNull::new(raw_ptr.cast()).ok_or_else(|| {
            log::debug!("malloc refused {} bytes", layout.size());
            AllocationFailure::from(OutOfMemory {
                size: layout.size(),
                align: layout.align(),
            })
        })
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, _count: usize) {
        // SAFETY: ptr was returned by malloc or posix_memalign and hasn't been freed yet.
        unsafe { libc::free(ptr.as_ptr().cast()) }
    }
}
