use std::cell::{Cell, Ref, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::rc::Rc;

use crate::alloc::{Allocator, Global};
use crate::util::error::{AllocationFailure, OutOfMemory};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZeroSizedType;

/// A value which increments a shared counter every time an instance of it is dropped.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// A value whose clones draw from a shared budget, panicking once it is exhausted. Every instance
/// also carries a [`CountedDrop`], so tests can check that nothing leaked or was dropped twice.
#[derive(Debug)]
pub struct PanicOnClone {
    pub value: usize,
    pub budget: Rc<Cell<usize>>,
    pub drops: CountedDrop,
}

impl PanicOnClone {
    pub fn new(value: usize, budget: &Rc<Cell<usize>>, drops: &CountedDrop) -> PanicOnClone {
        PanicOnClone {
            value,
            budget: budget.clone(),
            drops: drops.clone(),
        }
    }
}

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        match self.budget.get() {
            0 => panic!("clone budget exhausted"),
            left => self.budget.set(left - 1),
        }
        PanicOnClone {
            value: self.value,
            budget: self.budget.clone(),
            drops: self.drops.clone(),
        }
    }
}

impl PartialEq for PanicOnClone {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Everything a [`TrackingAllocator`] has observed.
#[derive(Debug, Default)]
pub struct AllocStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub live_bytes: usize,
    pub constructs: usize,
    pub destroys: usize,
    /// The number of allocations that will succeed before every further request is refused.
    pub fail_after: Option<usize>,
}

impl AllocStats {
    pub const fn live_allocations(&self) -> usize {
        self.allocations - self.deallocations
    }
}

/// An allocator which forwards to [`Global`] while recording every call made to it. Clones share
/// the same statistics.
#[derive(Debug, Default, Clone)]
pub struct TrackingAllocator(pub Rc<RefCell<AllocStats>>);

impl TrackingAllocator {
    pub fn new() -> TrackingAllocator {
        TrackingAllocator::default()
    }

    /// Creates a TrackingAllocator that satisfies `successes` allocations and then refuses all
    /// others.
    pub fn failing_after(successes: usize) -> TrackingAllocator {
        let alloc = TrackingAllocator::new();
        alloc.0.borrow_mut().fail_after = Some(successes);
        alloc
    }

    pub fn stats(&self) -> Ref<'_, AllocStats> {
        self.0.borrow()
    }

    pub fn set_fail_after(&self, successes: Option<usize>) {
        self.0.borrow_mut().fail_after = successes;
    }
}

// SAFETY: All storage is obtained from and returned to Global.
unsafe impl Allocator for TrackingAllocator {
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocationFailure> {
        let size = size_of::<T>().saturating_mul(count);
        let mut stats = self.0.borrow_mut();

        if let Some(remaining) = stats.fail_after.as_mut() {
            if *remaining == 0 {
                return Err(OutOfMemory {
                    size,
                    align: align_of::<T>(),
                }.into());
            }
            *remaining -= 1;
        }

        let ptr = Global.allocate(count)?;
        stats.allocations += 1;
        stats.live_bytes += size;
        Ok(ptr)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        {
            let mut stats = self.0.borrow_mut();
            stats.deallocations += 1;
            stats.live_bytes -= size_of::<T>() * count;
        }
        // SAFETY: ptr was obtained from Global with the same count.
        unsafe { Global.deallocate(ptr, count) }
    }

    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        self.0.borrow_mut().constructs += 1;
        // SAFETY: The caller guarantees that ptr is valid for writes and aligned.
        unsafe { ptr.write(value) }
    }

    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        self.0.borrow_mut().destroys += 1;
        // SAFETY: The caller guarantees that the slot holds a live value.
        unsafe { ptr::drop_in_place(ptr.as_ptr()) }
    }
}
