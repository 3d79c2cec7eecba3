use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// A checked accessor was given an index that doesn't refer to a live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// An insertion position was past the end of the collection. Valid positions are `0..=len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Position {position} out of bounds for insertion into collection with {len} elements!")]
pub struct PositionOutOfBounds {
    pub position: usize,
    pub len: usize,
}

/// The memory layout of the requested allocation would have a size exceeding [`isize::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Capacity overflow!")]
pub struct CapacityOverflow;

/// The allocation strategy was unable to satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Out of memory: failed to allocate {size} bytes with alignment {align}!")]
pub struct OutOfMemory {
    pub size: usize,
    pub align: usize,
}

/// A request for raw storage couldn't be satisfied, either because it couldn't be expressed as a
/// valid layout or because the allocator refused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum AllocationFailure {
    CapacityOverflow(CapacityOverflow),
    OutOfMemory(OutOfMemory),
}

/// The ways in which a positional insertion can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum InsertError {
    PositionOutOfBounds(PositionOutOfBounds),
    AllocationFailure(AllocationFailure),
}

impl From<CapacityOverflow> for InsertError {
    fn from(value: CapacityOverflow) -> Self {
        InsertError::AllocationFailure(value.into())
    }
}
