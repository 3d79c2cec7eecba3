//! Contiguous collection types. Namely [`Vector`], a contiguous collection that varies in size at
//! runtime and manages its own storage.
#![warn(missing_docs)]

pub(crate) mod raw_buf;
pub mod vector;

#[doc(inline)]
pub use vector::Vector;
