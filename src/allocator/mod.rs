//! Memory-provider capability for the containers
//!
//! Containers in this crate never touch the global heap directly. They go
//! through the [`Allocator`] trait, which a caller can implement to redirect
//! storage wherever it wants, and through the [`TypedAllocator`] extension,
//! which turns byte-level requests into element-counted ones.

mod system;
mod traits;

pub use crate::error::{AllocError, AllocResult};
pub use system::SystemAllocator;
pub use traits::{Allocator, TypedAllocator};
