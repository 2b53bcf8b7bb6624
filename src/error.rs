//! Error types for container and allocation operations

use core::alloc::Layout;

use thiserror::Error;

/// Result type for allocating operations
pub type AllocResult<T> = core::result::Result<T, AllocError>;

/// Result type for bulk construction
pub type BuildResult<T, E> = core::result::Result<T, BuildError<E>>;

/// Allocation failure
///
/// Carries the request that failed. Surfaced unchanged by every container
/// operation: a failed growth leaves the container exactly as it was, a
/// failed initial construction leaves nothing behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The provider could not supply a block of the requested shape
    #[error("allocation of {size} bytes (align {align}) failed")]
    Exhausted {
        /// Requested size in bytes
        size: usize,
        /// Requested alignment in bytes
        align: usize,
    },

    /// The element count does not describe a representable allocation
    #[error("capacity overflow: {elements} elements exceed the addressable range")]
    CapacityOverflow {
        /// Element count that overflowed the layout computation
        elements: usize,
    },
}

impl AllocError {
    /// Allocation failure for the given layout
    #[inline]
    #[must_use]
    pub fn exhausted(layout: Layout) -> Self {
        Self::Exhausted { size: layout.size(), align: layout.align() }
    }

    /// Layout computation overflowed for `elements` elements
    #[inline]
    #[must_use]
    pub fn capacity_overflow(elements: usize) -> Self {
        Self::CapacityOverflow { elements }
    }
}

/// Failure during bulk construction from fallible inputs
///
/// By the time this propagates, every element constructed before the
/// failure point has been destroyed and any storage acquired for the
/// aborted container has been released.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError<E> {
    /// Storage could not be acquired
    #[error("allocation failed: {0}")]
    Alloc(#[from] AllocError),

    /// An element failed to construct
    #[error("element construction failed: {0}")]
    Construct(E),
}

impl<E> BuildError<E> {
    /// Returns the construction failure, if that is what this is
    #[inline]
    pub fn into_construct(self) -> Option<E> {
        match self {
            Self::Construct(e) => Some(e),
            Self::Alloc(_) => None,
        }
    }
}
