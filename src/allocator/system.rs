//! Default allocator backed by the global heap
//!
//! Delegates every request to the process-wide heap, which is the operating
//! system allocator unless the program registers a custom
//! `#[global_allocator]`. This is the provider the containers use when none
//! is supplied.

use core::alloc::Layout;
use core::ptr::NonNull;

use alloc::alloc::{alloc, dealloc};

use super::{AllocError, AllocResult, Allocator};

/// Provider for the program's global heap
///
/// Stateless and `Copy`; cloning it is free and every copy refers to the
/// same underlying heap. Zero-sized requests are answered with a dangling
/// pointer without touching the heap at all, and releasing such a block
/// is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl SystemAllocator {
    /// Creates a new `SystemAllocator`
    ///
    /// Zero-cost; the allocator carries no state.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        SystemAllocator
    }
}

unsafe impl Allocator for SystemAllocator {
    #[inline]
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        if layout.size() == 0 {
            let ptr = NonNull::<u8>::dangling();
            return Ok(NonNull::slice_from_raw_parts(ptr, 0));
        }

        // SAFETY: Delegating to the global heap.
        // - layout has non-zero size (checked above)
        // - alignment is a power of two (Layout guarantees it)
        let ptr = unsafe { alloc(layout) };

        match NonNull::new(ptr) {
            Some(ptr) => Ok(NonNull::slice_from_raw_parts(ptr, layout.size())),
            None => Err(AllocError::exhausted(layout)),
        }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }

        // SAFETY: Releasing a block obtained from `allocate`.
        // - ptr came from the global heap with this exact layout (caller contract)
        // - layout has non-zero size (checked above)
        unsafe { dealloc(ptr.as_ptr(), layout) };
    }
}
