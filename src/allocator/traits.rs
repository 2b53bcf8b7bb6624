//! Allocator traits with clear safety contracts
//!
//! The system is built around two traits:
//! - `Allocator`: raw acquire/release of byte blocks
//! - `TypedAllocator`: element-counted view, implemented for every `Allocator`
//!
//! There is deliberately no `grow`/`shrink`/`reallocate` surface: containers
//! in this crate never resize a block in place. Growth allocates a fresh
//! block, moves the live elements across, and releases the old one, so the
//! capability a provider must supply is exactly acquire and release.
//!
//! # Safety
//!
//! `Allocator` is an unsafe trait. Implementors must guarantee:
//! - Returned pointers are valid, properly aligned for the layout, and
//!   exclusive until deallocated
//! - `deallocate` is only sound for a pointer previously returned by the
//!   same allocator with the same layout
//!
//! The blanket impl for `&A` is sound because it forwards every call to the
//! underlying allocator without introducing new unsafe operations.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::error::{AllocError, AllocResult};

/// Raw memory provider
///
/// The fundamental capability the containers are parameterized over. A
/// provider hands out uninitialized byte blocks and takes them back; it
/// never sees element values and never runs destructors.
///
/// # Safety Requirements
///
/// Implementors must ensure that:
/// - Returned pointers are valid for reads and writes of `layout.size()`
///   bytes and aligned to `layout.align()`
/// - Blocks remain valid until passed back to `deallocate`
/// - Deallocation only occurs for previously allocated pointers, with the
///   layout that produced them
pub unsafe trait Allocator {
    /// Allocates a block of memory with the given layout
    ///
    /// # Safety
    /// - Returned memory is uninitialized and must be initialized before use
    /// - The block must eventually be released with `deallocate` using the
    ///   same layout
    ///
    /// # Errors
    /// Returns [`AllocError`] if the provider cannot supply the block. A
    /// failed call has no observable effect on the provider.
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>>;

    /// Deallocates the block at `ptr`
    ///
    /// # Safety
    /// - `ptr` must have been allocated by this allocator
    /// - `layout` must match the original allocation layout exactly
    /// - After this call `ptr` is invalid; double-free is undefined behavior
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Element-counted view of an [`Allocator`]
///
/// The containers speak in elements, not bytes: an array wants storage for
/// `count` values of `T`, a list wants one node at a time. This extension
/// derives the byte layout from the element type, so a caller cannot pass a
/// layout that disagrees with the type it stores. Implemented for every
/// `Allocator` via a blanket impl.
///
/// # Safety
/// Same requirements as [`Allocator`]: pointers must not be used after
/// deallocation, and the deallocating call must name the same type and
/// count as the allocating one.
pub trait TypedAllocator: Allocator {
    /// Allocates storage for a single `T`
    ///
    /// The memory is **not initialized**.
    ///
    /// # Safety
    /// The caller must initialize the slot before reading it and release it
    /// with `dealloc_typed::<T>()` when done.
    #[inline]
    unsafe fn alloc_typed<T>(&self) -> AllocResult<NonNull<T>> {
        let layout = Layout::new::<T>();
        // SAFETY: Allocating memory for a single T.
        // - layout is derived from T at compile time
        // - allocate returns a valid, aligned pointer or an error
        let ptr = unsafe { self.allocate(layout)? };
        Ok(ptr.cast())
    }

    /// Allocates storage for `count` contiguous values of `T`
    ///
    /// Returns a pointer to the first slot. The memory is **not
    /// initialized**. A zero count allocates nothing and returns a dangling
    /// well-aligned pointer.
    ///
    /// # Safety
    /// - The caller must initialize a slot before reading it
    /// - Must release with `dealloc_array::<T>()` passing the same count
    ///
    /// # Errors
    /// Returns [`AllocError::CapacityOverflow`] when `count` elements do not
    /// describe a representable layout, or the provider's error unchanged.
    #[inline]
    unsafe fn alloc_array<T>(&self, count: usize) -> AllocResult<NonNull<T>> {
        if count == 0 {
            return Ok(NonNull::dangling());
        }

        let layout =
            Layout::array::<T>(count).map_err(|_| AllocError::capacity_overflow(count))?;

        // SAFETY: Allocating memory for an array of T.
        // - layout is valid (Layout::array checks for overflow)
        // - count > 0 (checked above)
        // - allocate returns a valid, aligned pointer or an error
        let ptr = unsafe { self.allocate(layout)? };
        Ok(ptr.cast())
    }

    /// Releases storage for a single `T`
    ///
    /// # Safety
    /// - `ptr` must have been allocated by `alloc_typed::<T>()` on this
    ///   allocator
    /// - If `T` has a destructor, the caller must have run it already
    /// - `ptr` must not be used after this call
    #[inline]
    unsafe fn dealloc_typed<T>(&self, ptr: NonNull<T>) {
        let layout = Layout::new::<T>();
        // SAFETY: Releasing a single-T block.
        // - ptr was allocated by alloc_typed (caller contract)
        // - layout matches the original allocation (derived from T)
        unsafe { self.deallocate(ptr.cast(), layout) }
    }

    /// Releases storage for `count` contiguous values of `T`
    ///
    /// # Safety
    /// - `ptr` must have been allocated by `alloc_array::<T>()` with the
    ///   same `count` on this allocator
    /// - Live elements must have been destroyed already
    /// - `ptr` must not be used after this call
    #[inline]
    unsafe fn dealloc_array<T>(&self, ptr: NonNull<T>, count: usize) {
        if count == 0 {
            return;
        }

        let layout = Layout::array::<T>(count).expect("layout was valid at allocation time");
        // SAFETY: Releasing an array block.
        // - ptr was allocated by alloc_array with the same count (caller contract)
        // - layout matches the original allocation (derived from T and count)
        // - count > 0 (checked above)
        unsafe { self.deallocate(ptr.cast(), layout) }
    }
}

/// Blanket implementation: every `Allocator` gets the typed view for free
impl<A: Allocator + ?Sized> TypedAllocator for A {}

/// Blanket implementation of `Allocator` for references
///
/// Allows using `&A` where an owned allocator is expected, which keeps a
/// single provider shareable across several containers.
///
/// # Safety
///
/// Sound because every call forwards to the underlying `A: Allocator`:
/// - No new unsafe operations introduced
/// - Safety contracts preserved through delegation
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: Forwarding to the underlying allocator.
        // - Same safety contract as A::allocate
        unsafe { (**self).allocate(layout) }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Forwarding to the underlying allocator.
        // - Same safety contract as A::deallocate
        unsafe { (**self).deallocate(ptr, layout) }
    }
}
