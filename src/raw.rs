//! Raw storage block underlying the contiguous containers
//!
//! # Safety
//!
//! This module separates *owning memory* from *owning elements*:
//! - `RawBuffer` owns exactly one allocation (or none) and releases it on
//!   drop without running any element destructor
//! - Slot operations (`write`, `read`, `drop_range`) move values in and out
//!   of individual slots; the caller tracks which slots are live
//! - Zero-sized element types never touch the allocator: the block is a
//!   dangling well-aligned pointer with virtually unbounded capacity
//!
//! ## Safety Contracts
//!
//! - A slot index passed to any slot operation must be below `capacity()`
//! - `read` and `drop_range` require the slots to be initialized
//! - `write` requires the slot to be dead (uninitialized or already moved
//!   out), otherwise the old value leaks

use core::ptr::{self, NonNull};

use crate::allocator::{Allocator, TypedAllocator};
use crate::error::AllocResult;

/// One owned allocation holding up to `cap` slots of `T`
///
/// Dropping a `RawBuffer` releases the memory only. Destroying live
/// elements first is the owner's job.
pub(crate) struct RawBuffer<T, A: Allocator> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
}

impl<T, A: Allocator> RawBuffer<T, A> {
    #[inline]
    const fn is_zst() -> bool {
        size_of::<T>() == 0
    }

    /// An empty block: no allocation, dangling pointer
    ///
    /// For zero-sized `T` the capacity is `usize::MAX` from the start, so
    /// the owner never asks for growth.
    #[inline]
    pub(crate) const fn new_in(alloc: A) -> Self {
        let cap = if Self::is_zst() { usize::MAX } else { 0 };
        RawBuffer { ptr: NonNull::dangling(), cap, alloc }
    }

    /// Allocates a block with room for exactly `cap` elements
    ///
    /// A zero `cap` (or a zero-sized `T`) allocates nothing.
    pub(crate) fn with_capacity_in(cap: usize, alloc: A) -> AllocResult<Self> {
        if Self::is_zst() || cap == 0 {
            return Ok(Self::new_in(alloc));
        }

        // SAFETY: Acquiring uninitialized storage for cap elements.
        // - cap > 0 and T is not zero-sized (checked above)
        // - alloc_array validates the layout and reports overflow
        let ptr = unsafe { alloc.alloc_array::<T>(cap)? };
        Ok(RawBuffer { ptr, cap, alloc })
    }

    /// First slot of the block
    #[inline]
    pub(crate) fn ptr(&self) -> NonNull<T> {
        self.ptr
    }

    /// Number of slots the block can hold
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// The provider this block came from
    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Raw pointer to slot `index`
    ///
    /// # Safety
    /// `index` must not exceed `capacity()`. (One past the end is allowed
    /// for arithmetic, as with any raw pointer.)
    #[inline]
    pub(crate) unsafe fn slot_ptr(&self, index: usize) -> *mut T {
        if Self::is_zst() {
            // Every ZST slot is the same dangling address
            return self.ptr.as_ptr();
        }
        // SAFETY: index is within the allocated block (caller contract),
        // so the offset stays inside the same allocation.
        unsafe { self.ptr.as_ptr().add(index) }
    }

    /// Moves `value` into slot `index`
    ///
    /// # Safety
    /// - `index < capacity()`
    /// - The slot must be dead; an initialized slot would leak its value
    #[inline]
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        // SAFETY: Writing to a dead slot inside the block.
        // - slot_ptr stays in bounds (caller contract on index)
        // - ptr::write does not drop the previous contents
        unsafe { self.slot_ptr(index).write(value) };
    }

    /// Moves the value out of slot `index`, leaving the slot dead
    ///
    /// # Safety
    /// - `index < capacity()`
    /// - The slot must be initialized
    /// - The slot must not be read or dropped again until rewritten
    #[inline]
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        // SAFETY: Reading an initialized slot (caller contract).
        // - slot_ptr stays in bounds (caller contract on index)
        // - ptr::read leaves the slot bitwise intact but logically dead
        unsafe { self.slot_ptr(index).read() }
    }

    /// Runs destructors for `len` slots starting at `start`
    ///
    /// The slots are dead afterwards.
    ///
    /// # Safety
    /// - `start + len <= capacity()`
    /// - All `len` slots must be initialized
    pub(crate) unsafe fn drop_range(&mut self, start: usize, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: Destroying initialized slots in place.
        // - The range lies within the block (caller contract)
        // - Slice drop glue keeps destroying remaining elements even if
        //   one destructor panics
        unsafe {
            let slice = ptr::slice_from_raw_parts_mut(self.slot_ptr(start), len);
            ptr::drop_in_place(slice);
        }
    }

    /// Replaces the block with a fresh one of exactly `new_cap` slots
    ///
    /// The first `keep` of the `live` initialized slots are bitwise-moved
    /// into the fresh block; the remaining `live - keep` are destroyed; the
    /// old block is released. The fresh block is acquired before anything
    /// else happens, so a failed allocation leaves the block and every
    /// element untouched.
    ///
    /// Zero-sized element types skip the storage exchange entirely and only
    /// run the destructors of the abandoned tail.
    ///
    /// # Safety
    /// - The first `live` slots must be initialized
    /// - `keep <= live` and `keep <= new_cap`
    pub(crate) unsafe fn reallocate(
        &mut self,
        live: usize,
        keep: usize,
        new_cap: usize,
    ) -> AllocResult<()> {
        debug_assert!(keep <= live);
        debug_assert!(keep <= new_cap || Self::is_zst());

        if Self::is_zst() {
            // SAFETY: Slots keep..live are initialized (caller contract).
            unsafe { self.drop_range(keep, live - keep) };
            return Ok(());
        }

        // SAFETY: Acquiring the replacement block first.
        // - new_cap elements of T describe a valid layout or alloc_array
        //   reports the overflow
        // - On failure we return before touching any slot
        let new_ptr = unsafe { self.alloc.alloc_array::<T>(new_cap)? };

        // SAFETY: Relocating the surviving values into the fresh block.
        // - Both ranges are in bounds (caller contract)
        // - The blocks never overlap (the new one was just allocated)
        // - A bitwise copy is a move; the source slots are dead afterwards
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), keep);
        }

        // SAFETY: Slots keep..live are initialized (caller contract) and
        // were not moved, so they die here.
        unsafe { self.drop_range(keep, live - keep) };

        // SAFETY: Releasing the old block exactly once.
        // - ptr and cap are the values alloc_array returned them with
        // - Every slot is dead (moved or destroyed above)
        unsafe { self.alloc.dealloc_array(self.ptr, self.cap) };

        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        if Self::is_zst() || self.cap == 0 {
            return;
        }
        // SAFETY: Releasing the block exactly once.
        // - ptr and cap are the values alloc_array returned them with
        // - Live elements were destroyed by the owner before this runs
        unsafe { self.alloc.dealloc_array(self.ptr, self.cap) };
    }
}

// SAFETY: RawBuffer owns its allocation exclusively; the raw pointer is
// never shared outside the owner, so thread transfer is governed by the
// element and allocator types alone.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuffer<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuffer<T, A> {}
