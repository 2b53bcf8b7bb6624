//! Growable contiguous sequence
//!
//! [`Array`] stores its elements in one allocation and keeps them densely
//! packed at the front. Random access is O(1), push and pop at the back are
//! amortized O(1). Every operation that might allocate is fallible and
//! reports [`AllocError`] instead of aborting.
//!
//! Storage never grows in place. Growth acquires a fresh block, moves the
//! live elements across, and releases the old block only then, so a failed
//! allocation leaves the sequence exactly as it was.

mod iter;

pub use iter::IntoIter;

use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

use crate::allocator::{Allocator, SystemAllocator};
use crate::error::{AllocError, AllocResult, BuildError, BuildResult};
use crate::raw::RawBuffer;

/// Growable contiguous sequence with pluggable storage
///
/// The second parameter selects the memory provider; it defaults to the
/// global heap. All elements live in a single block, so the whole sequence
/// can be viewed as a slice at any time via [`Deref`].
///
/// # Examples
///
/// ```
/// use stowage::Array;
///
/// let mut numbers = Array::new();
/// numbers.push_back(1)?;
/// numbers.push_back(2)?;
/// numbers.push_back(3)?;
///
/// assert_eq!(numbers.as_slice(), &[1, 2, 3]);
/// assert_eq!(numbers.pop_back(), Some(3));
/// # Ok::<(), stowage::AllocError>(())
/// ```
pub struct Array<T, A: Allocator = SystemAllocator> {
    buf: RawBuffer<T, A>,
    len: usize,
}

impl<T> Array<T> {
    /// Creates an empty array backed by the global heap
    ///
    /// Does not allocate until the first element arrives.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(SystemAllocator)
    }

    /// Creates an array with room for `n` elements, none of them live
    pub fn with_capacity(n: usize) -> AllocResult<Self> {
        Self::with_capacity_in(n, SystemAllocator)
    }

    /// Creates an array holding `n` clones of `value`
    pub fn from_elem(value: T, n: usize) -> AllocResult<Self>
    where
        T: Clone,
    {
        Self::from_elem_in(value, n, SystemAllocator)
    }

    /// Creates an array from any iterator
    // Fallible construction, so std's infallible FromIterator does not fit
    #[expect(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> AllocResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_iter_in(iter, SystemAllocator)
    }

    /// Creates an array from an iterator of fallible elements
    ///
    /// See [`Array::from_fallible_iter_in`].
    pub fn from_fallible_iter<I, E>(iter: I) -> BuildResult<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        Self::from_fallible_iter_in(iter, SystemAllocator)
    }
}

impl<T, A: Allocator> Array<T, A> {
    /// Creates an empty array using the given provider
    ///
    /// Does not allocate until the first element arrives.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Array { buf: RawBuffer::new_in(alloc), len: 0 }
    }

    /// Creates an array with room for exactly `n` elements, none of them
    /// live
    pub fn with_capacity_in(n: usize, alloc: A) -> AllocResult<Self> {
        Ok(Array { buf: RawBuffer::with_capacity_in(n, alloc)?, len: 0 })
    }

    /// Creates an array holding `n` clones of `value`
    ///
    /// If a clone panics partway through, every element constructed so far
    /// is destroyed and the storage released before the panic continues.
    pub fn from_elem_in(value: T, n: usize, alloc: A) -> AllocResult<Self>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(n, alloc)?;
        for _ in 0..n {
            // Capacity is reserved, so this never reallocates
            array.push_back(value.clone())?;
        }
        Ok(array)
    }

    /// Creates an array from any iterator
    ///
    /// Reserves the iterator's lower size bound up front and appends from
    /// there, growing as needed. The array is returned only once the
    /// iterator is exhausted, so a panic partway through destroys every
    /// element built so far.
    pub fn from_iter_in<I>(iter: I, alloc: A) -> AllocResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut array = Self::with_capacity_in(lower, alloc)?;
        for value in iter {
            array.push_back(value)?;
        }
        Ok(array)
    }

    /// Creates an array from an iterator of fallible elements
    ///
    /// The first `Err` aborts construction: every element built before it
    /// is destroyed, the storage is released, and the element error comes
    /// back as [`BuildError::Construct`].
    pub fn from_fallible_iter_in<I, E>(iter: I, alloc: A) -> BuildResult<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut array = Self::with_capacity_in(lower, alloc)?;
        for value in iter {
            match value {
                Ok(value) => {
                    array.push_back(value)?;
                }
                // Dropping the partial array destroys everything built so
                // far and releases its storage
                Err(e) => return Err(BuildError::Construct(e)),
            }
        }
        Ok(array)
    }

    /// Number of live elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current storage can hold
    ///
    /// Zero-sized element types report a virtually unbounded capacity, as
    /// their storage is never actually allocated.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The memory provider this array allocates from
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// The live elements as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// The live elements as a mutable slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Ensures capacity for at least `n` elements
    ///
    /// Grows storage to exactly `n` slots when the current capacity is
    /// smaller; never shrinks.
    pub fn reserve(&mut self, n: usize) -> AllocResult<()> {
        if n > self.buf.capacity() {
            self.grow_exact(n)?;
        }
        Ok(())
    }

    /// Resizes storage to exactly `n` slots
    ///
    /// Growing only acquires room: no new elements are constructed. If `n`
    /// is below the current length, elements at index `n` and beyond are
    /// destroyed with the excess capacity. A failed allocation changes
    /// nothing, in either direction.
    pub fn resize(&mut self, n: usize) -> AllocResult<()> {
        let cap = self.buf.capacity();
        if n > cap {
            self.grow_exact(n)?;
        } else if n < cap {
            let keep = self.len.min(n);
            // SAFETY: The first len slots are live; keep <= len and
            // keep <= n by construction.
            unsafe { self.buf.reallocate(self.len, keep, n)? };
            self.len = keep;
            #[cfg(feature = "logging")]
            debug!("array storage shrank to {} slots ({} live)", n, self.len);
        }
        Ok(())
    }

    /// Appends an element, returning a reference to it
    ///
    /// Amortized O(1): a full array doubles its capacity (starting at one
    /// slot) before the element is constructed in place at the end.
    pub fn push_back(&mut self, value: T) -> AllocResult<&mut T> {
        if self.len == self.buf.capacity() {
            let target = self.next_capacity()?;
            self.grow_exact(target)?;
        }

        // SAFETY: len < capacity after the growth check, and slot len is
        // dead (slots at and beyond len always are).
        unsafe { self.buf.write(self.len, value) };
        self.len += 1;

        // SAFETY: Slot len - 1 was just initialized; the borrow is tied to
        // &mut self.
        Ok(unsafe { &mut *self.buf.slot_ptr(self.len - 1) })
    }

    /// Appends every element of an exact-size iterator
    ///
    /// Grows at most once, to the current capacity plus the incoming
    /// length, then appends in one pass. A failed growth changes nothing.
    pub fn extend_back<I>(&mut self, iter: I) -> AllocResult<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        let additional = iter.len();
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::capacity_overflow(additional))?;

        if needed > self.buf.capacity() {
            let target = self
                .buf
                .capacity()
                .checked_add(additional)
                .ok_or(AllocError::capacity_overflow(additional))?;
            self.grow_exact(target)?;
        }

        for value in iter {
            // Room is reserved; this only reallocates if the iterator
            // reported a shorter length than it yields
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Removes and returns the last element, or `None` when empty
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: Slot len holds the element that was just the last live
        // one; shrinking len first marks it dead.
        Some(unsafe { self.buf.read(self.len) })
    }

    /// Destroys every live element, keeping the storage
    pub fn clear(&mut self) {
        let live = self.len;
        self.len = 0;
        // SAFETY: Exactly the first live slots were initialized; len is
        // already zero in case a destructor panics.
        unsafe { self.buf.drop_range(0, live) };
    }

    /// Destroys elements at index `n` and beyond, keeping the storage
    ///
    /// Does nothing when `n` is at or above the current length.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        let doomed = self.len - n;
        self.len = n;
        // SAFETY: Slots n..n + doomed were live; len is already reduced in
        // case a destructor panics.
        unsafe { self.buf.drop_range(n, doomed) };
    }

    /// Replaces the contents with a copy of `other`
    ///
    /// The replacement is built in full before the current contents are
    /// touched, so a failed allocation or a cloning panic leaves this
    /// array unchanged. This also makes self-assignment harmless.
    pub fn try_clone_from(&mut self, other: &Array<T, A>) -> AllocResult<()>
    where
        T: Clone,
        A: Clone,
    {
        let replacement = Self::from_iter_in(other.iter().cloned(), self.allocator().clone())?;
        *self = replacement;
        Ok(())
    }

    /// Returns a deep copy of the array
    pub fn try_clone(&self) -> AllocResult<Self>
    where
        T: Clone,
        A: Clone,
    {
        Self::from_iter_in(self.iter().cloned(), self.allocator().clone())
    }

    /// Moves the contents out, leaving this array empty with no storage
    ///
    /// The returned array owns the previous storage and elements; this one
    /// stays usable and allocates fresh on the next push.
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::new_in(self.allocator().clone());
        core::mem::replace(self, empty)
    }

    /// Doubling schedule: one slot from empty, twice the capacity after
    fn next_capacity(&self) -> AllocResult<usize> {
        let cap = self.buf.capacity();
        if cap == 0 {
            Ok(1)
        } else {
            cap.checked_mul(2).ok_or(AllocError::capacity_overflow(cap))
        }
    }

    /// Grows storage to exactly `new_cap` slots
    fn grow_exact(&mut self, new_cap: usize) -> AllocResult<()> {
        debug_assert!(new_cap >= self.len);
        // SAFETY: The first len slots are live and all of them move.
        match unsafe { self.buf.reallocate(self.len, self.len, new_cap) } {
            Ok(()) => {
                #[cfg(feature = "logging")]
                trace!("array storage grew to {} slots ({} live)", new_cap, self.len);
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "logging")]
                warn!("array growth to {} slots failed: {}", new_cap, err);
                Err(err)
            }
        }
    }
}

impl<T, A: Allocator> Drop for Array<T, A> {
    fn drop(&mut self) {
        // SAFETY: Exactly the first len slots are live. The buffer's own
        // drop releases the storage afterwards.
        unsafe { self.buf.drop_range(0, self.len) };
    }
}

impl<T, A: Allocator> Deref for Array<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        // SAFETY: The first len slots are initialized and the pointer is
        // well aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.ptr().as_ptr(), self.len) }
    }
}

impl<T, A: Allocator> DerefMut for Array<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: Same as Deref; the borrow is exclusive.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().as_ptr(), self.len) }
    }
}

impl<T, A: Allocator + Default> Default for Array<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Array<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<Array<T, B>> for Array<T, A> {
    /// Compares live elements only; spare capacity is not part of value
    /// identity
    fn eq(&self, other: &Array<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Array<T, A> {}

impl<T, A: Allocator> IntoIterator for Array<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    /// Consumes the array into an owning iterator over its elements
    fn into_iter(self) -> IntoIter<T, A> {
        let this = ManuallyDrop::new(self);
        // SAFETY: Array's drop will not run, so both the block and the
        // elements transfer to the iterator exactly once.
        let buf = unsafe { ptr::read(&this.buf) };
        IntoIter::new(buf, this.len)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Array<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Array<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
