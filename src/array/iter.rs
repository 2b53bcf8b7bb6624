//! Owning iterator over an array's elements

use core::fmt;
use core::iter::FusedIterator;
use core::slice;

use crate::allocator::Allocator;
use crate::raw::RawBuffer;

/// Iterator that consumes an [`Array`](crate::Array), yielding its elements
/// by value
///
/// Iteration works from both ends and always knows how many elements
/// remain. Elements not yielded by the time the iterator is dropped are
/// destroyed with it, and the storage is released.
///
/// Positions are tracked as indices into the block rather than raw
/// pointers, which keeps the arithmetic uniform for zero-sized element
/// types.
pub struct IntoIter<T, A: Allocator> {
    buf: RawBuffer<T, A>,
    front: usize,
    back: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// Takes ownership of a block whose first `len` slots are live
    pub(crate) fn new(buf: RawBuffer<T, A>, len: usize) -> Self {
        IntoIter { buf, front: 0, back: len }
    }

    /// The elements not yet yielded, as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Slots front..back are exactly the remaining live ones,
        // and the base pointer is aligned even for an empty block.
        unsafe {
            slice::from_raw_parts(self.buf.slot_ptr(self.front).cast_const(), self.back - self.front)
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: Slot index was live and is now marked consumed by the
        // cursor advance.
        Some(unsafe { self.buf.read(index) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: Slot back was the last remaining live one; shrinking the
        // cursor first marks it consumed.
        Some(unsafe { self.buf.read(self.back) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let start = self.front;
        let live = self.back - self.front;
        self.front = self.back;
        // SAFETY: Exactly the slots start..start + live were still live.
        // The buffer's own drop releases the storage afterwards.
        unsafe { self.buf.drop_range(start, live) };
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
