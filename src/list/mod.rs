//! Singly linked sequence
//!
//! [`LinkedList`] chains one heap allocation per element. Pushing at the
//! front is O(1) and never moves an existing element; traversal is
//! forward-only. Every operation that might allocate is fallible and
//! reports [`AllocError`] instead of aborting.
//!
//! Positional edits go through [`CursorMut`], which works on the link
//! *after* its position. The position before the first element counts,
//! so inserting at the front and inserting mid-chain share one code path.

mod cursor;
mod iter;
mod node;

pub use cursor::CursorMut;
pub use iter::{IntoIter, Iter, IterMut};

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

#[cfg(feature = "logging")]
use tracing::warn;

use crate::allocator::{Allocator, SystemAllocator, TypedAllocator};
use crate::error::{AllocResult, BuildError, BuildResult};
use node::{Link, Node};

/// Singly linked sequence with pluggable storage
///
/// The second parameter selects the memory provider; it defaults to the
/// global heap. Elements live in separate nodes, so the list never
/// relocates a value once it is stored.
///
/// The list keeps no element count. [`Self::len`] walks the chain, while
/// [`Self::is_empty`] is O(1); prefer the latter when only emptiness
/// matters.
///
/// # Examples
///
/// ```
/// use stowage::LinkedList;
///
/// let mut recent = LinkedList::new();
/// recent.push_front("beta")?;
/// recent.push_front("alpha")?;
///
/// assert_eq!(recent.front(), Some(&"alpha"));
/// assert_eq!(recent.pop_front(), Some("alpha"));
/// # Ok::<(), stowage::AllocError>(())
/// ```
pub struct LinkedList<T, A: Allocator = SystemAllocator> {
    head: Link<T>,
    alloc: A,
    marker: PhantomData<T>,
}

impl<T> LinkedList<T> {
    /// Creates an empty list backed by the global heap
    ///
    /// Does not allocate until the first element arrives.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(SystemAllocator)
    }

    /// Creates a list of `n` default-constructed elements
    pub fn with_len(n: usize) -> AllocResult<Self>
    where
        T: Default,
    {
        Self::with_len_in(n, SystemAllocator)
    }

    /// Creates a list holding `n` clones of `value`
    pub fn from_elem(value: T, n: usize) -> AllocResult<Self>
    where
        T: Clone,
    {
        Self::from_elem_in(value, n, SystemAllocator)
    }

    /// Creates a list from any iterator
    // Fallible construction, so std's infallible FromIterator does not fit
    #[expect(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> AllocResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_iter_in(iter, SystemAllocator)
    }

    /// Creates a list from an iterator of fallible elements
    ///
    /// See [`LinkedList::from_fallible_iter_in`].
    pub fn from_fallible_iter<I, E>(iter: I) -> BuildResult<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        Self::from_fallible_iter_in(iter, SystemAllocator)
    }
}

impl<T, A: Allocator> LinkedList<T, A> {
    /// Creates an empty list using the given provider
    ///
    /// Does not allocate until the first element arrives.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        LinkedList { head: None, alloc, marker: PhantomData }
    }

    /// Creates a list of `n` default-constructed elements
    pub fn with_len_in(n: usize, alloc: A) -> AllocResult<Self>
    where
        T: Default,
    {
        Self::from_iter_in((0..n).map(|_| T::default()), alloc)
    }

    /// Creates a list holding `n` clones of `value`
    pub fn from_elem_in(value: T, n: usize, alloc: A) -> AllocResult<Self>
    where
        T: Clone,
    {
        Self::from_iter_in(core::iter::repeat_n(value, n), alloc)
    }

    /// Creates a list from any iterator, preserving its order
    ///
    /// If an allocation fails partway through, every node built so far is
    /// destroyed and released before the error is returned.
    pub fn from_iter_in<I>(iter: I, alloc: A) -> AllocResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new_in(alloc);
        let mut tail: Link<T> = None;
        for value in iter {
            let node = list.create_node(value, None)?;
            // SAFETY: tail is the sentinel position or the last node of
            // this list
            unsafe { list.set_next(tail, Some(node)) };
            tail = Some(node);
        }
        Ok(list)
    }

    /// Creates a list from an iterator of fallible elements
    ///
    /// The first `Err` stops construction: nodes built so far are
    /// destroyed, no node is allocated for the failed element, and the
    /// error is handed back as [`BuildError::Construct`].
    pub fn from_fallible_iter_in<I, E>(iter: I, alloc: A) -> BuildResult<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut list = Self::new_in(alloc);
        let mut tail: Link<T> = None;
        for item in iter {
            match item {
                Ok(value) => {
                    let node = list.create_node(value, None)?;
                    // SAFETY: tail is the sentinel position or the last
                    // node of this list
                    unsafe { list.set_next(tail, Some(node)) };
                    tail = Some(node);
                }
                Err(err) => return Err(BuildError::Construct(err)),
            }
        }
        Ok(list)
    }

    /// Whether the list holds no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Counts the elements by walking the chain
    ///
    /// The list stores no length, so this is O(n). Use
    /// [`Self::is_empty`] when only emptiness matters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// The memory provider this list allocates from
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The first element, if any
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        // SAFETY: a set head link points at a live node owned by this list
        self.head.map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// The first element, mutably, if any
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: a set head link points at a live node owned by this
        // list, and &mut self makes the borrow exclusive
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).element })
    }

    /// Prepends an element and returns a reference to its new slot
    ///
    /// If the node allocation fails the element is dropped and the list
    /// is left unchanged.
    pub fn push_front(&mut self, element: T) -> AllocResult<&mut T> {
        let node = self.create_node(element, self.head)?;
        self.head = Some(node);
        // SAFETY: the node was just linked in and is owned by this list
        Ok(unsafe { &mut (*node.as_ptr()).element })
    }

    /// Removes and returns the first element
    pub fn pop_front(&mut self) -> Option<T> {
        let first = self.head?;
        // SAFETY: first is the live head node; unlink it before releasing
        self.head = unsafe { first.as_ref().next };
        // SAFETY: the node is detached and came from create_node
        let node = unsafe { self.take_node(first) };
        Some(node.element)
    }

    /// Pushes every item to the front, one after another
    ///
    /// Each push lands before the previous one, so the batch comes out
    /// reversed: prepending `[1, 2, 3]` onto `[9]` yields `[3, 2, 1, 9]`.
    /// Returns the number of elements inserted; on allocation failure the
    /// elements already pushed stay in place.
    pub fn prepend_all<I>(&mut self, iter: I) -> AllocResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut pushed = 0;
        for value in iter {
            self.push_front(value)?;
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Replaces the contents with the iterator's items, reusing nodes
    ///
    /// Existing nodes are overwritten in order; the list then grows or
    /// shrinks to match the iterator's length. An allocation failure in
    /// the growing phase leaves the elements written so far in place.
    pub fn assign_iter<I>(&mut self, iter: I) -> AllocResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let mut iter = iter.into_iter();
        let mut pos: Link<T> = None;
        // Overwrite phase: reuse every node that already exists
        loop {
            // SAFETY: pos is the sentinel position or a node of this list
            let Some(node) = (unsafe { self.next_of(pos) }) else { break };
            let Some(value) = iter.next() else {
                // Iterator ran dry first: the leftover tail goes away
                // SAFETY: pos is a valid position of this list
                unsafe { self.truncate_after(pos) };
                return Ok(());
            };
            // SAFETY: node is live and &mut self makes the write exclusive
            unsafe { (*node.as_ptr()).element = value };
            pos = Some(node);
        }
        // Extend phase: the old nodes are used up, append the remainder
        for value in iter {
            let node = self.create_node(value, None)?;
            // SAFETY: pos is the sentinel position or the current tail
            unsafe { self.set_next(pos, Some(node)) };
            pos = Some(node);
        }
        Ok(())
    }

    /// Replaces the contents with a copy of `other`
    ///
    /// Reuses this list's existing nodes where possible, like
    /// [`Self::assign_iter`].
    pub fn try_clone_from(&mut self, other: &LinkedList<T, A>) -> AllocResult<()>
    where
        T: Clone,
    {
        self.assign_iter(other.iter().cloned())
    }

    /// Returns a deep copy of the list
    pub fn try_clone(&self) -> AllocResult<Self>
    where
        T: Clone,
        A: Clone,
    {
        Self::from_iter_in(self.iter().cloned(), self.alloc.clone())
    }

    /// Moves the contents out, leaving this list empty
    ///
    /// The returned list owns the previous nodes and releases them through
    /// a clone of the provider, so clones must reach the same underlying
    /// storage. This list stays usable.
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        LinkedList { head: self.head.take(), alloc: self.alloc.clone(), marker: PhantomData }
    }

    /// Reverses the list in place, relinking nodes without moving elements
    pub fn reverse(&mut self) {
        let Some(tail) = self.head else { return };
        // The old first node sinks to the back; each of its successors is
        // relinked to the front one at a time.
        loop {
            // SAFETY: tail stays a live node of this list throughout
            let Some(moved) = (unsafe { tail.as_ref().next }) else { break };
            // SAFETY: moved is tail's live successor; the three link
            // updates keep every node reachable exactly once
            unsafe {
                (*tail.as_ptr()).next = moved.as_ref().next;
                (*moved.as_ptr()).next = self.head;
            }
            self.head = Some(moved);
        }
    }

    /// Destroys every element and releases every node
    pub fn clear(&mut self) {
        // SAFETY: the sentinel position is always valid
        unsafe { self.truncate_after(None) };
    }

    /// A forward iterator over shared references
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head)
    }

    /// A forward iterator over exclusive references
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.head)
    }

    /// A cursor for positional edits, starting before the first element
    #[inline]
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut::new(self)
    }

    /// Allocates a node and moves `element` into it
    ///
    /// Failure constructs nothing: the allocation is acquired first, and
    /// if the provider refuses, `element` is dropped and the error
    /// returned with no node to clean up.
    fn create_node(&self, element: T, next: Link<T>) -> AllocResult<NonNull<Node<T>>> {
        // SAFETY: Node<T> is never zero-sized (it carries the link), so the
        // provider really allocates; the slot is initialized in full below
        // and released by take_node with the same type.
        let ptr = match unsafe { self.alloc.alloc_typed::<Node<T>>() } {
            Ok(ptr) => ptr,
            Err(err) => {
                #[cfg(feature = "logging")]
                warn!("list node allocation failed: {}", err);
                return Err(err);
            }
        };
        // SAFETY: the slot is writable and writing the whole node
        // initializes it
        unsafe { ptr.as_ptr().write(Node { next, element }) };
        Ok(ptr)
    }

    /// Moves a node's contents out and releases its allocation
    ///
    /// # Safety
    ///
    /// `node` must have come from `create_node` on this list and must no
    /// longer be reachable from any link.
    unsafe fn take_node(&self, node: NonNull<Node<T>>) -> Node<T> {
        // SAFETY:
        // - the pointer is valid for reads per the caller contract
        // - reading the whole node moves link and element out together
        let taken = unsafe { node.as_ptr().read() };
        // SAFETY: the allocation came from alloc_typed on this provider
        unsafe { self.alloc.dealloc_typed(node) };
        taken
    }

    /// The link leaving `pos`: the successor node or `None` at the end
    ///
    /// # Safety
    ///
    /// `pos` must be `None` (the sentinel position) or a live node of
    /// this list.
    unsafe fn next_of(&self, pos: Link<T>) -> Link<T> {
        match pos {
            // SAFETY: the caller guarantees the node is live
            Some(node) => unsafe { node.as_ref().next },
            None => self.head,
        }
    }

    /// Redirects the link leaving `pos`
    ///
    /// # Safety
    ///
    /// `pos` must be `None` (the sentinel position) or a live node of
    /// this list. The caller is responsible for keeping every node
    /// reachable or releasing it.
    unsafe fn set_next(&mut self, pos: Link<T>, link: Link<T>) {
        match pos {
            // SAFETY: the caller guarantees the node is live, and &mut
            // self makes the write exclusive
            Some(node) => unsafe { (*node.as_ptr()).next = link },
            None => self.head = link,
        }
    }

    /// Destroys everything after `pos` and returns how many nodes went
    ///
    /// # Safety
    ///
    /// `pos` must be `None` (the sentinel position) or a live node of
    /// this list.
    unsafe fn truncate_after(&mut self, pos: Link<T>) -> usize {
        // SAFETY: forwarded caller contract
        let mut doomed = unsafe { self.next_of(pos) };
        // SAFETY: pos stays in the list; everything after it is detached
        unsafe { self.set_next(pos, None) };
        let mut freed = 0;
        while let Some(node) = doomed {
            // SAFETY: the detached chain is owned here and walked once
            let node = unsafe { self.take_node(node) };
            doomed = node.next;
            freed += 1;
        }
        freed
    }
}

impl<T, A: Allocator> Drop for LinkedList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: Allocator + Default> Default for LinkedList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for LinkedList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Element-wise equality; the providers play no part
impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<LinkedList<T, B>> for LinkedList<T, A> {
    fn eq(&self, other: &LinkedList<T, B>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for LinkedList<T, A> {}

// SAFETY: the list owns its nodes and provider; sending it transfers that
// unique ownership as a whole
unsafe impl<T: Send, A: Allocator + Send> Send for LinkedList<T, A> {}

// SAFETY: shared access hands out &T only and never touches the provider
unsafe impl<T: Sync, A: Allocator + Sync> Sync for LinkedList<T, A> {}

impl<T, A: Allocator> IntoIterator for LinkedList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a LinkedList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut LinkedList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
