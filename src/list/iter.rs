//! Forward-only traversal over list nodes
//!
//! Links run one way, so none of these iterators are double-ended or
//! exact-sized; they simply follow the chain until it ends. A shared
//! walk can be recovered from an exclusive one via `From`, never the
//! other way around.

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::node::{Link, Node};
use super::LinkedList;
use crate::allocator::Allocator;

/// Shared iterator over a [`LinkedList`]
///
/// Cloning is cheap and remembers the position, so a walk can be
/// restarted from anywhere.
pub struct Iter<'a, T> {
    node: Link<T>,
    marker: PhantomData<&'a Node<T>>,
}

impl<T> Iter<'_, T> {
    pub(super) fn new(node: Link<T>) -> Self {
        Iter { node, marker: PhantomData }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.node?;
        // SAFETY: the node is live and borrowed shared for 'a
        unsafe {
            self.node = node.as_ref().next;
            Some(&(*node.as_ptr()).element)
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { node: self.node, marker: PhantomData }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// SAFETY: a shared walk only ever reads through &T
unsafe impl<T: Sync> Send for Iter<'_, T> {}

// SAFETY: a shared walk only ever reads through &T
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// Exclusive iterator over a [`LinkedList`]
///
/// Not cloneable: two exclusive walks over one chain cannot coexist.
pub struct IterMut<'a, T> {
    node: Link<T>,
    marker: PhantomData<&'a mut Node<T>>,
}

impl<T> IterMut<'_, T> {
    pub(super) fn new(node: Link<T>) -> Self {
        IterMut { node, marker: PhantomData }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let node = self.node?;
        // SAFETY: the iterator holds the list's exclusive borrow for 'a
        // and visits each node exactly once, so the borrows it hands out
        // never overlap
        unsafe {
            self.node = node.as_ref().next;
            Some(&mut (*node.as_ptr()).element)
        }
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").finish_non_exhaustive()
    }
}

// SAFETY: the exclusive walk hands out &mut T, so crossing threads
// follows T's own rules
unsafe impl<T: Send> Send for IterMut<'_, T> {}

// SAFETY: through &IterMut nothing of T is reachable mutably
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// Downgrades an exclusive walk to a shared one, keeping the position
///
/// The reverse direction does not exist: a shared walk never grants
/// exclusive access.
impl<'a, T> From<IterMut<'a, T>> for Iter<'a, T> {
    fn from(iter: IterMut<'a, T>) -> Self {
        Iter { node: iter.node, marker: PhantomData }
    }
}

/// Owning iterator over a [`LinkedList`]
///
/// Yields elements front to back, destroying each node as it goes.
/// Dropping the iterator releases whatever part of the chain remains.
pub struct IntoIter<T, A: Allocator> {
    list: LinkedList<T, A>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(super) fn new(list: LinkedList<T, A>) -> Self {
        IntoIter { list }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}
