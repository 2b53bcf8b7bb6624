//! Positional editing of a linked list

use core::fmt;

use super::node::Link;
use super::LinkedList;
use crate::allocator::Allocator;
use crate::error::AllocResult;

/// An edit cursor over a [`LinkedList`]
///
/// The cursor stands on a position, not between elements: either the
/// position before the first element, where [`Self::current`] is `None`,
/// or on a live node. Edits reach strictly past the position, through the
/// link that leaves it, so the node under the cursor can never be removed
/// out from under it and the position stays valid for the cursor's whole
/// life.
///
/// # Examples
///
/// ```
/// use stowage::LinkedList;
///
/// let mut list = LinkedList::from_iter([1, 3])?;
/// let mut cursor = list.cursor_mut();
/// cursor.move_next();
/// cursor.insert_after(2)?;
///
/// assert_eq!(cursor.current(), Some(&1));
/// drop(cursor);
/// assert_eq!(list, LinkedList::from_iter([1, 2, 3])?);
/// # Ok::<(), stowage::AllocError>(())
/// ```
pub struct CursorMut<'a, T, A: Allocator> {
    list: &'a mut LinkedList<T, A>,
    pos: Link<T>,
}

impl<'a, T, A: Allocator> CursorMut<'a, T, A> {
    pub(super) fn new(list: &'a mut LinkedList<T, A>) -> Self {
        CursorMut { list, pos: None }
    }

    /// Steps onto the next element
    ///
    /// Returns `false` and stays put when no element follows. The first
    /// call from a fresh cursor steps onto the front element.
    pub fn move_next(&mut self) -> bool {
        // SAFETY: the cursor position is always valid for its list
        match unsafe { self.list.next_of(self.pos) } {
            Some(node) => {
                self.pos = Some(node);
                true
            }
            None => false,
        }
    }

    /// The element under the cursor, or `None` before the first
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        // SAFETY: a node position stays live for the cursor's lifetime
        self.pos.map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// The element under the cursor, mutably
    pub fn current_mut(&mut self) -> Option<&mut T> {
        // SAFETY: a node position stays live for the cursor's lifetime,
        // and the cursor holds the list's exclusive borrow
        self.pos.map(|node| unsafe { &mut (*node.as_ptr()).element })
    }

    /// The element the cursor would step onto, without moving
    #[must_use]
    pub fn peek_next(&self) -> Option<&T> {
        // SAFETY: the cursor position is always valid for its list
        let next = unsafe { self.list.next_of(self.pos) };
        // SAFETY: a linked node is live
        next.map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// Inserts an element right after the cursor
    ///
    /// Inserting from a fresh cursor prepends to the list. On success the
    /// cursor stays put and a reference to the new slot is returned; on
    /// allocation failure the element is dropped and the list unchanged.
    pub fn insert_after(&mut self, element: T) -> AllocResult<&mut T> {
        // SAFETY: the cursor position is always valid for its list
        let follow = unsafe { self.list.next_of(self.pos) };
        let node = self.list.create_node(element, follow)?;
        // SAFETY: the new node already carries the link to the old
        // successor, so the chain stays intact across this write
        unsafe { self.list.set_next(self.pos, Some(node)) };
        // SAFETY: the node is linked in and owned by the list
        Ok(unsafe { &mut (*node.as_ptr()).element })
    }

    /// Inserts every item after the cursor, in iterator order
    ///
    /// The cursor advances onto each inserted node and finishes on the
    /// last one, ready to keep appending. Returns the number of elements
    /// inserted; on allocation failure those already inserted stay.
    pub fn splice_after<I>(&mut self, iter: I) -> AllocResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut inserted = 0;
        for value in iter {
            self.insert_after(value)?;
            self.move_next();
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Removes and returns the element right after the cursor
    pub fn remove_after(&mut self) -> Option<T> {
        // SAFETY: the cursor position is always valid for its list
        let target = unsafe { self.list.next_of(self.pos) }?;
        // SAFETY: target is live; unlink it before releasing its node
        unsafe {
            let after = target.as_ref().next;
            self.list.set_next(self.pos, after);
            Some(self.list.take_node(target).element)
        }
    }

    /// Removes up to `n` elements following the cursor
    ///
    /// Stops early at the end of the list. Returns how many were
    /// actually removed.
    pub fn remove_after_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n {
            if self.remove_after().is_none() {
                break;
            }
            removed += 1;
        }
        removed
    }

    /// Removes everything after the cursor
    ///
    /// From a fresh cursor this empties the whole list. Returns how many
    /// elements were removed.
    pub fn truncate_rest(&mut self) -> usize {
        // SAFETY: the cursor position is always valid for its list
        unsafe { self.list.truncate_after(self.pos) }
    }
}

impl<T, A: Allocator> fmt::Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::list::LinkedList;

    fn drain<T: Copy>(list: &LinkedList<T>) -> Vec<T> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_fresh_cursor_sits_before_the_front() {
        let mut list = LinkedList::from_iter([1, 2]).unwrap();
        let mut cursor = list.cursor_mut();
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.peek_next(), Some(&1));
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&1));
    }

    #[test]
    fn test_move_next_stops_at_the_tail() {
        let mut list = LinkedList::from_iter([1]).unwrap();
        let mut cursor = list.cursor_mut();
        assert!(cursor.move_next());
        assert!(!cursor.move_next());
        assert_eq!(cursor.current(), Some(&1));
    }

    #[test]
    fn test_insert_after_at_the_front() {
        let mut list = LinkedList::from_iter([2, 3]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.insert_after(1).unwrap();
        assert_eq!(cursor.current(), None);
        drop(cursor);
        assert_eq!(drain(&list), [1, 2, 3]);
    }

    #[test]
    fn test_insert_after_mid_chain() {
        let mut list = LinkedList::from_iter([1, 3]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        let slot = cursor.insert_after(0).unwrap();
        *slot = 2;
        drop(cursor);
        assert_eq!(drain(&list), [1, 2, 3]);
    }

    #[test]
    fn test_splice_after_finishes_on_the_last_inserted() {
        let mut list = LinkedList::from_iter([1, 5]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        let inserted = cursor.splice_after([2, 3, 4]).unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(cursor.current(), Some(&4));
        assert_eq!(cursor.peek_next(), Some(&5));
        drop(cursor);
        assert_eq!(drain(&list), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_splice_after_into_an_empty_list() {
        let mut list = LinkedList::new();
        let mut cursor = list.cursor_mut();
        cursor.splice_after([1, 2, 3]).unwrap();
        drop(cursor);
        assert_eq!(drain(&list), [1, 2, 3]);
    }

    #[test]
    fn test_remove_after_unlinks_the_successor() {
        let mut list = LinkedList::from_iter([1, 2, 3]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        assert_eq!(cursor.remove_after(), Some(2));
        assert_eq!(cursor.current(), Some(&1));
        drop(cursor);
        assert_eq!(drain(&list), [1, 3]);
    }

    #[test]
    fn test_remove_after_at_the_tail_is_a_no_op() {
        let mut list = LinkedList::from_iter([1]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        assert_eq!(cursor.remove_after(), None);
    }

    #[test]
    fn test_remove_after_n_stops_at_the_end() {
        let mut list = LinkedList::from_iter([1, 2, 3, 4]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        assert_eq!(cursor.remove_after_n(10), 3);
        drop(cursor);
        assert_eq!(drain(&list), [1]);
    }

    #[test]
    fn test_truncate_rest_keeps_the_prefix() {
        let mut list = LinkedList::from_iter([1, 2, 3, 4, 5]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor.truncate_rest(), 3);
        drop(cursor);
        assert_eq!(drain(&list), [1, 2]);
    }

    #[test]
    fn test_truncate_rest_from_a_fresh_cursor_clears() {
        let mut list = LinkedList::from_iter([1, 2, 3]).unwrap();
        assert_eq!(list.cursor_mut().truncate_rest(), 3);
        assert!(list.is_empty());
    }

    #[test]
    fn test_current_mut_edits_in_place() {
        let mut list = LinkedList::from_iter([10, 20]).unwrap();
        let mut cursor = list.cursor_mut();
        cursor.move_next();
        cursor.move_next();
        if let Some(value) = cursor.current_mut() {
            *value += 1;
        }
        drop(cursor);
        assert_eq!(drain(&list), [10, 21]);
    }
}
