//! Node layout for the singly linked list

use core::ptr::NonNull;

/// A link to a node, or `None` at the end of the chain
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// One heap-allocated element together with its forward link
///
/// The list's head link plays the sentinel role the chain needs: it is a
/// link without an element, so inserting at the front and inserting after
/// a node run through the same code path, and there is no way to ask the
/// before-first position for a value.
pub(crate) struct Node<T> {
    pub(crate) next: Link<T>,
    pub(crate) element: T,
}
