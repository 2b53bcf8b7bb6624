//! Literal-style constructors for the containers
//!
//! Both macros expand to the fallible constructors, so they yield
//! [`AllocResult`](crate::AllocResult) and compose with `?` instead of
//! hiding an abort inside a literal.

/// Creates an [`Array`](crate::Array) from a list of elements
///
/// Mirrors the `vec!` forms: empty, `value; count`, and comma-separated
/// elements. Every form evaluates to an
/// [`AllocResult`](crate::AllocResult).
///
/// # Examples
/// ```
/// use stowage::array;
///
/// let numbers = array![1, 2, 3]?;
/// assert_eq!(numbers.as_slice(), &[1, 2, 3]);
///
/// let zeros = array![0u8; 4]?;
/// assert_eq!(zeros.as_slice(), &[0, 0, 0, 0]);
/// # Ok::<(), stowage::AllocError>(())
/// ```
#[macro_export]
macro_rules! array {
    () => {
        $crate::AllocResult::Ok($crate::Array::new())
    };

    ($value:expr; $n:expr) => {
        $crate::Array::from_elem($value, $n)
    };

    ($($x:expr),+ $(,)?) => {
        $crate::Array::from_iter([$($x),+])
    };
}

/// Creates a [`LinkedList`](crate::LinkedList) from a list of elements
///
/// Elements appear in written order. Every form evaluates to an
/// [`AllocResult`](crate::AllocResult).
///
/// # Examples
/// ```
/// use stowage::linked_list;
///
/// let chain = linked_list!["a", "b", "c"]?;
/// assert_eq!(chain.front(), Some(&"a"));
/// assert_eq!(chain.len(), 3);
/// # Ok::<(), stowage::AllocError>(())
/// ```
#[macro_export]
macro_rules! linked_list {
    () => {
        $crate::AllocResult::Ok($crate::LinkedList::new())
    };

    ($value:expr; $n:expr) => {
        $crate::LinkedList::from_elem($value, $n)
    };

    ($($x:expr),+ $(,)?) => {
        $crate::LinkedList::from_iter([$($x),+])
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_array_macro_forms() {
        let empty: crate::Array<i32> = crate::array![].unwrap();
        assert!(empty.is_empty());

        let repeated = crate::array![7; 3].unwrap();
        assert_eq!(repeated.as_slice(), &[7, 7, 7]);

        let listed = crate::array![1, 2, 3,].unwrap();
        assert_eq!(listed.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_linked_list_macro_forms() {
        let empty: crate::LinkedList<i32> = crate::linked_list![].unwrap();
        assert!(empty.is_empty());

        let repeated = crate::linked_list!["x"; 2].unwrap();
        assert_eq!(repeated.len(), 2);

        let listed = crate::linked_list![1, 2, 3].unwrap();
        let got: Vec<i32> = listed.iter().copied().collect();
        assert_eq!(got, [1, 2, 3]);
    }
}
