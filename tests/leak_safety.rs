//! Element lifecycle accounting tests
//!
//! These tests verify that every constructed element is destroyed exactly
//! once, across normal use, allocation failure, and panicking element
//! code, and that failed operations leave the containers untouched.

use std::alloc::Layout;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use stowage::{AllocError, AllocResult, Allocator, Array, LinkedList, SystemAllocator};

// ---------------------------------------------------------------------------
// Instrumented elements and providers
// ---------------------------------------------------------------------------

/// Shared birth/death ledger for leak accounting
#[derive(Debug, Default)]
struct Ledger {
    born: AtomicUsize,
    died: AtomicUsize,
}

impl Ledger {
    fn new() -> Self {
        Self::default()
    }

    fn births(&self) -> usize {
        self.born.load(Ordering::SeqCst)
    }

    fn deaths(&self) -> usize {
        self.died.load(Ordering::SeqCst)
    }

    fn balanced(&self) -> bool {
        self.births() == self.deaths()
    }
}

/// An element that reports its construction and destruction
#[derive(Debug)]
struct Tracked<'a> {
    ledger: &'a Ledger,
}

impl<'a> Tracked<'a> {
    fn new(ledger: &'a Ledger) -> Self {
        ledger.born.fetch_add(1, Ordering::SeqCst);
        Tracked { ledger }
    }
}

impl Clone for Tracked<'_> {
    fn clone(&self) -> Self {
        Tracked::new(self.ledger)
    }
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.ledger.died.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clones successfully while the fuse lasts, then panics
#[derive(Debug)]
struct Explosive<'a> {
    guard: Tracked<'a>,
    fuse: &'a AtomicUsize,
}

impl<'a> Explosive<'a> {
    fn new(ledger: &'a Ledger, fuse: &'a AtomicUsize) -> Self {
        Explosive { guard: Tracked::new(ledger), fuse }
    }
}

impl Clone for Explosive<'_> {
    fn clone(&self) -> Self {
        let spent = self
            .fuse
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err();
        assert!(!spent, "clone fuse burned out");
        Explosive { guard: self.guard.clone(), fuse: self.fuse }
    }
}

/// Delegates to the global heap until its allocation budget runs out
#[derive(Debug, Clone, Copy)]
struct Budget<'a> {
    remaining: &'a AtomicUsize,
}

unsafe impl Allocator for Budget<'_> {
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        let spent = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err();
        if spent {
            return Err(AllocError::exhausted(layout));
        }
        // SAFETY: same contract as this function's caller
        unsafe { SystemAllocator.allocate(layout) }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: ptr came from the delegated allocate above
        unsafe { SystemAllocator.deallocate(ptr, layout) }
    }
}

/// Counts allocate calls on their way to the global heap
#[derive(Debug, Clone, Copy)]
struct Counting<'a> {
    calls: &'a AtomicUsize,
}

unsafe impl Allocator for Counting<'_> {
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // SAFETY: same contract as this function's caller
        unsafe { SystemAllocator.allocate(layout) }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: ptr came from the delegated allocate above
        unsafe { SystemAllocator.deallocate(ptr, layout) }
    }
}

// ---------------------------------------------------------------------------
// Array: destruction accounting
// ---------------------------------------------------------------------------

/// Truncation destroys exactly the elements past the new length
#[test]
fn test_array_truncate_drops_exactly_the_tail() {
    let ledger = Ledger::new();
    let mut array = Array::from_iter((0..10).map(|_| Tracked::new(&ledger))).unwrap();

    array.truncate(4);
    assert_eq!(ledger.deaths(), 6, "six elements were cut off");
    assert_eq!(array.len(), 4);

    drop(array);
    assert!(ledger.balanced(), "every element must be destroyed once");
}

/// Shrinking storage destroys the doomed tail and keeps the rest alive
#[test]
fn test_array_resize_shrink_accounts_for_the_tail() {
    let ledger = Ledger::new();
    let mut array = Array::from_iter((0..8).map(|_| Tracked::new(&ledger))).unwrap();

    array.resize(3).unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.capacity(), 3);
    assert_eq!(ledger.deaths(), 5, "the elements past the new capacity are gone");

    drop(array);
    assert!(ledger.balanced());
}

/// A partially consumed owning iterator still releases the remainder
#[test]
fn test_array_into_iter_partial_consumption_drops_the_rest() {
    let ledger = Ledger::new();
    let array = Array::from_iter((0..10).map(|_| Tracked::new(&ledger))).unwrap();

    let mut drain = array.into_iter();
    drain.next();
    drain.next();
    drain.next_back();
    assert_eq!(ledger.deaths(), 3, "consumed elements are destroyed as they go");

    drop(drain);
    assert!(ledger.balanced());
}

// ---------------------------------------------------------------------------
// Array: allocation failure leaves no trace
// ---------------------------------------------------------------------------

/// A failed growth keeps the array byte-for-byte intact
#[test]
fn test_array_growth_failure_preserves_contents() {
    let ledger = Ledger::new();
    let budget = AtomicUsize::new(2);
    let mut array = Array::new_in(Budget { remaining: &budget });

    array.push_back(Tracked::new(&ledger)).unwrap();
    array.push_back(Tracked::new(&ledger)).unwrap();

    let err = array.push_back(Tracked::new(&ledger)).unwrap_err();
    assert!(matches!(err, AllocError::Exhausted { .. }));
    assert_eq!(array.len(), 2, "the existing elements survive the failure");
    assert_eq!(array.capacity(), 2, "storage is untouched by the failed growth");
    assert_eq!(ledger.deaths(), 1, "only the rejected element is destroyed");

    drop(array);
    assert!(ledger.balanced());
}

/// When construction from an iterator fails, the partial result is unwound
#[test]
fn test_array_from_iter_failure_releases_everything_built() {
    let ledger = Ledger::new();
    let budget = AtomicUsize::new(3);
    // filter hides the length, so the array has to grow step by step
    let source = (0..100).filter(|_| true).map(|_| Tracked::new(&ledger));

    let result = Array::from_iter_in(source, Budget { remaining: &budget });
    assert!(result.is_err());
    assert!(ledger.births() > 0, "some elements were built before the failure");
    assert!(ledger.balanced(), "the partial array must unwind completely");
}

/// A clone panic mid-construction destroys the partial result first
#[test]
fn test_array_from_elem_unwinds_on_clone_panic() {
    let ledger = Ledger::new();
    let fuse = AtomicUsize::new(2);
    let seed = Explosive::new(&ledger, &fuse);

    let outcome = catch_unwind(AssertUnwindSafe(|| Array::from_elem(seed, 5)));
    assert!(outcome.is_err(), "the third clone must panic");
    assert_eq!(ledger.births(), 3, "the original plus two successful clones");
    assert!(ledger.balanced(), "the unwind must destroy everything built");
}

/// Doubling keeps the allocation count logarithmic in the element count
#[test]
fn test_array_push_allocation_count_is_logarithmic() {
    let calls = AtomicUsize::new(0);
    let mut array = Array::new_in(Counting { calls: &calls });

    for i in 0..1000 {
        array.push_back(i).unwrap();
    }

    assert_eq!(array.len(), 1000);
    assert_eq!(array.capacity(), 1024);
    assert_eq!(
        calls.load(Ordering::SeqCst),
        11,
        "1000 pushes allocate once per doubling: 1, 2, 4, ... 1024"
    );
}

// ---------------------------------------------------------------------------
// List: destruction accounting
// ---------------------------------------------------------------------------

/// Every list operation that removes elements destroys them exactly once
#[test]
fn test_list_operations_release_every_node() {
    let ledger = Ledger::new();
    let mut list = LinkedList::from_iter((0..10).map(|_| Tracked::new(&ledger))).unwrap();

    assert!(list.pop_front().is_some());
    assert_eq!(ledger.deaths(), 1);

    let mut cursor = list.cursor_mut();
    cursor.move_next();
    cursor.remove_after();
    assert_eq!(ledger.deaths(), 2);

    cursor.truncate_rest();
    assert_eq!(ledger.deaths(), 9, "truncation destroys the whole tail");
    drop(cursor);

    drop(list);
    assert!(ledger.balanced());
}

/// Assignment destroys overwritten values and the trailing nodes
#[test]
fn test_list_assign_accounts_for_overwritten_and_cut_elements() {
    let ledger = Ledger::new();
    let mut list = LinkedList::from_iter((0..5).map(|_| Tracked::new(&ledger))).unwrap();

    list.assign_iter((0..2).map(|_| Tracked::new(&ledger))).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(ledger.deaths(), 5, "two overwritten plus three truncated");

    drop(list);
    assert!(ledger.balanced());
}

// ---------------------------------------------------------------------------
// List: allocation failure leaves no trace
// ---------------------------------------------------------------------------

/// A failed push destroys the rejected element and nothing else
#[test]
fn test_list_push_failure_preserves_contents() {
    let ledger = Ledger::new();
    let budget = AtomicUsize::new(2);
    let mut list = LinkedList::new_in(Budget { remaining: &budget });

    list.push_front(Tracked::new(&ledger)).unwrap();
    list.push_front(Tracked::new(&ledger)).unwrap();

    let err = list.push_front(Tracked::new(&ledger)).unwrap_err();
    assert!(matches!(err, AllocError::Exhausted { .. }));
    assert_eq!(list.len(), 2, "the chain is untouched by the failure");
    assert_eq!(ledger.deaths(), 1, "only the rejected element is destroyed");

    drop(list);
    assert!(ledger.balanced());
}

/// A splice that fails midway keeps what it already inserted
#[test]
fn test_list_splice_failure_keeps_the_inserted_prefix() {
    let ledger = Ledger::new();
    let budget = AtomicUsize::new(2);
    let mut list = LinkedList::new_in(Budget { remaining: &budget });

    let err = list
        .cursor_mut()
        .splice_after((0..5).map(|_| Tracked::new(&ledger)))
        .unwrap_err();
    assert!(matches!(err, AllocError::Exhausted { .. }));
    assert_eq!(list.len(), 2, "the first two inserts stand");

    drop(list);
    assert!(ledger.balanced());
}

/// A clone panic during list construction unwinds the partial chain
#[test]
fn test_list_from_elem_unwinds_on_clone_panic() {
    let ledger = Ledger::new();
    let fuse = AtomicUsize::new(3);
    let seed = Explosive::new(&ledger, &fuse);

    let outcome = catch_unwind(AssertUnwindSafe(|| LinkedList::from_elem(seed, 6)));
    assert!(outcome.is_err(), "the fourth clone must panic");
    assert!(ledger.balanced(), "the unwind must destroy everything built");
}

// ---------------------------------------------------------------------------
// Fallible element construction
// ---------------------------------------------------------------------------

/// An element error during construction unwinds and surfaces unchanged
#[test]
fn test_fallible_construction_cleans_up_both_containers() {
    let ledger = Ledger::new();

    let items = (0..6).map(|i| if i < 4 { Ok(Tracked::new(&ledger)) } else { Err("spoiled") });
    let result = Array::from_fallible_iter(items);
    assert_eq!(result.unwrap_err().into_construct(), Some("spoiled"));
    assert!(ledger.balanced(), "the four good elements must be destroyed");

    let items = (0..6).map(|i| if i < 2 { Ok(Tracked::new(&ledger)) } else { Err("spoiled") });
    let result = LinkedList::from_fallible_iter(items);
    assert_eq!(result.unwrap_err().into_construct(), Some("spoiled"));
    assert!(ledger.balanced());
}
