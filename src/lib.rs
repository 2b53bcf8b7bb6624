//! Allocator-aware containers with explicit failure handling
//!
//! This crate provides owned sequence containers that treat memory as a
//! capability handed in from outside:
//!
//! - [`Array`]: growable contiguous storage, random access, amortized
//!   O(1) push at the back
//! - [`LinkedList`]: one node per element, O(1) push at the front,
//!   cursor-based edits anywhere in the chain
//! - [`Allocator`]: the memory-provider trait both containers are
//!   generic over, with [`SystemAllocator`] as the global-heap default
//!
//! Nothing here aborts on exhaustion. Every operation that might
//! allocate returns an [`AllocResult`], and a failed allocation leaves
//! the container exactly as it was. When element construction itself
//! fails partway through, everything built so far is destroyed in order
//! and the storage released before the error surfaces.
//!
//! Both containers are plain owned values: move them, exchange them
//! with `core::mem::swap`, or steal their contents with
//! [`Array::take`] / [`LinkedList::take`].
//!
//! # Features
//!
//! - `std` (default): Standard library support. Without it the crate is
//!   `no_std` and relies on the `alloc` crate for the global heap.
//! - `logging` (default): Emits `tracing` events when container storage
//!   grows, shrinks, or fails to allocate.
//!
//! # Example
//!
//! ```
//! use stowage::{Array, LinkedList};
//!
//! let mut log = Array::new();
//! log.push_back("connect")?;
//! log.push_back("transfer")?;
//! assert_eq!(log.as_slice(), &["connect", "transfer"]);
//!
//! let mut undo = LinkedList::new();
//! undo.push_front("insert row")?;
//! undo.push_front("update cell")?;
//! assert_eq!(undo.pop_front(), Some("update cell"));
//! # Ok::<(), stowage::AllocError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod allocator;
pub mod array;
pub mod error;
pub mod list;
mod macros;
mod raw;

pub use allocator::{Allocator, SystemAllocator, TypedAllocator};
pub use array::Array;
pub use error::{AllocError, AllocResult, BuildError, BuildResult};
pub use list::LinkedList;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
