//! A red-black tree whose positions are exposed as iterators synthesized by a generic
//! cursor [`facade`].
//!
//! ```
//! use rbtree_facade::RbTree;
//!
//! let tree: RbTree<i32> = [3, 1, 2].into_iter().collect();
//! let mut it = tree.begin();
//! let mut seen = vec![];
//! while it != tree.end() {
//!     seen.push(*it.get());
//!     it.inc();
//! }
//! assert_eq!(seen, [1, 2, 3]);
//! ```

// #![allow(unused)]
#![deny(unsafe_op_in_unsafe_fn)]

// cursor -> iterator
pub mod facade;

// not concurrent
pub mod non_concurrent;

pub mod logging;

pub use facade::{DefaultSentinel, Facade, IteratorKind};
pub use non_concurrent::rbtree::{Color, InvariantViolation, RbTree};
