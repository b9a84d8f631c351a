//! Turns a minimal cursor into a full iterator.
//!
//! [`Facade`] wraps any [`Cursor`] and forwards to it. Which operations exist on the
//! facade depends on which capability traits the cursor implements:
//!
//! | cursor implements        | facade gains                                            |
//! |--------------------------|---------------------------------------------------------|
//! | `Cursor`                 | `get`, `arrow`, `inc`, `post_inc`                       |
//! | `ReadMut`                | `get_mut`                                               |
//! | `Retreat`                | `dec`, `post_dec`                                       |
//! | `Offset`                 | `+`, `-`, `+=`, `-=`, `at`, `distance`, `<`/`>`/`<=`/`>=` |
//! | `PartialEq` (multi-pass) | `==` against another facade                             |
//! | `Done` (single-pass)     | `==` against [`DefaultSentinel`]                        |
//!
//! A forward-only cursor does not get decrement:
//!
//! ```compile_fail
//! use rbtree_facade::facade::{Cursor, Facade, Forward, Value};
//!
//! #[derive(PartialEq)]
//! struct Up(u32);
//! impl Cursor for Up {
//!     type Tier = Forward;
//!     type Reference<'r> = Value<u32>;
//!     fn read(&self) -> Value<u32> { Value(self.0) }
//!     fn next(&mut self) { self.0 += 1 }
//! }
//!
//! let mut it = Facade::new(Up(0));
//! it.dec();
//! ```
//!
//! nor offset arithmetic:
//!
//! ```compile_fail
//! use rbtree_facade::facade::{Cursor, Facade, Forward, Value};
//!
//! #[derive(PartialEq)]
//! struct Up(u32);
//! impl Cursor for Up {
//!     type Tier = Forward;
//!     type Reference<'r> = Value<u32>;
//!     fn read(&self) -> Value<u32> { Value(self.0) }
//!     fn next(&mut self) { self.0 += 1 }
//! }
//!
//! let it = Facade::new(Up(0));
//! let _ = it + 3;
//! ```
//!
//! and a cursor cannot claim a tier it lacks the operations for:
//!
//! ```compile_fail
//! use rbtree_facade::facade::{Bidirectional, Cursor, Value};
//!
//! #[derive(PartialEq)]
//! struct Up(u32);
//! impl Cursor for Up {
//!     type Tier = Bidirectional;
//!     type Reference<'r> = Value<u32>;
//!     fn read(&self) -> Value<u32> { Value(self.0) }
//!     fn next(&mut self) { self.0 += 1 }
//! }
//! ```

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Sub, SubAssign};

mod capability;
mod readout;

pub use capability::{
    Admits, Bidirectional, Cursor, Done, Forward, IteratorKind, MultiPass, Offset, RandomAccess,
    ReadMut, Retreat, SinglePass, Tier,
};
pub use readout::{ArrowProxy, DerefMode, Readout, Value};

/// End marker for single-pass iterators: `it == DefaultSentinel` asks the cursor
/// whether it is [`Done`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultSentinel;

/// An iterator synthesized from cursor `C`.
#[derive(Debug, Clone, Copy, Default, Hash)]
pub struct Facade<C> {
    base: C,
}

impl<C: Cursor> Facade<C> {
    /// The tier this iterator was built with.
    pub const KIND: IteratorKind = <C::Tier as Tier>::KIND;

    pub const fn new(base: C) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &C {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut C {
        &mut self.base
    }

    pub fn into_base(self) -> C {
        self.base
    }

    /// Dereference (`*it`).
    pub fn get(&self) -> C::Reference<'_> {
        self.base.read()
    }

    /// Member access (`it->`). By-value cursors come back wrapped in an [`ArrowProxy`].
    pub fn arrow(&self) -> <C::Reference<'_> as Readout>::Arrow {
        self.base.read().into_arrow()
    }

    /// Pre-increment (`++it`).
    pub fn inc(&mut self) -> &mut Self {
        self.base.next();
        self
    }

    /// Post-increment (`it++`): advances and returns the old position.
    pub fn post_inc(&mut self) -> Self
    where
        C: Clone,
    {
        let old = self.clone();
        self.base.next();
        old
    }

    /// Re-wraps the cursor as one it converts into, e.g. a mutable tree cursor into a
    /// read-only one. There is no way back.
    pub fn convert<D>(self) -> Facade<D>
    where
        D: Cursor + From<C>,
    {
        Facade::new(D::from(self.base))
    }
}

impl<C: ReadMut> Facade<C> {
    pub fn get_mut(&mut self) -> &mut C::Target {
        self.base.read_mut()
    }
}

impl<C: Retreat> Facade<C> {
    /// Pre-decrement (`--it`).
    pub fn dec(&mut self) -> &mut Self {
        self.base.prev();
        self
    }

    /// Post-decrement (`it--`).
    pub fn post_dec(&mut self) -> Self
    where
        C: Clone,
    {
        let old = self.clone();
        self.base.prev();
        old
    }
}

impl<C: Offset> Facade<C> {
    /// Number of increments from `self` to `other`.
    pub fn distance(&self, other: &Self) -> isize {
        self.base.distance_to(&other.base)
    }

    /// Subscript (`it[n]`).
    pub fn at(&self, n: isize) -> C::Reference<'_> {
        self.base.read_at(n)
    }
}

impl<C> PartialEq for Facade<C>
where
    C: Cursor + PartialEq,
    C::Tier: MultiPass,
{
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<C> Eq for Facade<C>
where
    C: Cursor + Eq,
    C::Tier: MultiPass,
{
}

impl<C: Done> PartialEq<DefaultSentinel> for Facade<C> {
    fn eq(&self, _: &DefaultSentinel) -> bool {
        self.base.done()
    }
}

impl<C: Done> PartialEq<Facade<C>> for DefaultSentinel {
    fn eq(&self, other: &Facade<C>) -> bool {
        other.base.done()
    }
}

impl<C> PartialOrd for Facade<C>
where
    C: Offset + PartialEq,
    C::Tier: MultiPass,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // a positive distance means `other` is further along
        Some(0.cmp(&self.distance(other)))
    }
}

impl<C: Offset> Add<isize> for Facade<C> {
    type Output = Self;
    fn add(mut self, n: isize) -> Self {
        self.base.advance(n);
        self
    }
}

impl<C: Offset> Add<Facade<C>> for isize {
    type Output = Facade<C>;
    fn add(self, it: Facade<C>) -> Facade<C> {
        it + self
    }
}

impl<C: Offset> Sub<isize> for Facade<C> {
    type Output = Self;
    fn sub(mut self, n: isize) -> Self {
        self.base.advance(-n);
        self
    }
}

/// `a - b` is how many increments take `b` to `a`.
impl<C: Offset> Sub for Facade<C> {
    type Output = isize;
    fn sub(self, other: Self) -> isize {
        other.distance(&self)
    }
}

impl<C: Offset> AddAssign<isize> for Facade<C> {
    fn add_assign(&mut self, n: isize) {
        self.base.advance(n);
    }
}

impl<C: Offset> SubAssign<isize> for Facade<C> {
    fn sub_assign(&mut self, n: isize) {
        self.base.advance(-n);
    }
}
