use core::fmt;
use core::ops::Deref;

/// How a cursor hands out the element it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerefMode {
    /// `read` borrows the element in place.
    Reference,
    /// `read` produces the element by value (e.g. a computed sequence).
    Value,
}

/// The result of [`Cursor::read`](super::Cursor::read).
///
/// Implemented for `&T`, `&mut T` and [`Value<T>`]. The facade's arrow-style access
/// goes through [`into_arrow`](Readout::into_arrow): references are returned as-is,
/// values get wrapped in an [`ArrowProxy`] so that member access still works.
pub trait Readout: Sized {
    type Target: ?Sized;
    type Arrow: Deref<Target = Self::Target>;

    const MODE: DerefMode;

    fn into_arrow(self) -> Self::Arrow;
}

impl<'r, T: ?Sized> Readout for &'r T {
    type Target = T;
    type Arrow = &'r T;

    const MODE: DerefMode = DerefMode::Reference;

    fn into_arrow(self) -> &'r T {
        self
    }
}

impl<'r, T: ?Sized> Readout for &'r mut T {
    type Target = T;
    type Arrow = &'r mut T;

    const MODE: DerefMode = DerefMode::Reference;

    fn into_arrow(self) -> &'r mut T {
        self
    }
}

/// A by-value read-out.
///
/// Cursors over computed sequences return this from `read` instead of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Value<T>(pub T);

impl<T> Value<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Readout for Value<T> {
    type Target = T;
    type Arrow = ArrowProxy<T>;

    const MODE: DerefMode = DerefMode::Value;

    fn into_arrow(self) -> ArrowProxy<T> {
        ArrowProxy(self.0)
    }
}

/// Owns a by-value read-out so it can be accessed like a pointee.
///
/// There is no address to hand out for a value the cursor computed on the fly, so the
/// proxy keeps the value alive for as long as the member access needs it.
pub struct ArrowProxy<T>(T);

impl<T> ArrowProxy<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ArrowProxy<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrowProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArrowProxy").field(&self.0).finish()
    }
}
