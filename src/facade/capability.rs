//! What a cursor can do, and the iterator tier that follows from it.
//!
//! A cursor implements [`Cursor`] plus whichever of [`Retreat`], [`Offset`], [`Done`]
//! and [`ReadMut`] it supports, and names its tier through [`Cursor::Tier`]. The tier
//! is checked against the capabilities at compile time (see [`Admits`]), so a cursor
//! cannot claim e.g. bidirectional traversal without a `prev`.

use super::readout::Readout;

mod sealed {
    pub trait Sealed {}
}

/// The closed set of iterator tiers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IteratorKind {
    SinglePass,
    Forward,
    Bidirectional,
    RandomAccess,
}

pub trait Tier: sealed::Sealed {
    const KIND: IteratorKind;
}

/// Tiers whose iterators end by comparing against another iterator (node identity)
/// rather than by asking the cursor whether it is [`Done`].
pub trait MultiPass: Tier {}

pub enum SinglePass {}
pub enum Forward {}
pub enum Bidirectional {}
pub enum RandomAccess {}

impl sealed::Sealed for SinglePass {}
impl sealed::Sealed for Forward {}
impl sealed::Sealed for Bidirectional {}
impl sealed::Sealed for RandomAccess {}

impl Tier for SinglePass {
    const KIND: IteratorKind = IteratorKind::SinglePass;
}
impl Tier for Forward {
    const KIND: IteratorKind = IteratorKind::Forward;
}
impl Tier for Bidirectional {
    const KIND: IteratorKind = IteratorKind::Bidirectional;
}
impl Tier for RandomAccess {
    const KIND: IteratorKind = IteratorKind::RandomAccess;
}

impl MultiPass for Forward {}
impl MultiPass for Bidirectional {}
impl MultiPass for RandomAccess {}

/// `Self` is a tier that cursor `C` actually has the operations for.
///
/// - [`SinglePass`]: `C: Done`
/// - [`Forward`]: `C: PartialEq`
/// - [`Bidirectional`]: `C: Retreat + PartialEq`
/// - [`RandomAccess`]: `C: Offset + PartialEq`
pub trait Admits<C: ?Sized>: Tier {}

impl<C: Done> Admits<C> for SinglePass {}
impl<C: Cursor + PartialEq> Admits<C> for Forward {}
impl<C: Retreat + PartialEq> Admits<C> for Bidirectional {}
impl<C: Offset + PartialEq> Admits<C> for RandomAccess {}

/// The minimal cursor: something that can be read and advanced.
pub trait Cursor {
    type Tier: Admits<Self>;

    /// What [`read`](Cursor::read) returns; see [`Readout`] for the two modes.
    type Reference<'r>: Readout
    where
        Self: 'r;

    fn read(&self) -> Self::Reference<'_>;

    fn next(&mut self);
}

pub trait Retreat: Cursor {
    fn prev(&mut self);
}

/// Constant-time jumps. Implies bidirectional movement.
pub trait Offset: Retreat {
    /// Signed number of `next` steps that take `self` to `other`.
    fn distance_to(&self, other: &Self) -> isize;

    /// Moves by `n` steps (backwards if `n` is negative).
    fn advance(&mut self, n: isize);

    /// The read-out `n` steps away, without moving.
    ///
    /// A read-out borrows the cursor that produced it, so this cannot be built from a
    /// temporary copy plus `advance` and has to come from the cursor itself.
    fn read_at(&self, n: isize) -> Self::Reference<'_>;
}

/// Cursors over sequences that are bounded by the cursor itself (a countdown, an
/// exhausted reader) rather than by a second position.
pub trait Done: Cursor<Tier = SinglePass> {
    fn done(&self) -> bool;
}

/// Write access to the element under the cursor.
pub trait ReadMut: Cursor {
    type Target: ?Sized;

    fn read_mut(&mut self) -> &mut Self::Target;
}
