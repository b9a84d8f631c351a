//! An ordered multiset backed by a red-black tree.
//!
//! Nodes own their children through `Box`es and point back at their parent with a raw
//! pointer. Positions are [`Cursor`]s wrapped in a [`Facade`], the same way any other
//! cursor becomes an iterator.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use compare::{Compare, Natural, natural};
use log::{debug, trace};

use crate::facade::Facade;

mod balance;
mod cursor;
mod node;
mod verify;

pub use cursor::{Cursor, CursorMut};
pub use node::Color;
pub use verify::InvariantViolation;

use node::{Link, Node, ParentLink};

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTree with `n` internal nodes has height at most `2*log₂(n+1)`

/// Read-only iterator position (`const_iterator`).
pub type Iter<'a, T> = Facade<Cursor<'a, T>>;
/// Read-write iterator position (`iterator`). Erasing by position goes through this.
pub type IterMut<'a, T, C> = Facade<CursorMut<'a, T, C>>;

/// A red-black tree holding values in the order given by `C`.
///
/// Equal values are kept (the new one goes after the existing ones).
///
/// # Example
/// ```
/// use rbtree_facade::RbTree;
///
/// let mut tree = RbTree::new();
/// for v in [10, 20, 30] {
///     tree.insert(v);
/// }
/// // ascending inserts still end up balanced
/// assert_eq!(tree.height(), 2);
///
/// let it = tree.begin_mut().erase();
/// assert_eq!(*it.get(), 20);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [20, 30]);
/// ```
pub struct RbTree<T, C = Natural<T>> {
    root: Link<T>,
    len: usize,
    cmp: C,
}

// SAFETY: the parent pointers only ever point into nodes owned by the same tree, so the
//         tree is exactly as thread-safe as a `Box`-based tree of `T`s would be.
unsafe impl<T: Send, C: Send> Send for RbTree<T, C> {}
unsafe impl<T: Sync, C: Sync> Sync for RbTree<T, C> {}

impl<T: Ord> RbTree<T> {
    /// Creates an empty tree in the natural order of `T`.
    pub fn new() -> Self {
        Self::with_cmp(natural())
    }
}

impl<T: Ord> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> RbTree<T, C> {
    /// Creates an empty tree ordered by `cmp`.
    pub fn with_cmp(cmp: C) -> Self {
        Self { root: None, len: 0, cmp }
    }

    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Number of nodes on the longest root-to-leaf path. `0` when empty.
    ///
    /// Complexity: O(n)
    pub fn height(&self) -> usize {
        fn height_of<T>(link: &Link<T>) -> usize {
            match link {
                None => 0,
                Some(node) => 1 + height_of(&node.left).max(height_of(&node.right)),
            }
        }
        height_of(&self.root)
    }

    pub fn first(&self) -> Option<&T> {
        self.begin().into_base().get()
    }

    pub fn last(&self) -> Option<&T> {
        // SAFETY: `self` is borrowed for the lifetime of the result
        self.root_ptr().map(|root| unsafe { &(*node::right_most(root).as_ptr()).value })
    }

    pub fn begin(&self) -> Iter<'_, T> {
        Facade::new(Cursor::new(self.leftmost_ptr(), self.root_ptr()))
    }

    pub fn end(&self) -> Iter<'_, T> {
        Facade::new(Cursor::new(None, self.root_ptr()))
    }

    pub fn begin_mut(&mut self) -> IterMut<'_, T, C> {
        let first = self.leftmost_ptr();
        Facade::new(CursorMut::new(self, first))
    }

    pub fn end_mut(&mut self) -> IterMut<'_, T, C> {
        Facade::new(CursorMut::new(self, None))
    }

    pub fn iter(&self) -> Values<'_, T> {
        Values {
            front: self.leftmost_ptr(),
            // SAFETY: `self` is borrowed for the lifetime of the iterator
            back: self.root_ptr().map(|root| unsafe { node::right_most(root) }),
            len: self.len,
            _marker: PhantomData,
        }
    }

    /// Yields mutable references in order. Changing how elements compare breaks the tree.
    pub fn iter_mut(&mut self) -> ValuesMut<'_, T> {
        ValuesMut {
            front: self.leftmost_ptr(),
            // SAFETY: `self` is borrowed for the lifetime of the iterator
            back: self.root_ptr().map(|root| unsafe { node::right_most(root) }),
            len: self.len,
            _marker: PhantomData,
        }
    }

    fn root_ptr(&self) -> ParentLink<T> {
        node::as_ptr(&self.root)
    }

    fn leftmost_ptr(&self) -> ParentLink<T> {
        // SAFETY: the root is alive while `self` is
        self.root_ptr().map(|root| unsafe { node::left_most(root) })
    }

    /// The slot that owns `node`: its parent's child field, or the root.
    ///
    /// SAFETY: `node` must be a live node of this tree.
    unsafe fn slot_of(&mut self, node: NonNull<Node<T>>) -> &mut Link<T> {
        // SAFETY: guaranteed by caller
        unsafe {
            match node.as_ref().parent {
                None => &mut self.root,
                Some(mut parent) => {
                    let parent = parent.as_mut();
                    match parent.side_of(node) {
                        Some(side) => parent.child_mut(side),
                        None => unreachable!("parent link does not match the parent's children"),
                    }
                }
            }
        }
    }

    /// Walks up from `center` restructuring red-red pairs until a level needs nothing.
    fn repair_upward(&mut self, mut center: NonNull<Node<T>>) {
        loop {
            // SAFETY: `center` is a live node; it is only ever taken from a parent link
            let above = unsafe { center.as_ref().parent };
            let slot = unsafe { self.slot_of(center) };
            if !balance::rebalance(slot) {
                break;
            }
            match above {
                // SAFETY: `above` was not part of the restructuring, so it is still live
                Some(mut parent) => unsafe { parent.as_mut().fix_parents() },
                None => {
                    if let Some(root) = self.root.as_deref_mut() {
                        root.parent = None;
                        root.fix_parents();
                    }
                }
            }
            // the new (red) top may now sit under a red node; that pair is fixed one
            // level further up, at the top's grandparent
            let Some(grandparent) = above.and_then(|p| unsafe { p.as_ref().parent }) else {
                break;
            };
            center = grandparent;
        }
    }

    /// Removes the value in `target`.
    ///
    /// Returns the node that holds the removed value's in-order successor afterwards:
    /// values move between nodes on the way down, so this is not always the node that
    /// was the successor on entry.
    ///
    /// SAFETY: `target` must be a live node of this tree.
    unsafe fn erase_node(&mut self, target: NonNull<Node<T>>) -> ParentLink<T> {
        // SAFETY: guaranteed by caller; every pointer below is reached from `target`
        //         through child links of the same tree
        unsafe {
            let mut landing = node::inorder_successor(target);
            let mut current = target;
            loop {
                let node = current.as_mut();
                if node.is_leaf() {
                    break;
                }
                // with a single child, swap with the nearest neighbour in that subtree
                // (the child itself whenever the tree is balanced)
                let next = match (node::as_ptr(&node.left), node::as_ptr(&node.right)) {
                    (Some(left), None) => node::right_most(left),
                    (_, Some(right)) => node::left_most(right),
                    (None, None) => unreachable!("leaf handled above"),
                };
                trace!("erase: pushing the doomed value one level down");
                std::mem::swap(&mut node.value, &mut (*next.as_ptr()).value);
                if landing == Some(next) {
                    landing = Some(current);
                }
                current = next;
            }

            match current.as_ref().parent {
                None => {
                    self.root = None;
                    debug!("erased the last element; tree is empty");
                }
                Some(mut parent) => {
                    let parent = parent.as_mut();
                    // NOTE: no rotation fix-up here, only this recolor. Black heights are
                    //       not restored after a leaf removal.
                    parent.color = Color::Red;
                    if let Some(side) = parent.side_of(current) {
                        *parent.child_mut(side) = None;
                    }
                }
            }
            self.len -= 1;
            landing
        }
    }
}

impl<T, C: Compare<T>> RbTree<T, C> {
    /// Adds `value`, after any equal values already present.
    pub fn insert(&mut self, value: T) {
        self.len += 1;
        let Some(root) = self.root.as_deref_mut() else {
            let mut node = Node::new(value, None);
            node.color = Color::Black;
            self.root = Some(node);
            debug!("created the root node");
            return;
        };

        let mut parent = NonNull::from(root);
        let mut grandparent = None;
        loop {
            // SAFETY: `parent` is a live node reached from the root; nothing else
            //         references the tree while `self` is borrowed mutably
            let p = unsafe { parent.as_mut() };
            let slot =
                if self.cmp.compares_lt(&value, &p.value) { &mut p.left } else { &mut p.right };
            match slot {
                Some(child) => {
                    grandparent = Some(parent);
                    parent = NonNull::from(&mut **child);
                }
                None => {
                    *slot = Some(Node::new(value, Some(parent)));
                    break;
                }
            }
        }

        if let Some(grandparent) = grandparent {
            self.repair_upward(grandparent);
        }
        if let Some(root) = self.root.as_deref_mut() {
            root.color = Color::Black;
            root.parent = None;
        }
    }

    /// The first element equal to `value`, or the end position.
    pub fn find(&self, value: &T) -> Iter<'_, T> {
        Facade::new(Cursor::new(self.find_ptr(value), self.root_ptr()))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_ptr(value).is_some()
    }

    /// Erases the first element equal to `value`. Returns whether there was one.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.find_ptr(value) {
            // SAFETY: `find_ptr` only returns nodes of this tree
            Some(node) => {
                unsafe { self.erase_node(node) };
                true
            }
            None => false,
        }
    }

    fn find_ptr(&self, value: &T) -> ParentLink<T> {
        let mut found = None;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            if self.cmp.compares_lt(value, &node.value) {
                cur = node.left.as_deref();
            } else if self.cmp.compares_lt(&node.value, value) {
                cur = node.right.as_deref();
            } else {
                // keep looking left for an earlier equal element
                found = Some(NonNull::from(node));
                cur = node.left.as_deref();
            }
        }
        found
    }
}

impl<'a, T, C> Facade<CursorMut<'a, T, C>> {
    /// Erases the element at this position. The result points at the element that
    /// followed it, or is the end position.
    ///
    /// # Panics
    /// If this is the end position.
    pub fn erase(self) -> Self {
        Facade::new(self.into_base().erase())
    }
}

impl<T: Clone, C: Clone> Clone for RbTree<T, C> {
    fn clone(&self) -> Self {
        fn clone_link<T: Clone>(link: &Link<T>) -> Link<T> {
            link.as_deref().map(|node| {
                Box::new(Node {
                    value: node.value.clone(),
                    color: node.color,
                    parent: None,
                    left: clone_link(&node.left),
                    right: clone_link(&node.right),
                })
            })
        }
        let mut root = clone_link(&self.root);
        if let Some(root) = root.as_deref_mut() {
            root.fix_parents();
        }
        Self { root, len: self.len, cmp: self.cmp.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for RbTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Values<'a, T>;
    fn into_iter(self) -> Values<'a, T> {
        self.iter()
    }
}

impl<'a, T, C> IntoIterator for &'a mut RbTree<T, C> {
    type Item = &'a mut T;
    type IntoIter = ValuesMut<'a, T>;
    fn into_iter(self) -> ValuesMut<'a, T> {
        self.iter_mut()
    }
}

/// In-order iterator over `&T`, see [`RbTree::iter`].
pub struct Values<'a, T> {
    front: ParentLink<T>,
    back: ParentLink<T>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<T> Clone for Values<'_, T> {
    fn clone(&self) -> Self {
        Self { front: self.front, back: self.back, len: self.len, _marker: PhantomData }
    }
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        let node = self.front?;
        self.len -= 1;
        // SAFETY: the tree is borrowed for 'a and `len` stops us before running off
        unsafe {
            self.front = node::inorder_successor(node);
            Some(&(*node.as_ptr()).value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Values<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        let node = self.back?;
        self.len -= 1;
        // SAFETY: see `next`
        unsafe {
            self.back = node::inorder_predecessor(node);
            Some(&(*node.as_ptr()).value)
        }
    }
}

impl<T> ExactSizeIterator for Values<'_, T> {}
impl<T> FusedIterator for Values<'_, T> {}

/// In-order iterator over `&mut T`, see [`RbTree::iter_mut`].
pub struct ValuesMut<'a, T> {
    front: ParentLink<T>,
    back: ParentLink<T>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for ValuesMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        let node = self.front?;
        self.len -= 1;
        // SAFETY: the tree is borrowed mutably for 'a and every node is yielded once
        unsafe {
            self.front = node::inorder_successor(node);
            Some(&mut (*node.as_ptr()).value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for ValuesMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        let node = self.back?;
        self.len -= 1;
        // SAFETY: see `next`
        unsafe {
            self.back = node::inorder_predecessor(node);
            Some(&mut (*node.as_ptr()).value)
        }
    }
}

impl<T> ExactSizeIterator for ValuesMut<'_, T> {}
impl<T> FusedIterator for ValuesMut<'_, T> {}
