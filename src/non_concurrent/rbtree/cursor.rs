use std::fmt;
use std::marker::PhantomData;

use crate::facade::{self, Bidirectional, ReadMut, Retreat};

use super::RbTree;
use super::node::{self, Node, ParentLink};

/// Read-only position in an [`RbTree`]: one element, or past-the-end.
///
/// Advancing or reading the past-the-end position panics. Stepping back from it lands
/// on the last element.
pub struct Cursor<'a, T> {
    node: ParentLink<T>,
    root: ParentLink<T>,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(node: ParentLink<T>, root: ParentLink<T>) -> Self {
        Self { node, root, _marker: PhantomData }
    }

    /// The element under the cursor, `None` past the end.
    pub fn get(&self) -> Option<&'a T> {
        // SAFETY: the tree is borrowed for 'a, so the node is alive and unmodified
        self.node.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, T> facade::Cursor for Cursor<'a, T> {
    type Tier = Bidirectional;
    type Reference<'r> = &'a T where Self: 'r;

    fn read(&self) -> &'a T {
        match self.get() {
            Some(value) => value,
            None => panic!("dereferenced the past-the-end cursor"),
        }
    }

    fn next(&mut self) {
        let Some(node) = self.node else {
            panic!("advanced past the end of the tree");
        };
        // SAFETY: see `get`
        self.node = unsafe { node::inorder_successor(node) };
    }
}

impl<T> Retreat for Cursor<'_, T> {
    fn prev(&mut self) {
        // SAFETY: see `get`
        self.node = unsafe { step_back(self.node, self.root) };
    }
}

/// Position in an [`RbTree`] with write access to the element, and to the tree itself
/// through [`erase`](CursorMut::erase).
///
/// Writing through [`ReadMut::read_mut`] must not change how the element orders
/// against its neighbours.
pub struct CursorMut<'a, T, C> {
    tree: &'a mut RbTree<T, C>,
    node: ParentLink<T>,
}

impl<'a, T, C> CursorMut<'a, T, C> {
    pub(super) fn new(tree: &'a mut RbTree<T, C>, node: ParentLink<T>) -> Self {
        Self { tree, node }
    }

    pub fn get(&self) -> Option<&T> {
        // SAFETY: the tree is exclusively borrowed through `self.tree`
        self.node.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as above, and `&mut self` keeps this the only live reference
        self.node.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Removes the element under the cursor and returns a cursor to the element that
    /// followed it (or past-the-end).
    ///
    /// # Panics
    /// If the cursor is past-the-end.
    pub fn erase(self) -> Self {
        let Some(node) = self.node else {
            panic!("erased the past-the-end cursor");
        };
        let tree = self.tree;
        // SAFETY: `node` belongs to `tree`, which we borrow exclusively
        let landing = unsafe { tree.erase_node(node) };
        Self { tree, node: landing }
    }
}

impl<T, C> PartialEq for CursorMut<'_, T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T: fmt::Debug, C> fmt::Debug for CursorMut<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}

impl<T, C> facade::Cursor for CursorMut<'_, T, C> {
    type Tier = Bidirectional;
    type Reference<'r> = &'r T where Self: 'r;

    fn read(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => panic!("dereferenced the past-the-end cursor"),
        }
    }

    fn next(&mut self) {
        let Some(node) = self.node else {
            panic!("advanced past the end of the tree");
        };
        // SAFETY: see `get`
        self.node = unsafe { node::inorder_successor(node) };
    }
}

impl<T, C> Retreat for CursorMut<'_, T, C> {
    fn prev(&mut self) {
        let root = node::as_ptr(&self.tree.root);
        // SAFETY: see `get`
        self.node = unsafe { step_back(self.node, root) };
    }
}

impl<T, C> ReadMut for CursorMut<'_, T, C> {
    type Target = T;

    fn read_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(value) => value,
            None => panic!("dereferenced the past-the-end cursor"),
        }
    }
}

impl<'a, T, C> From<CursorMut<'a, T, C>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T, C>) -> Self {
        let tree: &'a RbTree<T, C> = cursor.tree;
        Cursor::new(cursor.node, node::as_ptr(&tree.root))
    }
}

/// From past-the-end, back to the last node; otherwise the in-order predecessor.
unsafe fn step_back<T>(node: ParentLink<T>, root: ParentLink<T>) -> ParentLink<T> {
    // SAFETY: guaranteed by caller
    unsafe {
        match node {
            Some(node) => node::inorder_predecessor(node),
            None => root.map(|root| node::right_most(root)),
        }
    }
}
