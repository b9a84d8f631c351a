use std::ptr::{self, NonNull};

/// Owning edge to a child.
pub(crate) type Link<T> = Option<Box<Node<T>>>;
/// Non-owning edge back to the parent; `None` at the root.
pub(crate) type ParentLink<T> = Option<NonNull<Node<T>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

pub(crate) struct Node<T> {
    pub value: T,
    pub color: Color,
    pub parent: ParentLink<T>,
    pub left: Link<T>,
    pub right: Link<T>,
}

impl<T> Node<T> {
    /// New nodes start out red.
    pub fn new(value: T, parent: ParentLink<T>) -> Box<Self> {
        Box::new(Self { value, color: Color::Red, parent, left: None, right: None })
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Absent children count as black.
    pub fn is_red(link: &Link<T>) -> bool {
        matches!(link, Some(node) if node.color == Color::Red)
    }

    /// Re-derives the parent links below `self` after children were moved around.
    ///
    /// Only descends through children whose link was stale: anything under a child
    /// that kept its parent was not touched by the restructuring.
    pub fn fix_parents(&mut self) {
        let this = NonNull::from(&mut *self);
        for child in [&mut self.left, &mut self.right].into_iter().flatten() {
            if child.parent != Some(this) {
                child.parent = Some(this);
                child.fix_parents();
            }
        }
    }

    /// Which of `self`'s children `child` is. `None` if it is neither.
    pub fn side_of(&self, child: NonNull<Node<T>>) -> Option<Side> {
        if points_to(&self.left, child) {
            Some(Side::Left)
        } else if points_to(&self.right, child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) fn points_to<T>(link: &Link<T>, node: NonNull<Node<T>>) -> bool {
    link.as_deref().is_some_and(|child| ptr::eq(child, node.as_ptr()))
}

pub(crate) fn as_ptr<T>(link: &Link<T>) -> ParentLink<T> {
    link.as_deref().map(NonNull::from)
}

// NOTE: everything below walks raw node pointers. Callers guarantee the pointers come
//       from a live tree that is not being mutated concurrently.

pub(crate) unsafe fn left_most<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    // SAFETY: guaranteed by caller
    while let Some(left) = unsafe { as_ptr(&node.as_ref().left) } {
        node = left;
    }
    node
}

pub(crate) unsafe fn right_most<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    // SAFETY: guaranteed by caller
    while let Some(right) = unsafe { as_ptr(&node.as_ref().right) } {
        node = right;
    }
    node
}

/// The next node in order, or `None` past the last one.
pub(crate) unsafe fn inorder_successor<T>(node: NonNull<Node<T>>) -> ParentLink<T> {
    // SAFETY: guaranteed by caller
    unsafe {
        if let Some(right) = as_ptr(&node.as_ref().right) {
            return Some(left_most(right));
        }
        let mut current = node;
        let mut parent = current.as_ref().parent;
        // climb while we are coming up out of a right subtree
        while let Some(p) = parent {
            if !points_to(&p.as_ref().right, current) {
                break;
            }
            current = p;
            parent = p.as_ref().parent;
        }
        parent
    }
}

/// The previous node in order, or `None` before the first one.
pub(crate) unsafe fn inorder_predecessor<T>(node: NonNull<Node<T>>) -> ParentLink<T> {
    // SAFETY: guaranteed by caller
    unsafe {
        if let Some(left) = as_ptr(&node.as_ref().left) {
            return Some(right_most(left));
        }
        let mut current = node;
        let mut parent = current.as_ref().parent;
        while let Some(p) = parent {
            if !points_to(&p.as_ref().left, current) {
                break;
            }
            current = p;
            parent = p.as_ref().parent;
        }
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      4
    //    /   \
    //   2     6
    //  / \
    // 1   3
    fn sample() -> Box<Node<i32>> {
        let mut two = Node::new(2, None);
        two.left = Some(Node::new(1, None));
        two.right = Some(Node::new(3, None));
        let mut root = Node::new(4, None);
        root.left = Some(two);
        root.right = Some(Node::new(6, None));
        root.fix_parents();
        root
    }

    fn collect(root: &Node<i32>) -> Vec<i32> {
        let mut out = vec![];
        let mut cur = Some(unsafe { left_most(NonNull::from(root)) });
        while let Some(node) = cur {
            out.push(unsafe { node.as_ref().value });
            cur = unsafe { inorder_successor(node) };
        }
        out
    }

    #[test]
    fn fix_parents_links_every_child() {
        let root = sample();
        let two = root.left.as_deref().unwrap();
        assert!(root.parent.is_none());
        assert_eq!(two.parent, Some(NonNull::from(&*root)));
        assert_eq!(two.left.as_ref().unwrap().parent, Some(NonNull::from(two)));
        assert_eq!(two.right.as_ref().unwrap().parent, Some(NonNull::from(two)));
        assert_eq!(root.right.as_ref().unwrap().parent, Some(NonNull::from(&*root)));
    }

    #[test]
    fn walks_in_order_both_ways() {
        let root = sample();
        assert_eq!(collect(&root), [1, 2, 3, 4, 6]);

        let mut out = vec![];
        let mut cur = Some(unsafe { right_most(NonNull::from(&*root)) });
        while let Some(node) = cur {
            out.push(unsafe { node.as_ref().value });
            cur = unsafe { inorder_predecessor(node) };
        }
        assert_eq!(out, [6, 4, 3, 2, 1]);
    }

    #[test]
    fn leaves_and_sides() {
        let root = sample();
        let two = root.left.as_deref().unwrap();
        assert!(!root.is_leaf());
        assert!(root.right.as_deref().unwrap().is_leaf());
        assert_eq!(root.side_of(NonNull::from(two)), Some(Side::Left));
        assert_eq!(two.side_of(NonNull::from(&*root)), None);
        assert!(Node::is_red(&root.left));
        assert!(!Node::<i32>::is_red(&None));
    }
}
