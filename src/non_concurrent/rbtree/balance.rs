use std::fmt;
use std::ptr::NonNull;

use log::{debug, trace};

use super::RbTree;
use super::node::{Color, Link, Node, ParentLink, Side};

/// Where the red-red pair sits below a black node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    LeftLeft,
    LeftRight,
    RightLeft,
    RightRight,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::LeftLeft => "LL",
            Shape::LeftRight => "LR",
            Shape::RightLeft => "RL",
            Shape::RightRight => "RR",
        })
    }
}

fn classify<T>(center: &Node<T>) -> Option<Shape> {
    if center.color != Color::Black {
        return None;
    }
    if let Some(left) = center.left.as_deref().filter(|l| l.color == Color::Red) {
        if Node::is_red(&left.left) {
            return Some(Shape::LeftLeft);
        }
        if Node::is_red(&left.right) {
            return Some(Shape::LeftRight);
        }
    }
    if let Some(right) = center.right.as_deref().filter(|r| r.color == Color::Red) {
        if Node::is_red(&right.left) {
            return Some(Shape::RightLeft);
        }
        if Node::is_red(&right.right) {
            return Some(Shape::RightRight);
        }
    }
    None
}

/// Restructures the subtree in `slot` if its root is black with a red child that has
/// a red child of its own.
///
/// The middle of the three nodes ends up on top, red, with the other two as its black
/// children. Returns whether anything changed. Parent links under `slot` are left
/// stale; the caller runs [`Node::fix_parents`] from above.
pub(crate) fn rebalance<T>(slot: &mut Link<T>) -> bool {
    let Some(shape) = slot.as_deref().and_then(classify) else {
        return false;
    };
    let Some(center) = slot.take() else {
        return false;
    };
    trace!("rebalancing {shape} violation");
    let top = match shape {
        Shape::LeftLeft => rotate_single(center, Side::Left),
        Shape::RightRight => rotate_single(center, Side::Right),
        Shape::LeftRight => rotate_double(center, Side::Left),
        Shape::RightLeft => rotate_double(center, Side::Right),
    };
    *slot = Some(top);
    true
}

// `outer` is the side the red child hangs off the center.
//
//        C              P
//       / \            / \
//      P   d   =>     G   C
//     / \                / \
//    G   b              b   d
fn rotate_single<T>(mut center: Box<Node<T>>, outer: Side) -> Box<Node<T>> {
    let inner = outer.flip();
    let Some(mut pivot) = center.child_mut(outer).take() else {
        return center;
    };
    *center.child_mut(outer) = pivot.child_mut(inner).take();
    if let Some(grandchild) = pivot.child_mut(outer).as_deref_mut() {
        grandchild.color = Color::Black;
    }
    center.color = Color::Black;
    pivot.color = Color::Red;
    *pivot.child_mut(inner) = Some(center);
    pivot
}

//        C                M
//       / \             /   \
//      P   d    =>     P     C
//     / \             / \   / \
//    a   M           a   b c   d
//       / \
//      b   c
fn rotate_double<T>(mut center: Box<Node<T>>, outer: Side) -> Box<Node<T>> {
    let inner = outer.flip();
    let Some(mut pivot) = center.child_mut(outer).take() else {
        return center;
    };
    let Some(mut middle) = pivot.child_mut(inner).take() else {
        *center.child_mut(outer) = Some(pivot);
        return center;
    };
    *pivot.child_mut(inner) = middle.child_mut(outer).take();
    *center.child_mut(outer) = middle.child_mut(inner).take();
    pivot.color = Color::Black;
    center.color = Color::Black;
    middle.color = Color::Red;
    *middle.child_mut(outer) = Some(pivot);
    *middle.child_mut(inner) = Some(center);
    middle
}

impl<T, C> RbTree<T, C> {
    /// Runs the local restructuring at every node, level by level from the root, then
    /// blackens the root.
    ///
    /// Clears up red-red pairs that a run of erases left behind. It does not even out
    /// black heights.
    pub fn rebalance_all(&mut self) {
        // each slot travels with the node that owns it (`None` for the root)
        let mut level: Vec<(*mut Link<T>, ParentLink<T>)> =
            vec![(&mut self.root as *mut Link<T>, None)];
        let mut restructured = 0usize;
        while !level.is_empty() {
            let mut next_level = Vec::with_capacity(level.len() * 2);
            for (slot, owner) in level {
                // SAFETY: every slot pointer is either `self.root` or a child field of a
                //         node in a subtree that no other slot in this level overlaps,
                //         and `self` is borrowed mutably for the whole pass.
                let slot = unsafe { &mut *slot };
                if rebalance(slot) {
                    restructured += 1;
                    // the new top and everything it picked up still point at their old
                    // parents; the ancestors above `owner` were not touched
                    if let Some(top) = slot.as_deref_mut() {
                        top.parent = owner;
                        top.fix_parents();
                    }
                }
                if let Some(node) = slot.as_deref_mut() {
                    let this = Some(NonNull::from(&mut *node));
                    next_level.push((&mut node.left as *mut Link<T>, this));
                    next_level.push((&mut node.right as *mut Link<T>, this));
                }
            }
            level = next_level;
        }
        if let Some(root) = self.root.as_deref_mut() {
            root.color = Color::Black;
        }
        debug!("full rebalance pass restructured {restructured} subtrees");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: i32, color: Color) -> Box<Node<i32>> {
        let mut n = Node::new(value, None);
        n.color = color;
        n
    }

    fn shape_of(link: &Link<i32>) -> (i32, Color, Option<(i32, Color)>, Option<(i32, Color)>) {
        let n = link.as_deref().unwrap();
        let side = |l: &Link<i32>| l.as_deref().map(|c| (c.value, c.color));
        (n.value, n.color, side(&n.left), side(&n.right))
    }

    #[test]
    fn left_left() {
        let mut left = node(2, Color::Red);
        left.left = Some(node(1, Color::Red));
        let mut center = node(3, Color::Black);
        center.left = Some(left);
        let mut slot = Some(center);

        assert!(rebalance(&mut slot));
        assert_eq!(
            shape_of(&slot),
            (2, Color::Red, Some((1, Color::Black)), Some((3, Color::Black)))
        );
    }

    #[test]
    fn left_right() {
        let mut left = node(1, Color::Red);
        left.right = Some(node(2, Color::Red));
        let mut center = node(3, Color::Black);
        center.left = Some(left);
        let mut slot = Some(center);

        assert!(rebalance(&mut slot));
        assert_eq!(
            shape_of(&slot),
            (2, Color::Red, Some((1, Color::Black)), Some((3, Color::Black)))
        );
    }

    #[test]
    fn right_right_and_right_left() {
        let mut right = node(2, Color::Red);
        right.right = Some(node(3, Color::Red));
        let mut center = node(1, Color::Black);
        center.right = Some(right);
        let mut slot = Some(center);
        assert!(rebalance(&mut slot));
        assert_eq!(
            shape_of(&slot),
            (2, Color::Red, Some((1, Color::Black)), Some((3, Color::Black)))
        );

        let mut right = node(3, Color::Red);
        right.left = Some(node(2, Color::Red));
        let mut center = node(1, Color::Black);
        center.right = Some(right);
        let mut slot = Some(center);
        assert!(rebalance(&mut slot));
        assert_eq!(
            shape_of(&slot),
            (2, Color::Red, Some((1, Color::Black)), Some((3, Color::Black)))
        );
    }

    #[test]
    fn checks_the_right_side_when_the_left_is_calm() {
        // red uncle on the left, violation on the right
        let mut right = node(3, Color::Red);
        right.right = Some(node(4, Color::Red));
        let mut center = node(2, Color::Black);
        center.left = Some(node(1, Color::Red));
        center.right = Some(right);
        let mut slot = Some(center);

        assert!(rebalance(&mut slot));
        let (top, color, _, right) = shape_of(&slot);
        assert_eq!((top, color, right), (3, Color::Red, Some((4, Color::Black))));
    }

    #[test]
    fn leaves_valid_subtrees_alone() {
        let mut center = node(2, Color::Black);
        center.left = Some(node(1, Color::Red));
        center.right = Some(node(3, Color::Red));
        let mut slot = Some(center);
        assert!(!rebalance(&mut slot));

        let mut red_center = node(2, Color::Red);
        let mut left = node(1, Color::Red);
        left.left = Some(node(0, Color::Red));
        red_center.left = Some(left);
        let mut slot = Some(red_center);
        assert!(!rebalance(&mut slot));

        assert!(!rebalance::<i32>(&mut None));
    }
}
