use std::error::Error;
use std::fmt;
use std::ptr::NonNull;

use compare::Compare;

use super::RbTree;
use super::node::{Color, Link, Node};

/// The first broken rule [`RbTree::check_invariants`] ran into.
///
/// Depths count from `0` at the root. Positions count in-order from `0`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    RedRoot,
    RedRed { depth: usize },
    BlackHeight { expected: usize, found: usize },
    BrokenParentLink { depth: usize },
    OutOfOrder { position: usize },
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(f, "the root is red"),
            Self::RedRed { depth } => write!(f, "red node at depth {depth} has a red child"),
            Self::BlackHeight { expected, found } => {
                write!(f, "black height {found} on one path, {expected} on another")
            }
            Self::BrokenParentLink { depth } => {
                write!(f, "node at depth {depth} does not point back at its parent")
            }
            Self::OutOfOrder { position } => {
                write!(f, "element {position} orders before the one in front of it")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "tree claims {expected} elements but holds {found}")
            }
        }
    }
}

impl Error for InvariantViolation {}

impl<T, C> RbTree<T, C> {
    /// Checks the shape alone: the root has no parent, every child points back at the
    /// node that owns it, and the node count matches [`len`](RbTree::len).
    ///
    /// Colors are not looked at, so this holds even after erases have left the
    /// red-black rules broken.
    pub fn check_links(&self) -> Result<(), InvariantViolation> {
        if self.root.as_deref().is_some_and(|root| root.parent.is_some()) {
            return Err(InvariantViolation::BrokenParentLink { depth: 0 });
        }
        check_parents(&self.root, 0)?;
        let found = count_nodes(&self.root);
        if found != self.len {
            return Err(InvariantViolation::LengthMismatch { expected: self.len, found });
        }
        Ok(())
    }
}

impl<T, C: Compare<T>> RbTree<T, C> {
    /// Checks every red-black, ordering and bookkeeping rule, structural ones first.
    ///
    /// Returns the black height of the tree (absent children not counted).
    ///
    /// Complexity: O(n)
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        self.check_links()?;

        let mut prev: Option<&T> = None;
        for (position, value) in self.iter().enumerate() {
            if prev.is_some_and(|prev| self.cmp.compares_lt(value, prev)) {
                return Err(InvariantViolation::OutOfOrder { position });
            }
            prev = Some(value);
        }

        if Node::is_red(&self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        check_colors(&self.root, 0)
    }
}

fn check_parents<T>(link: &Link<T>, depth: usize) -> Result<(), InvariantViolation> {
    let Some(node) = link.as_deref() else {
        return Ok(());
    };
    let this = NonNull::from(node);
    for child in [&node.left, &node.right].into_iter().flatten() {
        if child.parent != Some(this) {
            return Err(InvariantViolation::BrokenParentLink { depth: depth + 1 });
        }
    }
    check_parents(&node.left, depth + 1)?;
    check_parents(&node.right, depth + 1)
}

fn check_colors<T>(link: &Link<T>, depth: usize) -> Result<usize, InvariantViolation> {
    let Some(node) = link.as_deref() else {
        return Ok(0);
    };
    if node.color == Color::Red && (Node::is_red(&node.left) || Node::is_red(&node.right)) {
        return Err(InvariantViolation::RedRed { depth });
    }
    let left = check_colors(&node.left, depth + 1)?;
    let right = check_colors(&node.right, depth + 1)?;
    if left != right {
        return Err(InvariantViolation::BlackHeight { expected: left, found: right });
    }
    Ok(left + usize::from(node.color == Color::Black))
}

fn count_nodes<T>(link: &Link<T>) -> usize {
    link.as_deref().map_or(0, |node| 1 + count_nodes(&node.left) + count_nodes(&node.right))
}
