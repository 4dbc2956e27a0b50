//! Tree nodes and the rotation primitives used to rebalance them.
//!
//! Every node exclusively owns its children. Rotations take a subtree root by
//! value and hand back the new root, which the caller stores into its own
//! child slot.

use std::fmt;

/// An owned, possibly empty, subtree.
pub(super) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A single key-value entry in the balanced index.
///
/// # Invariants
///
/// - `height` is 1 for a leaf, else `1 + max(height(left), height(right))`.
/// - Every key in `left` is less than `key`; every key in `right` is greater.
#[derive(Debug)]
pub struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) height: u32,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Create a leaf node.
    pub(super) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// The node's key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The node's value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// The stored height of the subtree rooted here.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The left child, if any.
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The right child, if any.
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// `height(left) - height(right)`.
    #[must_use]
    pub fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }

    /// Recompute `height` from the children's stored heights.
    pub(super) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

/// Height of a possibly empty subtree (0 when empty).
pub(super) fn height<K, V>(link: &Link<K, V>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Rotate `y` right around its left child.
///
/// The left child `x` takes `y`'s place, `x`'s former right subtree becomes
/// `y`'s left subtree, and heights are recomputed child first.
#[allow(clippy::unnecessary_box_returns)]
pub(super) fn rotate_right<K, V>(mut y: Box<Node<K, V>>) -> Box<Node<K, V>> {
    debug_assert!(y.left.is_some(), "right rotation requires a left child");
    let Some(mut x) = y.left.take() else {
        return y;
    };

    y.left = x.right.take();
    y.update_height();

    x.right = Some(y);
    x.update_height();
    x
}

/// Rotate `x` left around its right child. Mirror of [`rotate_right`].
#[allow(clippy::unnecessary_box_returns)]
pub(super) fn rotate_left<K, V>(mut x: Box<Node<K, V>>) -> Box<Node<K, V>> {
    debug_assert!(x.right.is_some(), "left rotation requires a right child");
    let Some(mut y) = x.right.take() else {
        return x;
    };

    x.right = y.left.take();
    x.update_height();

    y.left = Some(x);
    y.update_height();
    y
}

/// The four imbalance cases that insertion can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// New key went left of the left child: single right rotation.
    LeftLeft,
    /// New key went right of the right child: single left rotation.
    RightRight,
    /// New key went right of the left child: left rotation on the child, then
    /// right rotation on the node.
    LeftRight,
    /// New key went left of the right child: right rotation on the child, then
    /// left rotation on the node.
    RightLeft,
}

impl Rotation {
    /// Whether this case needs two rotations.
    #[must_use]
    pub const fn is_double(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LeftLeft => "left-left",
            Self::RightRight => "right-right",
            Self::LeftRight => "left-right",
            Self::RightLeft => "right-left",
        };
        f.write_str(name)
    }
}

/// Running count of rebalancing cases fired by an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationStats {
    /// Left-Left cases.
    pub left_left: u64,
    /// Right-Right cases.
    pub right_right: u64,
    /// Left-Right cases.
    pub left_right: u64,
    /// Right-Left cases.
    pub right_left: u64,
}

impl RotationStats {
    /// Record one rebalancing case.
    pub(super) const fn record(&mut self, rotation: Rotation) {
        match rotation {
            Rotation::LeftLeft => self.left_left += 1,
            Rotation::RightRight => self.right_right += 1,
            Rotation::LeftRight => self.left_right += 1,
            Rotation::RightLeft => self.right_left += 1,
        }
    }

    /// Number of cases that fired, single and double alike.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.left_left + self.right_right + self.left_right + self.right_left
    }

    /// Number of single-rotation cases.
    #[must_use]
    pub const fn single(&self) -> u64 {
        self.left_left + self.right_right
    }

    /// Number of double-rotation cases.
    #[must_use]
    pub const fn double(&self) -> u64 {
        self.left_right + self.right_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_left() -> Box<Node<u32, &'static str>> {
        // 3 -> 2 -> 1 down the left spine
        let mut one = Box::new(Node::leaf(1, "one"));
        one.update_height();
        let mut two = Box::new(Node::leaf(2, "two"));
        two.left = Some(one);
        two.update_height();
        let mut three = Box::new(Node::leaf(3, "three"));
        three.left = Some(two);
        three.update_height();
        three
    }

    #[test]
    fn test_leaf_height() {
        let node = Node::leaf("k", 0);
        assert_eq!(node.height(), 1);
        assert_eq!(node.balance_factor(), 0);
        assert!(node.left().is_none());
        assert!(node.right().is_none());
    }

    #[test]
    fn test_rotate_right_promotes_left_child() {
        let root = chain_left();
        assert_eq!(root.height(), 3);
        assert_eq!(root.balance_factor(), 2);

        let root = rotate_right(root);

        assert_eq!(*root.key(), 2);
        assert_eq!(root.height(), 2);
        assert_eq!(root.left().map(|n| *n.key()), Some(1));
        assert_eq!(root.right().map(|n| *n.key()), Some(3));
        assert_eq!(root.right().map(Node::height), Some(1));
    }

    #[test]
    fn test_rotate_right_moves_inner_subtree() {
        // y(4) with left x(2) whose right child is 3; after rotation 3 hangs off y.
        let mut x = Box::new(Node::leaf(2, ()));
        x.left = Some(Box::new(Node::leaf(1, ())));
        x.right = Some(Box::new(Node::leaf(3, ())));
        x.update_height();
        let mut y = Box::new(Node::leaf(4, ()));
        y.left = Some(x);
        y.right = Some(Box::new(Node::leaf(5, ())));
        y.update_height();

        let root = rotate_right(y);

        assert_eq!(*root.key(), 2);
        let y = root.right().expect("y moved right");
        assert_eq!(*y.key(), 4);
        assert_eq!(y.left().map(|n| *n.key()), Some(3));
        assert_eq!(y.height(), 2);
        assert_eq!(root.height(), 3);
    }

    #[test]
    fn test_rotate_left_is_mirror() {
        let mut one = Box::new(Node::leaf(1, ()));
        let mut two = Box::new(Node::leaf(2, ()));
        two.right = Some(Box::new(Node::leaf(3, ())));
        two.update_height();
        one.right = Some(two);
        one.update_height();
        assert_eq!(one.balance_factor(), -2);

        let root = rotate_left(one);

        assert_eq!(*root.key(), 2);
        assert_eq!(root.left().map(|n| *n.key()), Some(1));
        assert_eq!(root.right().map(|n| *n.key()), Some(3));
        assert_eq!(root.height(), 2);
        assert_eq!(root.balance_factor(), 0);
    }

    #[test]
    fn test_rotation_stats() {
        let mut stats = RotationStats::default();
        stats.record(Rotation::LeftLeft);
        stats.record(Rotation::RightLeft);
        stats.record(Rotation::RightLeft);

        assert_eq!(stats.total(), 3);
        assert_eq!(stats.single(), 1);
        assert_eq!(stats.double(), 2);
        assert!(Rotation::LeftRight.is_double());
        assert!(!Rotation::RightRight.is_double());
        assert_eq!(Rotation::RightLeft.to_string(), "right-left");
    }
}
