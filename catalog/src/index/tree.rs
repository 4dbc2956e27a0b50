//! AVL-balanced ordered index.
//!
//! Insertion is recursive: each call takes ownership of a subtree, inserts
//! into it, rebalances on the way back up and returns the new subtree root.
//! Re-inserting an existing key only swaps the value; the shape of the tree
//! never changes on that path.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::index::node::{Link, Node, Rotation, RotationStats, height, rotate_left, rotate_right};

/// An ordered key-value index that keeps itself height-balanced.
///
/// # Thread Safety
///
/// Reads take `&self` and never mutate, so shared traversal is safe while no
/// insert is in flight. Inserts take `&mut self`; callers sharing an index
/// across threads must synchronize writers externally.
#[derive(Debug)]
pub struct BalancedIndex<K, V> {
    root: Link<K, V>,
    rotations: RotationStats,
}

impl<K, V> Default for BalancedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// How an insertion into a subtree ended.
enum Descent<V> {
    /// The key already existed; holds the value it replaced.
    Updated(V),
    /// A new node was linked in. `via` is how the new key compared against
    /// the subtree root, or `None` if the subtree root is the new node.
    Inserted { via: Option<Ordering> },
}

impl<K, V> BalancedIndex<K, V> {
    /// Create an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            rotations: RotationStats {
                left_left: 0,
                right_right: 0,
                left_right: 0,
                right_left: 0,
            },
        }
    }

    /// The root node, if the index is not empty.
    #[must_use]
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Height of the tree (0 when empty).
    #[must_use]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of entries. Counted by traversal; the index stores no size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Rebalancing cases fired since the index was created.
    #[must_use]
    pub const fn rotation_stats(&self) -> RotationStats {
        self.rotations
    }

    /// All values in ascending key order.
    ///
    /// Each call walks the tree again from the root.
    #[must_use]
    pub fn in_order_values(&self) -> Vec<&V> {
        fn walk<'a, K, V>(link: &'a Link<K, V>, out: &mut Vec<&'a V>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(&node.value);
                walk(&node.right, out);
            }
        }

        let mut values = Vec::new();
        walk(&self.root, &mut values);
        values
    }

    /// Lazy iterator over entries in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }
}

impl<K: Ord, V> BalancedIndex<K, V> {
    /// Insert `value` under `key`, or replace the value if `key` exists.
    ///
    /// Returns the replaced value on update, `None` on a fresh insert. Only a
    /// fresh insert can restructure the tree.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let root = self.root.take();
        let (root, descent) = Self::insert_into(root, key, value, &mut self.rotations);
        self.root = Some(root);

        match descent {
            Descent::Updated(previous) => {
                tracing::trace!("index value replaced");
                Some(previous)
            }
            Descent::Inserted { .. } => {
                tracing::trace!(height = self.height(), "index entry inserted");
                None
            }
        }
    }

    /// Insert with a key that may be missing.
    ///
    /// A missing key is rejected before the tree is touched.
    pub fn try_insert(&mut self, key: Option<K>, value: V) -> Result<Option<V>, IndexError> {
        let key = key.ok_or(IndexError::MissingKey)?;
        Ok(self.insert(key, value))
    }

    /// Look up the value stored under `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        fn descend<'a, K, V, Q>(link: &'a Link<K, V>, key: &Q) -> Option<&'a V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            let node = link.as_ref()?;
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => Some(&node.value),
                Ordering::Less => descend(&node.left, key),
                Ordering::Greater => descend(&node.right, key),
            }
        }

        descend(&self.root, key)
    }

    /// Look up with a key that may be missing. A missing key finds nothing.
    #[must_use]
    pub fn search_opt<Q>(&self, key: Option<&Q>) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        key.and_then(|key| self.search(key))
    }

    /// Verify stored heights, balance factors and key order for every node.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        fn check<K: Ord, V>(link: &Link<K, V>) -> Result<u32, InvariantError> {
            let Some(node) = link else {
                return Ok(0);
            };

            let left = check(&node.left)?;
            let right = check(&node.right)?;

            let computed = 1 + left.max(right);
            if node.height != computed {
                return Err(InvariantError::HeightMismatch {
                    stored: node.height,
                    computed,
                });
            }

            let balance_factor = i64::from(left) - i64::from(right);
            if balance_factor.abs() > 1 {
                return Err(InvariantError::Unbalanced { balance_factor });
            }

            Ok(computed)
        }

        check(&self.root)?;

        let mut previous: Option<&K> = None;
        for (position, (key, _)) in self.iter().enumerate() {
            if previous.is_some_and(|previous| previous >= key) {
                return Err(InvariantError::OutOfOrder { position });
            }
            previous = Some(key);
        }

        Ok(())
    }

    fn insert_into(
        link: Link<K, V>,
        key: K,
        value: V,
        rotations: &mut RotationStats,
    ) -> (Box<Node<K, V>>, Descent<V>) {
        let Some(mut node) = link else {
            return (
                Box::new(Node::leaf(key, value)),
                Descent::Inserted { via: None },
            );
        };

        let ordering = key.cmp(&node.key);
        let child_descent = match ordering {
            Ordering::Equal => {
                let previous = std::mem::replace(&mut node.value, value);
                return (node, Descent::Updated(previous));
            }
            Ordering::Less => {
                let (child, descent) = Self::insert_into(node.left.take(), key, value, rotations);
                node.left = Some(child);
                descent
            }
            Ordering::Greater => {
                let (child, descent) = Self::insert_into(node.right.take(), key, value, rotations);
                node.right = Some(child);
                descent
            }
        };

        let via = match child_descent {
            Descent::Inserted { via } => via,
            updated @ Descent::Updated(_) => return (node, updated),
        };

        node.update_height();
        let node = Self::rebalance(node, via, rotations);
        (node, Descent::Inserted { via: Some(ordering) })
    }

    /// Restore the balance invariant at `node` after an insert below it.
    ///
    /// `via` is how the inserted key compared against the root of the child
    /// subtree it went into. A fresh leaf can never unbalance its parent, so
    /// whenever `node` is unbalanced `via` is `Some`.
    #[allow(clippy::unnecessary_box_returns)]
    fn rebalance(
        mut node: Box<Node<K, V>>,
        via: Option<Ordering>,
        rotations: &mut RotationStats,
    ) -> Box<Node<K, V>> {
        let balance_factor = node.balance_factor();

        let rotation = if balance_factor > 1 {
            if via == Some(Ordering::Greater) {
                Rotation::LeftRight
            } else {
                Rotation::LeftLeft
            }
        } else if balance_factor < -1 {
            if via == Some(Ordering::Less) {
                Rotation::RightLeft
            } else {
                Rotation::RightRight
            }
        } else {
            return node;
        };

        rotations.record(rotation);
        tracing::trace!(case = %rotation, balance_factor, "rebalancing subtree");

        match rotation {
            Rotation::LeftLeft => rotate_right(node),
            Rotation::RightRight => rotate_left(node),
            Rotation::LeftRight => {
                node.left = node.left.take().map(rotate_left);
                rotate_right(node)
            }
            Rotation::RightLeft => {
                node.right = node.right.take().map(rotate_right);
                rotate_left(node)
            }
        }
    }
}

impl<'a, K, V> IntoIterator for &'a BalancedIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedIndex<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (key, value) in iter {
            index.insert(key, value);
        }
        index
    }
}

/// In-order iterator over a [`BalancedIndex`].
///
/// Holds the path of nodes whose left subtrees have been visited but whose
/// own entry has not yet been yielded.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}

/// Errors returned by index operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// An insert was attempted without a key.
    MissingKey,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => write!(f, "invalid argument: key must be set"),
        }
    }
}

impl std::error::Error for IndexError {}

/// A structural invariant that does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// A node's stored height disagrees with its children.
    HeightMismatch {
        /// Height stored on the node.
        stored: u32,
        /// Height computed from the children.
        computed: u32,
    },
    /// A node's subtrees differ in height by more than one.
    Unbalanced {
        /// `height(left) - height(right)`.
        balance_factor: i64,
    },
    /// In-order keys are not strictly increasing.
    OutOfOrder {
        /// In-order position of the offending key.
        position: usize,
    },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeightMismatch { stored, computed } => {
                write!(f, "stored height {stored} but children give {computed}")
            }
            Self::Unbalanced { balance_factor } => {
                write!(f, "balance factor {balance_factor} outside [-1, 1]")
            }
            Self::OutOfOrder { position } => {
                write!(f, "key at in-order position {position} is not greater than its predecessor")
            }
        }
    }
}

impl std::error::Error for InvariantError {}
