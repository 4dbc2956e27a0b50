//! Balanced in-memory index.
//!
//! An AVL tree keyed by any `Ord` type. Every fresh insertion rebalances the
//! path back to the root so the height stays logarithmic in the number of
//! entries; re-inserting an existing key only replaces its value.
//!
//! # Structure
//!
//! - `node`: owned tree nodes, height bookkeeping and the two rotations
//! - `tree`: the index itself, insertion with case analysis, lookups and
//!   in-order traversal
//!
//! # Usage
//!
//! ```
//! use catalog::index::BalancedIndex;
//!
//! let mut index = BalancedIndex::new();
//! for key in [1, 2, 3] {
//!     index.insert(key, key * 10);
//! }
//!
//! // Ascending inserts trigger a single right-right rotation.
//! assert_eq!(index.root().map(|node| *node.key()), Some(2));
//! assert_eq!(index.rotation_stats().right_right, 1);
//! assert_eq!(index.search(&3), Some(&30));
//! assert_eq!(index.in_order_values(), vec![&10, &20, &30]);
//! ```

mod node;
mod tree;

pub use node::{Node, Rotation, RotationStats};
pub use tree::{BalancedIndex, IndexError, InvariantError, Iter};
