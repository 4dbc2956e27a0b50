//! Comparator-driven sorting.
//!
//! [`MergeSort`] sorts a vector in place by any caller-supplied ordering,
//! keeps equal elements in input order, and reports how long the sort took.
//! Timing goes through a [`Clock`] so tests can pin durations down.
//!
//! # Usage
//!
//! ```
//! use catalog::sort::{MergeSort, Sorter};
//!
//! let mut prices = vec![3.0_f64, 1.0, 2.0];
//! let _elapsed = MergeSort::new().sort(&mut prices, |a, b| a.total_cmp(b));
//! assert_eq!(prices, vec![1.0, 2.0, 3.0]);
//! ```

mod clock;
mod merge;

pub use clock::{Clock, ManualClock, SystemClock};
pub use merge::{MergeSort, SortError, Sorter};
