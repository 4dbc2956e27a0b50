//! Stable top-down merge sort driven by a caller-supplied ordering.
//!
//! Each level splits its input into two owned halves, sorts them recursively
//! and merges them into a fresh vector. The caller's vector is then refilled
//! with the merged result, so its handle stays valid while its contents are
//! replaced wholesale.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use crate::sort::clock::{Clock, SystemClock};

/// A pluggable in-place sorting strategy that reports its own run time.
pub trait Sorter<T> {
    /// Sort `sequence` in place by `order` and return the time spent sorting.
    ///
    /// Elements that compare equal keep their input order.
    fn sort<F>(&self, sequence: &mut Vec<T>, order: F) -> Duration
    where
        F: FnMut(&T, &T) -> Ordering;
}

/// Copy-based merge sort timed against a [`Clock`].
///
/// Uses O(n log n) comparisons and O(n log n) auxiliary allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSort<C = SystemClock> {
    clock: C,
}

impl MergeSort {
    /// Create a merge sort timed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: SystemClock::new(),
        }
    }
}

impl<C: Clock> MergeSort<C> {
    /// Create a merge sort timed by `clock`.
    #[must_use]
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// The clock used for timing.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Sort with arguments that may be missing.
    ///
    /// A missing sequence or ordering is rejected before any work is done.
    pub fn try_sort<T, F>(
        &self,
        sequence: Option<&mut Vec<T>>,
        order: Option<F>,
    ) -> Result<Duration, SortError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let sequence = sequence.ok_or(SortError::MissingSequence)?;
        let order = order.ok_or(SortError::MissingOrder)?;
        Ok(self.sort(sequence, order))
    }
}

impl<T, C: Clock> Sorter<T> for MergeSort<C> {
    fn sort<F>(&self, sequence: &mut Vec<T>, mut order: F) -> Duration
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = sequence.len();
        if len <= 1 {
            return Duration::ZERO;
        }

        let start = self.clock.now();
        let items = std::mem::take(sequence);
        *sequence = merge_sort(items, &mut order);
        let elapsed = self.clock.now().saturating_sub(start);

        debug_assert_eq!(sequence.len(), len, "merge sort must not drop elements");
        tracing::debug!(len, elapsed_ns = elapsed.as_nanos(), "merge sort finished");
        elapsed
    }
}

fn merge_sort<T, F>(mut items: Vec<T>, order: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let middle = items.len() / 2;
    let right = items.split_off(middle);

    let left = merge_sort(items, order);
    let right = merge_sort(right, order);
    merge(left, right, order)
}

/// Merge two sorted runs. Ties go to `left`, which keeps the sort stable.
fn merge<T, F>(left: Vec<T>, right: Vec<T>, order: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if order(l, r) == Ordering::Greater {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    merged
}

/// Errors returned by [`MergeSort::try_sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortError {
    /// No sequence was supplied.
    MissingSequence,
    /// No ordering was supplied.
    MissingOrder,
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSequence => write!(f, "invalid argument: sequence must be set"),
            Self::MissingOrder => write!(f, "invalid argument: ordering must be set"),
        }
    }
}

impl std::error::Error for SortError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::clock::ManualClock;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        price: f64,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                name: "C",
                price: 3.0,
            },
            Item {
                name: "A",
                price: 1.0,
            },
            Item {
                name: "B",
                price: 2.0,
            },
        ]
    }

    fn names(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|item| item.name).collect()
    }

    #[test]
    fn test_sort_by_price() {
        let mut items = items();
        MergeSort::new().sort(&mut items, |a, b| a.price.total_cmp(&b.price));

        assert_eq!(names(&items), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_by_name() {
        let mut items = items();
        MergeSort::new().sort(&mut items, |a, b| a.name.cmp(b.name));

        assert_eq!(names(&items), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_empty_and_single() {
        let sorter = MergeSort::with_clock(ManualClock::new(Duration::from_millis(7)));

        let mut empty: Vec<u32> = Vec::new();
        assert_eq!(sorter.sort(&mut empty, Ord::cmp), Duration::ZERO);
        assert!(empty.is_empty());

        let mut single = vec![42];
        assert_eq!(sorter.sort(&mut single, Ord::cmp), Duration::ZERO);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn test_sort_reports_clock_time() {
        let sorter = MergeSort::with_clock(ManualClock::new(Duration::from_millis(7)));
        let mut values = vec![5, 1, 4];

        let elapsed = sorter.sort(&mut values, Ord::cmp);

        assert_eq!(elapsed, Duration::from_millis(7));
        assert_eq!(values, vec![1, 4, 5]);
    }

    #[test]
    fn test_sort_is_stable() {
        // (group, input position); sort by group only.
        let mut pairs = vec![(2, 0), (1, 1), (2, 2), (1, 3), (0, 4), (2, 5), (1, 6)];
        MergeSort::new().sort(&mut pairs, |a, b| a.0.cmp(&b.0));

        assert_eq!(
            pairs,
            vec![(0, 4), (1, 1), (1, 3), (1, 6), (2, 0), (2, 2), (2, 5)]
        );
    }

    #[test]
    fn test_sort_all_equal_keeps_input_order() {
        let mut values: Vec<(u8, usize)> = (0..33).map(|i| (7, i)).collect();
        let expected = values.clone();

        MergeSort::new().sort(&mut values, |a, b| a.0.cmp(&b.0));

        assert_eq!(values, expected);
    }

    #[test]
    fn test_sort_reverse_order() {
        let mut values: Vec<i32> = (0..100).collect();
        MergeSort::new().sort(&mut values, |a, b| b.cmp(a));

        let expected: Vec<i32> = (0..100).rev().collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_sort_keeps_duplicates() {
        let mut values = vec![3, 1, 3, 2, 1, 3];
        MergeSort::new().sort(&mut values, Ord::cmp);

        assert_eq!(values, vec![1, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn test_sort_handle_stays_valid() {
        let mut values = vec![3, 2, 1];
        let handle = &mut values;
        MergeSort::new().sort(handle, Ord::cmp);
        handle.push(4);

        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_try_sort_rejects_missing_arguments() {
        let sorter = MergeSort::new();
        let mut values = vec![2, 1];

        let by_value = |a: &u32, b: &u32| a.cmp(b);

        let missing_sequence = sorter.try_sort::<u32, _>(None, Some(by_value));
        assert_eq!(missing_sequence, Err(SortError::MissingSequence));

        let missing_order = sorter.try_sort(Some(&mut values), None::<fn(&u32, &u32) -> Ordering>);
        assert_eq!(missing_order, Err(SortError::MissingOrder));
        assert_eq!(values, vec![2, 1]);

        let sorted = sorter.try_sort(Some(&mut values), Some(by_value));
        assert!(sorted.is_ok());
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_sort_error_display() {
        assert_eq!(
            SortError::MissingSequence.to_string(),
            "invalid argument: sequence must be set"
        );
        assert_eq!(
            SortError::MissingOrder.to_string(),
            "invalid argument: ordering must be set"
        );
    }
}
