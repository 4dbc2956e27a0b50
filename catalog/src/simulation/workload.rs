//! Workload generator for deterministic simulation testing.
//!
//! This module generates random but reproducible operation sequences for the
//! balanced index and the merge sort. Given the same seed, the generator
//! yields the same operations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for workload generation.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Number of distinct index keys. Smaller pools produce more updates.
    pub key_space: u32,
    /// Probability of a search rather than an insert (0.0 - 1.0).
    pub search_rate: f64,
    /// Probability that an insert takes the next key in ascending order
    /// instead of a random one. Sorted runs are the classic worst case for
    /// an unbalanced tree.
    pub ascending_rate: f64,
    /// Probability of a sort operation (0.0 - 1.0).
    pub sort_rate: f64,
    /// Maximum length of a generated sort input.
    pub max_sort_len: usize,
    /// Number of distinct sort keys. Small values force many ties.
    pub sort_key_space: u8,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            key_space: 512,
            search_rate: 0.25,
            ascending_rate: 0.3,
            sort_rate: 0.05,
            max_sort_len: 64,
            sort_key_space: 8,
        }
    }
}

/// A single generated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert or update `key`.
    Insert { key: u32, value: u64 },
    /// Look up `key`.
    Search { key: u32 },
    /// Sort `input` by its first field. The second field is the input
    /// position, which makes stability observable.
    Sort { input: Vec<(u8, usize)> },
}

/// Generator for random operations.
pub struct WorkloadGenerator {
    rng: StdRng,
    config: WorkloadConfig,
    next_ascending: u32,
    next_value: u64,
}

impl WorkloadGenerator {
    /// Create a generator with the default configuration.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, WorkloadConfig::default())
    }

    /// Create a generator with a custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: WorkloadConfig) -> Self {
        assert!(config.key_space > 0, "key_space must be positive");
        assert!(config.sort_key_space > 0, "sort_key_space must be positive");
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            next_ascending: 0,
            next_value: 0,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Generate the next operation.
    pub fn next_operation(&mut self) -> Operation {
        if self.rng.random::<f64>() < self.config.sort_rate {
            return Operation::Sort {
                input: self.sort_input(),
            };
        }

        if self.rng.random::<f64>() < self.config.search_rate {
            return Operation::Search {
                key: self.random_key(),
            };
        }

        let key = if self.rng.random::<f64>() < self.config.ascending_rate {
            let key = self.next_ascending;
            self.next_ascending = (self.next_ascending + 1) % self.config.key_space;
            key
        } else {
            self.random_key()
        };

        let value = self.next_value;
        self.next_value += 1;
        Operation::Insert { key, value }
    }

    /// Generate a sort input of random length with many repeated keys.
    pub fn sort_input(&mut self) -> Vec<(u8, usize)> {
        let len = self.rng.random_range(0..=self.config.max_sort_len);
        (0..len)
            .map(|position| {
                let key = self.rng.random_range(0..self.config.sort_key_space);
                (key, position)
            })
            .collect()
    }

    fn random_key(&mut self) -> u32 {
        self.rng.random_range(0..self.config.key_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_operations() {
        let mut a = WorkloadGenerator::new(42);
        let mut b = WorkloadGenerator::new(42);

        for _ in 0..200 {
            assert_eq!(a.next_operation(), b.next_operation());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = WorkloadGenerator::new(1);
        let mut b = WorkloadGenerator::new(2);

        let ops_a: Vec<Operation> = (0..50).map(|_| a.next_operation()).collect();
        let ops_b: Vec<Operation> = (0..50).map(|_| b.next_operation()).collect();
        assert_ne!(ops_a, ops_b);
    }

    #[test]
    fn test_keys_stay_in_key_space() {
        let config = WorkloadConfig {
            key_space: 10,
            ..WorkloadConfig::default()
        };
        let mut generator = WorkloadGenerator::with_config(7, config);

        for _ in 0..500 {
            match generator.next_operation() {
                Operation::Insert { key, .. } | Operation::Search { key } => assert!(key < 10),
                Operation::Sort { input } => {
                    assert!(input.len() <= generator.config().max_sort_len);
                }
            }
        }
    }

    #[test]
    fn test_insert_values_are_unique() {
        let config = WorkloadConfig {
            search_rate: 0.0,
            sort_rate: 0.0,
            ..WorkloadConfig::default()
        };
        let mut generator = WorkloadGenerator::with_config(3, config);

        let values: Vec<u64> = (0..100)
            .filter_map(|_| match generator.next_operation() {
                Operation::Insert { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        let expected: Vec<u64> = (0..100).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_sort_input_positions() {
        let mut generator = WorkloadGenerator::new(9);
        let input = generator.sort_input();

        for (position, (key, recorded)) in input.iter().enumerate() {
            assert_eq!(*recorded, position);
            assert!(*key < generator.config().sort_key_space);
        }
    }
}
