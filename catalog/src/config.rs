//! Demo configuration module.
//!
//! This module provides configuration loading for the catalog demo from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `CATALOG_SORT_KEYS`: Comma-separated sort keys to demonstrate (default: `name,price,category`)
//! - `CATALOG_TIMING_UNIT`: Unit sort timings are reported in, `ns`, `us` or `ms` (default: `ms`)
//!
//! # Invariants
//!
//! - `sort_keys` is never empty
//! - `timing_unit` is always one of the supported units

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::ordering::SortKey;

/// Unit used when reporting elapsed sort time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
}

impl TimingUnit {
    /// Express `elapsed` as a whole number of this unit, truncating.
    #[must_use]
    pub const fn whole(self, elapsed: Duration) -> u128 {
        match self {
            Self::Nanoseconds => elapsed.as_nanos(),
            Self::Microseconds => elapsed.as_micros(),
            Self::Milliseconds => elapsed.as_millis(),
        }
    }

    /// Short suffix for this unit.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
        }
    }
}

impl FromStr for TimingUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ns" => Ok(Self::Nanoseconds),
            "us" => Ok(Self::Microseconds),
            "ms" => Ok(Self::Milliseconds),
            other => Err(format!("'{other}' is not a timing unit (must be ns, us or ms)")),
        }
    }
}

/// Demo configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()`:
/// - `sort_keys` contains at least one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Orderings to run over the catalog snapshot, in order.
    pub sort_keys: Vec<SortKey>,
    /// Unit used when logging sort timings.
    pub timing_unit: TimingUnit,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sort_keys: SortKey::ALL.to_vec(),
            timing_unit: Self::DEFAULT_TIMING_UNIT,
        }
    }
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl DemoConfig {
    /// Default timing unit.
    pub const DEFAULT_TIMING_UNIT: TimingUnit = TimingUnit::Milliseconds;

    const SORT_KEYS_VAR: &'static str = "CATALOG_SORT_KEYS";
    const TIMING_UNIT_VAR: &'static str = "CATALOG_TIMING_UNIT";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `CATALOG_SORT_KEYS` is set but empty, or names an unknown key
    /// - `CATALOG_TIMING_UNIT` is set but not a supported unit
    pub fn from_env() -> Result<Self, ConfigError> {
        let sort_keys = match std::env::var(Self::SORT_KEYS_VAR) {
            Ok(value) => Self::parse_sort_keys(&value)?,
            Err(_) => SortKey::ALL.to_vec(),
        };
        let timing_unit = match std::env::var(Self::TIMING_UNIT_VAR) {
            Ok(value) => Self::parse_timing_unit(&value)?,
            Err(_) => Self::DEFAULT_TIMING_UNIT,
        };

        Ok(Self {
            sort_keys,
            timing_unit,
        })
    }

    /// Parse a comma-separated list of sort keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, has an empty entry, or names an
    /// unknown key.
    pub fn parse_sort_keys(value: &str) -> Result<Vec<SortKey>, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            name: Self::SORT_KEYS_VAR.to_string(),
            message,
        };

        if value.trim().is_empty() {
            return Err(invalid("must name at least one sort key".to_string()));
        }

        value
            .split(',')
            .map(|entry| {
                if entry.trim().is_empty() {
                    return Err(invalid(format!("'{value}' contains an empty entry")));
                }
                entry.parse::<SortKey>().map_err(|e| invalid(e.to_string()))
            })
            .collect()
    }

    /// Parse a timing unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not `ns`, `us` or `ms`.
    pub fn parse_timing_unit(value: &str) -> Result<TimingUnit, ConfigError> {
        value
            .parse::<TimingUnit>()
            .map_err(|message| ConfigError::InvalidValue {
                name: Self::TIMING_UNIT_VAR.to_string(),
                message,
            })
    }
}
