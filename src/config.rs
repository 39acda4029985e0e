//! Run configuration.
//!
//! [`Config`] is the immutable record the driver hands to a run. It is built
//! from raw (possibly non-positive) integers with [`Config::new`], which is
//! where every configuration error is detected.

use std::mem;

use thiserror::Error;

use crate::coordinator::PairingPolicy;
use crate::matrix::{GenerationMode, Matrix};

/// Default number of producer/consumer pairs.
pub const DEFAULT_WORKERS: usize = 1;
/// Default number of buffer slots.
pub const DEFAULT_CAPACITY: usize = 200;
/// Default number of matrices per producer.
pub const DEFAULT_MATRIX_COUNT: usize = 1200;
/// Default matrix generation mode code (random dimensions).
pub const DEFAULT_MODE: i64 = 0;

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("matrix mode must be 0 (random) or a positive square size, got {0}")]
    InvalidMode(i64),

    #[error("{field} is too large: {value}")]
    TooLarge { field: &'static str, value: i64 },

    #[error("{workers} workers x {matrix_count} matrices overflows the total count")]
    TotalTooLarge { workers: usize, matrix_count: usize },
}

/// Immutable configuration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    workers: usize,
    capacity: usize,
    matrix_count: usize,
    total: usize,
    mode: GenerationMode,
    policy: PairingPolicy,
}

impl Config {
    /// Validates raw values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pcmatrix::config::{Config, ConfigError};
    ///
    /// let config = Config::new(2, 10, 100, 0).unwrap();
    /// assert_eq!(config.total_matrices(), 200);
    ///
    /// assert_eq!(
    ///     Config::new(1, 0, 100, 0),
    ///     Err(ConfigError::NonPositive { field: "capacity", value: 0 })
    /// );
    /// ```
    pub fn new(
        workers: i64,
        capacity: i64,
        matrix_count: i64,
        mode: i64,
    ) -> Result<Self, ConfigError> {
        let workers = positive("workers", workers)?;
        let capacity = positive("capacity", capacity)?;
        if !fits_allocation::<Option<Matrix>>(capacity) {
            return Err(ConfigError::TooLarge {
                field: "capacity",
                value: capacity as i64,
            });
        }
        let matrix_count = positive("matrix_count", matrix_count)?;
        let total = workers
            .checked_mul(matrix_count)
            .ok_or(ConfigError::TotalTooLarge {
                workers,
                matrix_count,
            })?;

        Ok(Self {
            workers,
            capacity,
            matrix_count,
            total,
            mode: generation_mode(mode)?,
            policy: PairingPolicy::default(),
        })
    }

    /// Sets the consumers' pairing policy.
    pub fn with_policy(mut self, policy: PairingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of producer/consumer pairs.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Matrices generated by each producer.
    pub fn matrix_count(&self) -> usize {
        self.matrix_count
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    /// Matrices produced (and consumed) by the whole run.
    pub fn total_matrices(&self) -> usize {
        self.total
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            capacity: DEFAULT_CAPACITY,
            matrix_count: DEFAULT_MATRIX_COUNT,
            total: DEFAULT_WORKERS * DEFAULT_MATRIX_COUNT,
            mode: GenerationMode::Random,
            policy: PairingPolicy::Adjacent,
        }
    }
}

fn positive(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    if value < 1 {
        return Err(ConfigError::NonPositive { field, value });
    }
    usize::try_from(value).map_err(|_| ConfigError::TooLarge { field, value })
}

/// Maps the numeric mode, rejecting square sizes whose matrices could not be
/// allocated.
fn generation_mode(code: i64) -> Result<GenerationMode, ConfigError> {
    let n = usize::try_from(code).map_err(|_| ConfigError::InvalidMode(code))?;
    let fits = n.checked_mul(n).is_some_and(fits_allocation::<i64>);
    if !fits {
        return Err(ConfigError::TooLarge {
            field: "mode",
            value: code,
        });
    }
    Ok(GenerationMode::from_code(n))
}

/// `true` if `len` values of `T` stay within the `isize::MAX` byte limit of
/// a single allocation.
fn fits_allocation<T>(len: usize) -> bool {
    len.checked_mul(mem::size_of::<T>())
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.workers(), 1);
        assert_eq!(config.capacity(), 200);
        assert_eq!(config.matrix_count(), 1200);
        assert_eq!(config.mode(), GenerationMode::Random);
        assert_eq!(config.policy(), PairingPolicy::Adjacent);
        assert_eq!(
            Config::new(
                DEFAULT_WORKERS as i64,
                DEFAULT_CAPACITY as i64,
                DEFAULT_MATRIX_COUNT as i64,
                DEFAULT_MODE
            ),
            Ok(config)
        );
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(
            Config::new(0, 10, 10, 0),
            Err(ConfigError::NonPositive {
                field: "workers",
                value: 0
            })
        );
        assert_eq!(
            Config::new(1, -5, 10, 0),
            Err(ConfigError::NonPositive {
                field: "capacity",
                value: -5
            })
        );
        assert_eq!(
            Config::new(1, 10, 0, 0),
            Err(ConfigError::NonPositive {
                field: "matrix_count",
                value: 0
            })
        );
    }

    #[test]
    fn test_rejects_negative_mode() {
        assert_eq!(Config::new(1, 1, 1, -1), Err(ConfigError::InvalidMode(-1)));
    }

    #[test]
    fn test_rejects_overflowing_total() {
        let half = i64::try_from(usize::MAX / 2).unwrap();
        assert_eq!(
            Config::new(3, 1, half, 0),
            Err(ConfigError::TotalTooLarge {
                workers: 3,
                matrix_count: usize::MAX / 2
            })
        );

        let config = Config::new(2, 1, half, 0).unwrap();
        assert_eq!(config.total_matrices(), (usize::MAX / 2) * 2);
    }

    #[test]
    fn test_rejects_unallocatable_square_mode() {
        let huge = i64::from(u32::MAX);
        assert_eq!(
            Config::new(1, 1, 1, huge),
            Err(ConfigError::TooLarge {
                field: "mode",
                value: huge
            })
        );
        assert!(Config::new(1, 1, 1, 64).is_ok());
    }

    #[test]
    fn test_rejects_unallocatable_capacity() {
        let err = Config::new(1, i64::MAX, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooLarge {
                field: "capacity",
                ..
            }
        ));
        assert_eq!(err.to_string(), format!("capacity is too large: {}", i64::MAX));
    }

    #[test]
    fn test_square_mode() {
        let config = Config::new(3, 4, 5, 2).unwrap();
        assert_eq!(config.mode(), GenerationMode::Square(2));
        assert_eq!(config.total_matrices(), 15);
    }

    #[test]
    fn test_with_policy() {
        let config = Config::default().with_policy(PairingPolicy::Search);
        assert_eq!(config.policy(), PairingPolicy::Search);
    }
}
