//! Error types.
//!
//! Configuration problems are reported before any thread starts. Once a run
//! is under way the only failures left are the operating system refusing to
//! create a thread and a worker thread panicking.

use thiserror::Error;

use crate::config::ConfigError;

/// The two kinds of worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Producer,
    Consumer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Producer => write!(f, "producer"),
            Role::Consumer => write!(f, "consumer"),
        }
    }
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn {role} thread {index}: {source}")]
    Spawn {
        role: Role,
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("{role} thread {index} panicked")]
    WorkerPanicked { role: Role, index: usize },

    /// Error rendering the JSON report.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for run operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::WorkerPanicked {
            role: Role::Consumer,
            index: 3,
        };
        assert_eq!(err.to_string(), "consumer thread 3 panicked");

        let err = Error::from(ConfigError::NonPositive {
            field: "capacity",
            value: 0,
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration: capacity must be at least 1, got 0"
        );
    }

    #[test]
    fn test_spawn_source() {
        use std::error::Error as _;

        let err = Error::Spawn {
            role: Role::Producer,
            index: 0,
            source: std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no memory"),
        };
        assert!(err.to_string().starts_with("failed to spawn producer thread 0"));
        assert!(err.source().is_some());
    }
}
