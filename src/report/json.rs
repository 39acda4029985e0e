//! JSON renderer for run statistics.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::run::RunSummary;
use crate::stats::ProductionStats;

/// Serializable snapshot of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSnapshot {
    pub workers: usize,
    pub capacity: usize,
    pub matrices_per_producer: usize,
    /// `"random"` or `"NxN"`.
    pub mode: String,
    /// `"adjacent"` or `"search"`.
    pub policy: String,
    pub stats: ProductionStats,
    pub elapsed_ms: u64,
    /// Whether counts and element sums balance.
    pub balanced: bool,
}

impl RunSnapshot {
    pub fn new(config: &Config, summary: &RunSummary) -> Self {
        Self {
            workers: config.workers(),
            capacity: config.capacity(),
            matrices_per_producer: config.matrix_count(),
            mode: config.mode().to_string(),
            policy: format!("{:?}", config.policy()).to_lowercase(),
            stats: summary.stats,
            elapsed_ms: summary.elapsed.as_millis() as u64,
            balanced: summary.is_consistent(config),
        }
    }
}

/// Serializes a run to JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    pub fn to_json(
        &self,
        config: &Config,
        summary: &RunSummary,
    ) -> Result<String, serde_json::Error> {
        let snapshot = RunSnapshot::new(config, summary);
        if self.pretty {
            serde_json::to_string_pretty(&snapshot)
        } else {
            serde_json::to_string(&snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::PairingPolicy;
    use crate::report::tests::sample_summary;

    #[test]
    fn test_snapshot_fields() {
        let config = Config::new(1, 4, 12, 3)
            .unwrap()
            .with_policy(PairingPolicy::Search);
        let snapshot = RunSnapshot::new(&config, &sample_summary());
        assert_eq!(snapshot.mode, "3x3");
        assert_eq!(snapshot.policy, "search");
        assert_eq!(snapshot.elapsed_ms, 1500);
        assert!(snapshot.balanced);
    }

    #[test]
    fn test_to_json_roundtrip() {
        let config = Config::new(1, 4, 12, 0).unwrap();
        let json = JsonReport::new().to_json(&config, &sample_summary()).unwrap();
        assert!(json.contains(r#""mode":"random""#));
        assert!(json.contains(r#""policy":"adjacent""#));

        let back: RunSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats.sum_total, 410);
    }

    #[test]
    fn test_pretty() {
        let config = Config::default();
        let json = JsonReport::new()
            .pretty(true)
            .to_json(&config, &sample_summary())
            .unwrap();
        assert!(json.contains("\n  \"workers\": 1"));
    }
}
