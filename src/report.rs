//! Rendering of run statistics.
//!
//! The plain-text form is always available. Table and JSON renderers are
//! gated behind feature flags to keep the library's dependencies small:
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module
//!
//! # Example
//!
//! ```rust
//! use pcmatrix::config::Config;
//! use pcmatrix::report;
//!
//! let config = Config::new(1, 4, 10, 0).unwrap();
//! let summary = pcmatrix::run::run(&config).unwrap();
//! let text = report::render_text(&summary);
//! assert!(text.contains("Matrices produced=10 consumed=10"));
//! ```

use std::fmt::Write;

use crate::run::RunSummary;

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;

/// Renders the summary as the classic two-line statistics block, followed by
/// the product sum and the run time.
pub fn render_text(summary: &RunSummary) -> String {
    let stats = &summary.stats;
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Sum of Matrix elements --> Produced={} = Consumed={}",
        stats.produced_element_sum, stats.consumed_element_sum
    );
    let _ = writeln!(
        out,
        "Matrices produced={} consumed={} multiplied={}",
        stats.produced_total, stats.consumed_total, stats.multiplied_total
    );
    let _ = writeln!(out, "Sum of all products={}", stats.sum_total);
    let _ = write!(out, "Elapsed: {:.3}s", summary.elapsed.as_secs_f64());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ProductionStats;
    use std::time::Duration;

    pub(crate) fn sample_summary() -> RunSummary {
        RunSummary {
            stats: ProductionStats {
                produced_total: 12,
                consumed_total: 12,
                multiplied_total: 3,
                sum_total: 410,
                produced_element_sum: 250,
                consumed_element_sum: 250,
            },
            produced_counter: 12,
            consumed_counter: 12,
            occupancy: 0,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample_summary());
        assert_eq!(
            text,
            "Sum of Matrix elements --> Produced=250 = Consumed=250\n\
             Matrices produced=12 consumed=12 multiplied=3\n\
             Sum of all products=410\n\
             Elapsed: 1.500s"
        );
    }
}
