//! Per-worker reports and the aggregated run statistics.
//!
//! Each producer and consumer thread owns its own report and returns it from
//! its thread. The driver folds them into a [`ProductionStats`] after every
//! thread has been joined, so none of these types need synchronization.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What one producer thread inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    /// Matrices inserted into the buffer.
    pub produced: usize,
    /// Sum of the elements of every inserted matrix.
    pub element_sum: i64,
}

/// What one consumer thread removed and multiplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Matrices removed from the buffer, paired or not.
    pub consumed: usize,
    /// Products computed.
    pub multiplied: usize,
    /// Sum of the element sums of every product.
    pub product_sum: i64,
    /// Sum of the elements of every removed matrix.
    pub element_sum: i64,
}

impl ConsumerReport {
    /// Adds `other` into `self`.
    pub fn merge(&mut self, other: &ConsumerReport) {
        self.consumed += other.consumed;
        self.multiplied += other.multiplied;
        self.product_sum += other.product_sum;
        self.element_sum += other.element_sum;
    }
}

/// Totals for a whole run.
///
/// # Examples
///
/// ```rust
/// use pcmatrix::stats::{ConsumerReport, ProducerReport, ProductionStats};
///
/// let producers = [ProducerReport { produced: 2, element_sum: 10 }];
/// let consumers = [ConsumerReport {
///     consumed: 2,
///     multiplied: 1,
///     product_sum: 42,
///     element_sum: 10,
/// }];
///
/// let stats = ProductionStats::aggregate(&producers, &consumers);
/// assert_eq!(stats.produced_total, 2);
/// assert_eq!(stats.sum_total, 42);
/// assert!(stats.is_balanced());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductionStats {
    pub produced_total: usize,
    pub consumed_total: usize,
    pub multiplied_total: usize,
    /// Sum of the element sums of every product.
    pub sum_total: i64,
    pub produced_element_sum: i64,
    pub consumed_element_sum: i64,
}

impl ProductionStats {
    /// Folds per-thread reports into run totals.
    pub fn aggregate(producers: &[ProducerReport], consumers: &[ConsumerReport]) -> Self {
        let mut consumed = ConsumerReport::default();
        for report in consumers {
            consumed.merge(report);
        }

        Self {
            produced_total: producers.iter().map(|r| r.produced).sum(),
            produced_element_sum: producers.iter().map(|r| r.element_sum).sum(),
            consumed_total: consumed.consumed,
            multiplied_total: consumed.multiplied,
            sum_total: consumed.product_sum,
            consumed_element_sum: consumed.element_sum,
        }
    }

    /// `true` when everything produced was consumed, by count and by
    /// element sum.
    pub fn is_balanced(&self) -> bool {
        self.produced_total == self.consumed_total
            && self.produced_element_sum == self.consumed_element_sum
    }

    /// Name/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, i64); 6] {
        [
            ("produced", self.produced_total as i64),
            ("consumed", self.consumed_total as i64),
            ("multiplied", self.multiplied_total as i64),
            ("product_sum", self.sum_total),
            ("produced_element_sum", self.produced_element_sum),
            ("consumed_element_sum", self.consumed_element_sum),
        ]
    }
}
