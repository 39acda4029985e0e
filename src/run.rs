//! Spawning, joining and aggregating one run.
//!
//! [`run`] creates one [`CoordinationContext`] for the configuration, starts
//! `workers` producer threads and `workers` consumer threads sharing it, waits
//! for all of them, and folds their reports into a [`RunSummary`].

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::coordinator::CoordinationContext;
use crate::error::{Error, Result, Role};
use crate::matrix::{MatrixProvider, RandomProvider};
use crate::stats::{ConsumerReport, ProducerReport, ProductionStats};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Totals aggregated from the per-thread reports.
    pub stats: ProductionStats,
    /// Final value of the coordinator's produced counter.
    pub produced_counter: usize,
    /// Final value of the coordinator's consumed counter.
    pub consumed_counter: usize,
    /// Matrices left in the buffer; zero for every completed run.
    pub occupancy: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// `true` when the thread reports and the shared counters agree with each
    /// other and with the configured total.
    pub fn is_consistent(&self, config: &Config) -> bool {
        let total = config.total_matrices();
        self.stats.is_balanced()
            && self.stats.produced_total == total
            && self.produced_counter == total
            && self.consumed_counter == total
            && self.occupancy == 0
    }
}

/// Runs `config` with random matrices.
///
/// # Examples
///
/// ```rust
/// use pcmatrix::config::Config;
///
/// let config = Config::new(2, 5, 40, 0).unwrap();
/// let summary = pcmatrix::run::run(&config).unwrap();
/// assert_eq!(summary.stats.produced_total, 80);
/// assert_eq!(summary.stats.consumed_total, 80);
/// assert!(summary.is_consistent(&config));
/// ```
pub fn run(config: &Config) -> Result<RunSummary> {
    run_with(config, Arc::new(RandomProvider::new(config.mode())))
}

/// Runs `config`, drawing matrices from `provider`.
pub fn run_with(config: &Config, provider: Arc<dyn MatrixProvider>) -> Result<RunSummary> {
    let ctx = Arc::new(
        CoordinationContext::new(config.capacity(), config.total_matrices())
            .with_policy(config.policy()),
    );

    info!(
        workers = config.workers(),
        capacity = config.capacity(),
        matrices = config.matrix_count(),
        mode = %config.mode(),
        policy = ?config.policy(),
        "starting run"
    );
    let start = Instant::now();

    let mut producers = Vec::with_capacity(config.workers());
    let mut consumers = Vec::with_capacity(config.workers());
    for index in 0..config.workers() {
        let ctx_p = Arc::clone(&ctx);
        let provider = Arc::clone(&provider);
        let count = config.matrix_count();
        producers.push(spawn(Role::Producer, index, move || {
            ctx_p.produce(provider.as_ref(), count)
        })?);

        let ctx_c = Arc::clone(&ctx);
        consumers.push(spawn(Role::Consumer, index, move || ctx_c.consume())?);
    }

    let producer_reports: Vec<ProducerReport> = join_all(Role::Producer, producers)?;
    let consumer_reports: Vec<ConsumerReport> = join_all(Role::Consumer, consumers)?;

    let summary = RunSummary {
        stats: ProductionStats::aggregate(&producer_reports, &consumer_reports),
        produced_counter: ctx.produced(),
        consumed_counter: ctx.consumed(),
        occupancy: ctx.occupancy(),
        elapsed: start.elapsed(),
    };
    info!(
        produced = summary.stats.produced_total,
        consumed = summary.stats.consumed_total,
        multiplied = summary.stats.multiplied_total,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "run finished"
    );
    Ok(summary)
}

fn spawn<T, F>(role: Role, index: usize, f: F) -> Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{role}-{index}"))
        .spawn(f)
        .map_err(|source| Error::Spawn {
            role,
            index,
            source,
        })
}

fn join_all<T>(role: Role, handles: Vec<JoinHandle<T>>) -> Result<Vec<T>> {
    handles
        .into_iter()
        .enumerate()
        .map(|(index, handle)| {
            handle
                .join()
                .map_err(|_| Error::WorkerPanicked { role, index })
        })
        .collect()
}
