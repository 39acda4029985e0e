//! # pcmatrix - Bounded-Buffer Matrix Producer/Consumer Engine
//!
//! Producer threads generate randomly sized integer matrices and push them
//! into a shared, fixed-capacity ring buffer. Consumer threads pull matrices
//! back out and try to pair each one with the next matrix in the buffer so the
//! two can be multiplied.
//!
//! ## The Protocol
//!
//! All shared state lives in one [`CoordinationContext`](coordinator::CoordinationContext):
//!
//! ```text
//!   ┌──────────┐  insert   ┌───────────────────────────────┐  acquire  ┌──────────┐
//!   │producer 0│ ────────► │  Mutex ─┬─ BoundedBuffer       │ ────────► │consumer 0│
//!   │producer 1│  wait     │         └─ journal (optional)  │  wait     │consumer 1│
//!   │   ...    │  not_full │  Condvar not_full / not_empty  │ not_empty │   ...    │
//!   └──────────┘           │  produced / consumed /         │           └──────────┘
//!                          │  occupancy counters            │
//!                          └───────────────────────────────┘
//! ```
//!
//! 1. **One lock, two condition variables**: producers wait on `not_full`
//!    while the buffer holds `capacity` matrices; consumers wait on
//!    `not_empty` while it holds none.
//!
//! 2. **Counter-derived indices**: the slot of an insertion is
//!    `produced % capacity`, the slot of a removal `consumed % capacity`,
//!    both read inside the critical section that touches the slot.
//!
//! 3. **Best-effort pairing**: after taking a matrix `A`, a consumer waits
//!    for one more matrix unless consumption is already finished. If that
//!    matrix has as many rows as `A` has columns it is taken too and the pair
//!    is multiplied outside the lock; otherwise `A` is dropped (or, with
//!    [`PairingPolicy::Search`](coordinator::PairingPolicy::Search), the
//!    incompatible matrix is dropped and the search continues).
//!
//! 4. **Aggregate termination**: consumers stop when the total consumed
//!    count reaches `workers × matrix_count`; the consumer that takes the
//!    last matrix wakes all the others.
//!
//! ## Quick Start
//!
//! ```rust
//! use pcmatrix::config::Config;
//!
//! // 2 producer/consumer pairs, 8 slots, 100 matrices per producer, random sizes
//! let config = Config::new(2, 8, 100, 0).unwrap();
//! let summary = pcmatrix::run::run(&config).unwrap();
//!
//! assert_eq!(summary.stats.produced_total, 200);
//! assert_eq!(summary.stats.consumed_total, 200);
//! assert_eq!(summary.stats.produced_element_sum, summary.stats.consumed_element_sum);
//! println!("{}", pcmatrix::report::render_text(&summary));
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`counter`] | [`SynchronizedCounter`](counter::SynchronizedCounter), a mutex-guarded integer |
//! | [`buffer`] | [`BoundedBuffer`](buffer::BoundedBuffer), the counter-indexed ring |
//! | [`coordinator`] | The condvar protocol and the consumer pairing loop |
//! | [`matrix`] | Matrix values and providers |
//! | [`stats`] | Per-thread reports and run totals |
//! | [`config`] | Validated run configuration |
//! | [`run`] | Thread spawning, joining and aggregation |
//! | [`report`] | Text, table (`table` feature) and JSON (`json` feature) output |
//!
//! ## Logging
//!
//! The library emits [`tracing`] events: `info` at run start and end,
//! `debug` per worker completion and per unpaired matrix, `trace` per
//! buffer operation (with the matrices themselves printed). Install a
//! subscriber to see them; the `pcmatrix` binary does so for `-v`, `-vv`
//! and `-vvv`.

pub mod buffer;
pub mod config;
pub mod coordinator;
pub mod counter;
pub mod error;
pub mod matrix;
pub mod report;
pub mod run;
pub mod stats;

pub use error::{Error, Result};
