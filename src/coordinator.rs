//! The producer/consumer protocol around the shared bounded buffer.
//!
//! A single [`CoordinationContext`] is shared, through an `Arc`, by every
//! producer and consumer thread of a run. It owns:
//!
//! - one mutex guarding the [`BoundedBuffer`] of matrices,
//! - two condition variables, `not_full` (producers wait on it) and
//!   `not_empty` (consumers wait on it),
//! - three [`SynchronizedCounter`]s: produced, consumed and occupancy.
//!
//! # Invariants
//!
//! The counters and the slots only change while the buffer mutex is held, and
//! the slot index of every `put`/`get` is computed from a counter read inside
//! that same critical section. Hence, whenever the mutex is free:
//!
//! ```text
//!   occupancy == produced - consumed == filled slots    0 <= occupancy <= capacity
//! ```
//!
//! Every insertion signals `not_empty` and every removal signals `not_full`
//! before the mutex is released.
//!
//! # Consumer acquisition
//!
//! A consumer takes one matrix `A`, then looks at the next one. If the next
//! matrix `B` can be multiplied with `A` (`A.columns == B.rows`) it is taken in
//! the same critical section. Otherwise the behaviour depends on the
//! [`PairingPolicy`]:
//!
//! ```text
//!                 ┌──────────── lock ─────────────┐
//!   wait not_empty│ take A ─ signal not_full       │
//!                 │ wait not_empty (unless done)   │
//!                 │ peek B ─┬─ compatible ─► take B│──► multiply outside the lock
//!                 │         └─ incompatible:       │
//!                 │            Adjacent ─► stop    │──► drop A unpaired
//!                 │            Search   ─► take B, │
//!                 │                       drop it, │
//!                 │                       retry    │
//!                 └────────────────────────────────┘
//! ```
//!
//! # Termination
//!
//! Consumers run until the aggregate consumed count reaches the target the
//! context was created with. The consumer performing the last removal wakes
//! every other consumer, so none of them stays parked on `not_empty` after the
//! final item is gone.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, trace};

use crate::buffer::BoundedBuffer;
use crate::counter::SynchronizedCounter;
use crate::matrix::{Matrix, MatrixProvider};
use crate::stats::{ConsumerReport, ProducerReport};

/// What a consumer does when the matrix after `A` cannot be multiplied with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PairingPolicy {
    /// Give up on `A`; the incompatible matrix stays in the buffer.
    #[default]
    Adjacent,
    /// Remove and discard incompatible matrices until a compatible one shows
    /// up or consumption is finished.
    Search,
}

/// One entry of the interleaving journal.
///
/// `seq` is the value of the produced (for `Put`) or consumed (for `Take`)
/// counter the slot index was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Put { slot: usize, seq: usize },
    Take { slot: usize, seq: usize },
}

/// The matrices one consumer acquisition removed from the buffer.
#[derive(Debug)]
pub struct Acquired {
    /// The first matrix taken.
    pub first: Matrix,
    /// A matrix compatible with `first`, if one was found.
    pub second: Option<Matrix>,
    /// Incompatible matrices removed while searching for `second`.
    /// Always empty under [`PairingPolicy::Adjacent`].
    pub discarded: Vec<Matrix>,
}

impl Acquired {
    /// Number of matrices this acquisition removed from the buffer.
    pub fn removed(&self) -> usize {
        1 + usize::from(self.second.is_some()) + self.discarded.len()
    }
}

/// State guarded by the buffer mutex.
#[derive(Debug)]
struct Slots {
    buffer: BoundedBuffer<Matrix>,
    journal: Option<Vec<Event>>,
}

impl Slots {
    #[inline]
    fn record(&mut self, event: Event) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(event);
        }
    }
}

/// Shared state of one producer/consumer run.
///
/// # Examples
///
/// ```rust
/// use pcmatrix::coordinator::CoordinationContext;
/// use pcmatrix::matrix::{GenerationMode, RandomProvider};
/// use std::sync::Arc;
/// use std::thread;
///
/// let ctx = Arc::new(CoordinationContext::new(4, 50));
///
/// let producer = {
///     let ctx = Arc::clone(&ctx);
///     thread::spawn(move || ctx.produce(&RandomProvider::new(GenerationMode::Random), 50))
/// };
/// let consumer = {
///     let ctx = Arc::clone(&ctx);
///     thread::spawn(move || ctx.consume())
/// };
///
/// let produced = producer.join().unwrap();
/// let consumed = consumer.join().unwrap();
///
/// assert_eq!(produced.produced, 50);
/// assert_eq!(consumed.consumed, 50);
/// assert_eq!(ctx.occupancy(), 0);
/// ```
#[derive(Debug)]
pub struct CoordinationContext {
    state: Mutex<Slots>,
    not_full: Condvar,
    not_empty: Condvar,
    produced: SynchronizedCounter,
    consumed: SynchronizedCounter,
    occupancy: SynchronizedCounter,
    capacity: usize,
    target: usize,
    policy: PairingPolicy,
}

impl CoordinationContext {
    /// Creates a context with a buffer of `capacity` slots whose consumers
    /// stop once `target` matrices have been consumed in total.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, target: usize) -> Self {
        Self {
            state: Mutex::new(Slots {
                buffer: BoundedBuffer::new(capacity),
                journal: None,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            produced: SynchronizedCounter::new().with_name("produced"),
            consumed: SynchronizedCounter::new().with_name("consumed"),
            occupancy: SynchronizedCounter::new().with_name("occupancy"),
            capacity,
            target,
            policy: PairingPolicy::default(),
        }
    }

    /// Sets the pairing policy used by [`acquire`](Self::acquire).
    pub fn with_policy(mut self, policy: PairingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Records every put and take in an in-memory journal.
    pub fn with_journal(mut self) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .journal = Some(Vec::new());
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of matrices the consumers wait for.
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    /// Matrices inserted so far, across all producers.
    pub fn produced(&self) -> usize {
        self.produced.get()
    }

    /// Matrices removed so far, across all consumers.
    pub fn consumed(&self) -> usize {
        self.consumed.get()
    }

    /// Matrices currently in the buffer.
    pub fn occupancy(&self) -> usize {
        self.occupancy.get()
    }

    /// `true` once the consumed count reached the target.
    pub fn is_finished(&self) -> bool {
        self.consumed.get() >= self.target
    }

    /// Copy of the interleaving journal, or `None` if it was not enabled.
    pub fn journal(&self) -> Option<Vec<Event>> {
        self.lock().journal.clone()
    }

    /// Inserts `matrix`, blocking while the buffer is full.
    ///
    /// Returns the slot the matrix was stored in. Callers must not insert
    /// more than [`target`](Self::target) matrices in total: once consumers
    /// have finished nobody drains the buffer anymore.
    pub fn insert(&self, matrix: Matrix) -> usize {
        let mut slots = self.lock();
        while self.occupancy.get() == self.capacity {
            slots = self
                .not_full
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let seq = self.produced.get();
        let slot = slots.buffer.put(matrix, seq);
        self.occupancy.increment();
        self.produced.increment();
        slots.record(Event::Put { slot, seq });
        trace!(slot, seq, "put");

        self.not_empty.notify_one();
        slot
    }

    /// Removes the next matrix, plus a compatible partner when the pairing
    /// policy finds one.
    ///
    /// Blocks while the buffer is empty and consumption is not finished.
    /// Returns `None` once the target has been reached.
    pub fn acquire(&self) -> Option<Acquired> {
        let mut slots = self.lock();
        while self.occupancy.get() == 0 && !self.is_finished() {
            slots = self.wait_not_empty(slots);
        }
        if self.occupancy.get() == 0 {
            return None;
        }

        let first = self.take(&mut slots)?;
        let mut discarded = Vec::new();

        let second = loop {
            while self.occupancy.get() == 0 && !self.is_finished() {
                slots = self.wait_not_empty(slots);
            }
            if self.occupancy.get() == 0 {
                break None;
            }

            let seq = self.consumed.get();
            let compatible = slots
                .buffer
                .peek(seq)
                .is_some_and(|candidate| first.can_multiply(candidate));
            if compatible {
                break self.take(&mut slots);
            }

            match self.policy {
                PairingPolicy::Adjacent => break None,
                PairingPolicy::Search => match self.take(&mut slots) {
                    Some(candidate) => discarded.push(candidate),
                    None => break None,
                },
            }
        };

        Some(Acquired {
            first,
            second,
            discarded,
        })
    }

    /// Producer loop: generates and inserts `count` matrices.
    pub fn produce(&self, provider: &dyn MatrixProvider, count: usize) -> ProducerReport {
        let mut report = ProducerReport::default();
        for _ in 0..count {
            let matrix = provider.generate();
            trace!(
                rows = matrix.rows(),
                cols = matrix.columns(),
                "produced matrix\n{matrix}"
            );
            report.element_sum += matrix.element_sum();
            self.insert(matrix);
            report.produced += 1;
        }
        debug!(produced = report.produced, "producer done");
        report
    }

    /// Consumer loop: acquires until the target is reached, multiplying every
    /// compatible pair.
    pub fn consume(&self) -> ConsumerReport {
        let mut report = ConsumerReport::default();
        while let Some(acquired) = self.acquire() {
            report.consumed += acquired.removed();
            let Acquired {
                first,
                second,
                discarded,
            } = acquired;

            report.element_sum += first.element_sum();
            for matrix in &discarded {
                report.element_sum += matrix.element_sum();
            }

            let Some(second) = second else {
                debug!(
                    rows = first.rows(),
                    cols = first.columns(),
                    discarded = discarded.len(),
                    "no compatible partner, dropping matrix"
                );
                continue;
            };
            report.element_sum += second.element_sum();

            match first.multiply(&second) {
                Ok(product) => {
                    trace!("multiplied\n{first}x\n{second}=\n{product}");
                    report.multiplied += 1;
                    report.product_sum += product.element_sum();
                }
                Err(err) => error!(%err, "acquired pair cannot be multiplied"),
            }
        }
        debug!(
            consumed = report.consumed,
            multiplied = report.multiplied,
            "consumer done"
        );
        report
    }

    /// Removes the matrix at the current consumed index.
    ///
    /// Must be called with the buffer lock held (`slots` is its guard's
    /// target) and with `occupancy > 0`.
    fn take(&self, slots: &mut Slots) -> Option<Matrix> {
        let seq = self.consumed.get();
        let slot = slots.buffer.slot_index(seq);
        let Some(matrix) = slots.buffer.get(seq) else {
            error!(slot, seq, occupancy = self.occupancy.get(), "empty slot at consumer index");
            return None;
        };

        self.occupancy.decrement();
        self.consumed.increment();
        slots.record(Event::Take { slot, seq });
        trace!(slot, seq, "take");

        self.not_full.notify_one();
        if self.is_finished() {
            self.not_empty.notify_all();
        }
        Some(matrix)
    }

    fn wait_not_empty<'a>(&self, slots: MutexGuard<'a, Slots>) -> MutexGuard<'a, Slots> {
        self.not_empty
            .wait(slots)
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
