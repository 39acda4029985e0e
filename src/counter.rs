//! Mutex-guarded integer counter.
//!
//! [`SynchronizedCounter`] is the progress counter used by the coordinator for
//! the number of matrices produced, the number consumed, and the number
//! currently sitting in the buffer. Every operation takes the counter's own
//! lock, so reads from a monitoring thread always observe a value that some
//! writer actually stored.
//!
//! The coordinator only mutates its counters while it also holds the buffer
//! lock, which is what ties `produced - consumed` to the buffer occupancy.
//! The counter itself knows nothing about that protocol.
//!
//! ```text
//!   producer ──increment──►  ┌──────────────────────────┐
//!                            │ CachePadded<Mutex<usize>>│ ◄──get── monitor
//!   consumer ──decrement──►  └──────────────────────────┘
//! ```

use std::fmt::{Debug, Display};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_utils::CachePadded;

/// An integer counter protected by a mutex.
///
/// The value is padded to its own cache line so that the produced, consumed
/// and occupancy counters of one coordinator do not invalidate each other.
///
/// # Examples
///
/// ```rust
/// use pcmatrix::counter::SynchronizedCounter;
///
/// let counter = SynchronizedCounter::new().with_name("produced");
/// counter.increment();
/// counter.increment();
/// counter.decrement();
/// assert_eq!(counter.get(), 1);
/// assert_eq!(counter.to_string(), "produced:1");
/// ```
///
/// Shared between threads:
///
/// ```rust
/// use pcmatrix::counter::SynchronizedCounter;
/// use std::sync::Arc;
/// use std::thread;
///
/// let counter = Arc::new(SynchronizedCounter::new());
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let c = Arc::clone(&counter);
///         thread::spawn(move || {
///             for _ in 0..1000 {
///                 c.increment();
///             }
///         })
///     })
///     .collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(counter.get(), 4000);
/// ```
pub struct SynchronizedCounter {
    name: &'static str,
    value: CachePadded<Mutex<usize>>,
}

impl SynchronizedCounter {
    /// Creates a counter initialized to zero, with no name.
    pub const fn new() -> Self {
        SynchronizedCounter {
            name: "",
            value: CachePadded::new(Mutex::new(0)),
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Returns the name of this counter, or an empty string if unnamed.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Adds one to the counter.
    #[inline]
    pub fn increment(&self) {
        *self.guard() += 1;
    }

    /// Subtracts one from the counter.
    ///
    /// Saturates at zero. Debug builds treat a decrement below zero as a
    /// broken caller invariant and panic.
    #[inline]
    pub fn decrement(&self) {
        let mut value = self.guard();
        debug_assert!(*value > 0, "counter {:?} decremented below zero", self.name);
        *value = value.saturating_sub(1);
    }

    /// Returns a copy of the current value.
    #[inline]
    pub fn get(&self) -> usize {
        *self.guard()
    }

    /// Locks the value.
    ///
    /// Only the underflow assertion can panic while this guard is held, and
    /// it does so before writing, so a poisoned lock still protects a
    /// consistent integer and is recovered.
    fn guard(&self) -> MutexGuard<'_, usize> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SynchronizedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SynchronizedCounter {
    /// Formats the counter as `name:value` if named, or just `value` otherwise.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.get())
        } else {
            write!(f, "{}:{}", self.name, self.get())
        }
    }
}

impl Debug for SynchronizedCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{ {} }}", self.name, self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let counter = SynchronizedCounter::new();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.name(), "");
    }

    #[test]
    fn test_increment() {
        let counter = SynchronizedCounter::new();
        counter.increment();
        assert_eq!(counter.get(), 1);
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_decrement() {
        let counter = SynchronizedCounter::new();
        for _ in 0..10 {
            counter.increment();
        }
        counter.decrement();
        assert_eq!(counter.get(), 9);
        counter.decrement();
        counter.decrement();
        assert_eq!(counter.get(), 7);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_decrement_saturates() {
        let counter = SynchronizedCounter::new();
        counter.decrement();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "decremented below zero")]
    fn test_decrement_below_zero_panics_in_debug() {
        let counter = SynchronizedCounter::new().with_name("occupancy");
        counter.decrement();
    }

    #[test]
    fn test_with_name_and_display() {
        let counter = SynchronizedCounter::new().with_name("consumed");
        counter.increment();
        assert_eq!(counter.name(), "consumed");
        assert_eq!(format!("{}", counter), "consumed:1");

        let unnamed = SynchronizedCounter::default();
        assert_eq!(format!("{}", unnamed), "0");
    }

    #[test]
    fn test_debug() {
        let counter = SynchronizedCounter::new().with_name("produced");
        counter.increment();
        counter.increment();
        assert_eq!(format!("{:?}", counter), "produced{ 2 }");
    }

    #[test]
    fn test_multiple_threads() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(SynchronizedCounter::new());
        let mut handles = vec![];

        for i in 0..8 {
            let counter_clone = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    counter_clone.increment();
                    if i % 2 == 1 {
                        counter_clone.decrement();
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // Odd threads net zero; even threads add 500 each.
        assert_eq!(counter.get(), 2000);
    }
}
