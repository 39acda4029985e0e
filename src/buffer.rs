//! Fixed-capacity ring of slots addressed by monotonic counters.
//!
//! The buffer does not track a head or a tail. The caller passes the number
//! of items inserted so far to [`BoundedBuffer::put`] and the number removed
//! so far to [`BoundedBuffer::get`], and the slot is that count modulo the
//! capacity:
//!
//! ```text
//!   capacity = 4
//!
//!   produced = 6 ──► slot 6 % 4 = 2
//!   consumed = 3 ──► slot 3 % 4 = 3
//!
//!          ┌─────┬─────┬─────┬─────┐
//!          │  4  │  5  │  -  │  3  │   item numbers currently stored
//!          └─────┴─────┴─────┴─────┘
//!             0     1     2     3
//! ```
//!
//! As long as `produced - consumed <= capacity`, the two index streams never
//! overlap on a live item. The buffer trusts its caller for that: it performs
//! no fullness or emptiness check of its own.

/// A ring of `capacity` optional slots.
#[derive(Debug)]
pub struct BoundedBuffer<T> {
    slots: Box<[Option<T>]>,
}

impl<T> BoundedBuffer<T> {
    /// Creates a buffer with `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "bounded buffer capacity must be positive");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot used by the item with sequence number `count`.
    #[inline]
    pub fn slot_index(&self, count: usize) -> usize {
        count % self.slots.len()
    }

    /// Stores `value` in the slot for the `producer_count`-th insertion and
    /// returns that slot's index.
    ///
    /// The caller must guarantee the slot is free.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pcmatrix::buffer::BoundedBuffer;
    ///
    /// let mut buffer = BoundedBuffer::new(2);
    /// assert_eq!(buffer.put("a", 0), 0);
    /// assert_eq!(buffer.put("b", 1), 1);
    /// assert_eq!(buffer.get(0), Some("a"));
    /// assert_eq!(buffer.put("c", 2), 0);
    /// ```
    pub fn put(&mut self, value: T, producer_count: usize) -> usize {
        let index = self.slot_index(producer_count);
        debug_assert!(
            self.slots[index].is_none(),
            "slot {index} overwritten before it was consumed"
        );
        self.slots[index] = Some(value);
        index
    }

    /// Moves the value out of the slot for the `consumer_count`-th removal.
    ///
    /// The slot is left empty. Returns `None` only if the caller's
    /// accounting is broken and the slot was never filled.
    pub fn get(&mut self, consumer_count: usize) -> Option<T> {
        let index = self.slot_index(consumer_count);
        self.slots[index].take()
    }

    /// Borrows the value the `consumer_count`-th removal would return.
    pub fn peek(&self, consumer_count: usize) -> Option<&T> {
        self.slots[self.slot_index(consumer_count)].as_ref()
    }

    /// Number of filled slots.
    #[cfg(test)]
    pub(crate) fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let buffer: BoundedBuffer<u32> = BoundedBuffer::new(3);
        assert_eq!(buffer.capacity(), 3);
        assert_eq!(buffer.occupied(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity() {
        let _ = BoundedBuffer::<u32>::new(0);
    }

    #[test]
    fn test_wrap_around() {
        let mut buffer = BoundedBuffer::new(3);
        let mut consumed = 0;
        for produced in 0..10usize {
            assert_eq!(buffer.put(produced, produced), produced % 3);
            if produced % 2 == 1 {
                // drain everything inserted so far
                while consumed <= produced {
                    assert_eq!(buffer.get(consumed), Some(consumed));
                    consumed += 1;
                }
            }
        }
        assert_eq!(buffer.occupied(), 0);
    }

    #[test]
    fn test_get_clears_slot() {
        let mut buffer = BoundedBuffer::new(1);
        buffer.put(7, 0);
        assert_eq!(buffer.occupied(), 1);
        assert_eq!(buffer.get(0), Some(7));
        assert_eq!(buffer.occupied(), 0);
        assert_eq!(buffer.get(0), None);
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut buffer = BoundedBuffer::new(2);
        buffer.put("x", 4);
        assert_eq!(buffer.peek(4), Some(&"x"));
        assert_eq!(buffer.peek(5), None);
        assert_eq!(buffer.occupied(), 1);
        assert_eq!(buffer.get(4), Some("x"));
    }

    #[test]
    fn test_fill_to_capacity() {
        let mut buffer = BoundedBuffer::new(4);
        for i in 0..4 {
            buffer.put(i, i);
        }
        assert_eq!(buffer.occupied(), 4);
        for i in 0..4 {
            assert_eq!(buffer.get(i), Some(i));
        }
        assert_eq!(buffer.occupied(), 0);
    }
}
