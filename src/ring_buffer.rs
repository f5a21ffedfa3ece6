//! Per-player input ring buffer.
//!
//! A fixed-capacity array of input bitmasks indexed by `current_frame -
//! frame`: index 0 is the newest. Entries past the last confirmed-received
//! index are predictions, repeating the most recently known input.

use crate::components::PlayerInput;
use crate::constants::RING_BUFFER_CAPACITY;
use crate::error::{fatal, RollbackError};

#[derive(Debug, Clone)]
pub struct InputRingBuffer {
    entries: [PlayerInput; RING_BUFFER_CAPACITY],
}

impl Default for InputRingBuffer {
    fn default() -> Self {
        Self {
            entries: [0; RING_BUFFER_CAPACITY],
        }
    }
}

impl InputRingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Reads the entry `index` frames back from the newest. Panics (via
    /// [`RollbackError::FrameTooOld`]) if `index` is outside the buffer.
    /// Reading an input older than the ring buffer is a programmer error.
    pub fn get(&self, index: usize) -> PlayerInput {
        if index >= self.entries.len() {
            fatal(RollbackError::FrameTooOld {
                requested: index as u32,
                capacity: self.entries.len(),
            });
        }
        self.entries[index]
    }

    pub fn set(&mut self, index: usize, value: PlayerInput) {
        self.entries[index] = value;
    }

    /// Backfills indices `0..delta` with `value`, replacing predictions
    /// that had been derived from a stale predecessor.
    pub fn backfill(&mut self, delta: usize, value: PlayerInput) {
        let delta = delta.min(self.entries.len());
        for slot in self.entries[..delta].iter_mut() {
            *slot = value;
        }
    }

    /// Shifts the buffer right by `delta` (index k <- index k-delta for k
    /// >= delta), then fills the newly opened indices `0..delta` by
    /// repeating the most recent known input, i.e. extrapolated predictions
    /// for the frames that just became "current".
    pub fn shift_right_by(&mut self, delta: usize) {
        if delta == 0 {
            return;
        }
        let cap = self.entries.len();
        let most_recent = self.entries[0];
        if delta < cap {
            for k in (delta..cap).rev() {
                self.entries[k] = self.entries[k - delta];
            }
        }
        for slot in self.entries[..delta.min(cap)].iter_mut() {
            *slot = most_recent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_preserves_history_and_repeats_newest_as_prediction() {
        let mut buf = InputRingBuffer::new();
        buf.set(0, 7);
        buf.set(1, 3);
        buf.shift_right_by(2);
        assert_eq!(buf.get(2), 7); // old index 0 moved to index 2
        assert_eq!(buf.get(3), 3); // old index 1 moved to index 3
        assert_eq!(buf.get(0), 7); // new slots predict the most recent input
        assert_eq!(buf.get(1), 7);
    }

    #[test]
    fn backfill_overwrites_predictions() {
        let mut buf = InputRingBuffer::new();
        buf.shift_right_by(5); // all predictions of 0
        buf.backfill(5, 9);
        for i in 0..5 {
            assert_eq!(buf.get(i), 9);
        }
    }

    #[test]
    #[should_panic]
    fn reading_past_capacity_panics() {
        let buf = InputRingBuffer::new();
        buf.get(RING_BUFFER_CAPACITY);
    }
}
