//! Sliding history of the most recent input samples
//!
//! Keeps exactly `capacity` samples at all times (zero-primed), so analysis
//! can start with the first host block.

use ringbuf::{HeapRb, Rb};

/// Fixed-size sample history backed by an overwriting ring buffer
pub struct SampleHistory {
    ring: HeapRb<f64>,
    capacity: usize,

    /// Oldest-first copy of the ring, reused across calls
    linear: Vec<f64>,
}

impl SampleHistory {
    /// Create a zero-filled history
    ///
    /// # Arguments
    /// * `capacity` - Number of samples retained (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut ring = HeapRb::<f64>::new(capacity);
        for _ in 0..capacity {
            ring.push_overwrite(0.0);
        }

        Self {
            ring,
            capacity,
            linear: vec![0.0; capacity],
        }
    }

    /// Append samples, dropping the oldest ones
    pub fn push(&mut self, samples: &[f64]) {
        for &sample in samples {
            self.ring.push_overwrite(sample);
        }
    }

    /// All retained samples, oldest first
    pub fn contiguous(&mut self) -> &[f64] {
        for (dst, &src) in self.linear.iter_mut().zip(self.ring.iter()) {
            *dst = src;
        }
        &self.linear
    }

    /// The most recent `count` samples, oldest first
    pub fn latest(&mut self, count: usize) -> &[f64] {
        let start = self.capacity - count.min(self.capacity);
        &self.contiguous()[start..]
    }

    /// Change the capacity, keeping as many of the newest samples as fit
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity == self.capacity {
            return;
        }

        let mut resized = Self::new(capacity);
        resized.push(self.latest(capacity));
        *self = resized;
    }

    /// Reset every retained sample to zero
    pub fn clear(&mut self) {
        for _ in 0..self.capacity {
            self.ring.push_overwrite(0.0);
        }
    }

    /// Get history capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
