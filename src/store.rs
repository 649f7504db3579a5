// Bounded in-memory sample buffer. Oldest samples are evicted first once capacity is reached.

use std::collections::VecDeque;

use crate::models::Sample;

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Append-only FIFO of samples, never longer than `capacity`.
/// Callers append in timestamp order; the store does not sort.
#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SampleStore {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Samples with `start_ms <= timestamp <= end_ms`, in insertion order. Empty when start > end.
    pub fn range(&self, start_ms: u64, end_ms: u64) -> impl Iterator<Item = &Sample> + '_ {
        self.samples
            .iter()
            .filter(move |s| start_ms <= s.timestamp && s.timestamp <= end_ms)
    }

    /// The last `min(n, len)` samples, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rough size of the buffered data: fixed bytes per sample, not allocator-exact.
    pub fn estimated_memory_footprint(&self) -> usize {
        self.samples.len() * std::mem::size_of::<Sample>()
    }
}
