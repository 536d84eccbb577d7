//! Bounded sample buffer shared between an acquisition thread and the reader.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Mutex-guarded FIFO with a fixed capacity.
///
/// [`push`](Self::push) evicts the oldest sample when full and counts the
/// eviction; [`try_push`](Self::try_push) refuses instead, which lets a
/// producer that can wait apply back-pressure.
#[derive(Debug)]
pub struct SampleQueue {
    samples: Mutex<VecDeque<f64>>,
    capacity: usize,
    dropped: AtomicU64,
}

impl SampleQueue {
    /// Capacity is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity.min(1 << 16))),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append, evicting the oldest sample if full. Returns `true` if a sample
    /// was evicted.
    pub fn push(&self, value: f64) -> bool {
        let mut samples = self.samples.lock();
        let evicted = if samples.len() >= self.capacity {
            samples.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        };
        samples.push_back(value);
        evicted
    }

    /// Append only if there is room.
    pub fn try_push(&self, value: f64) -> bool {
        let mut samples = self.samples.lock();
        if samples.len() >= self.capacity {
            return false;
        }
        samples.push_back(value);
        true
    }

    /// Append as many of `values` as fit; returns how many were taken.
    pub fn try_extend(&self, values: &[f64]) -> usize {
        let mut samples = self.samples.lock();
        let room = self.capacity.saturating_sub(samples.len());
        let taken = room.min(values.len());
        samples.extend(&values[..taken]);
        taken
    }

    /// Take everything currently buffered. Never blocks on producers.
    pub fn drain(&self) -> Vec<f64> {
        self.samples.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    /// Samples evicted by [`push`](Self::push) since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_push_evicts_oldest() {
        let queue = SampleQueue::new(3);
        for v in [1.0, 2.0, 3.0] {
            assert!(!queue.push(v));
        }
        assert!(queue.push(4.0));
        assert_eq!(queue.drain(), vec![2.0, 3.0, 4.0]);
        assert_eq!(queue.dropped(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_try_push_refuses_when_full() {
        let queue = SampleQueue::new(2);
        assert!(queue.try_push(1.0));
        assert!(queue.try_push(2.0));
        assert!(!queue.try_push(3.0));
        assert_eq!(queue.dropped(), 0);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_try_extend_partial() {
        let queue = SampleQueue::new(4);
        queue.push(0.0);
        assert_eq!(queue.try_extend(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert_eq!(queue.drain(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let queue = SampleQueue::new(0);
        assert_eq!(queue.capacity(), 1);
        assert!(queue.try_push(1.0));
    }

    #[test]
    fn test_concurrent_producer() {
        let queue = Arc::new(SampleQueue::new(10_000));
        let producer = {
            let queue = queue.clone();
            std::thread::spawn(move || {
                for i in 0..1000 {
                    queue.push(i as f64);
                }
            })
        };
        let mut received = Vec::new();
        while received.len() < 1000 {
            received.extend(queue.drain());
            std::thread::yield_now();
        }
        producer.join().unwrap();
        assert_eq!(received, (0..1000).map(|i| i as f64).collect::<Vec<_>>());
    }
}
