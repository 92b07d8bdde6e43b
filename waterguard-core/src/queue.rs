//! Bounded Message Queue Between Interrupt Context and the Main Loop
//!
//! ## Overview
//!
//! Hardware callbacks (sensor controller alert, link-layer connect and
//! disconnect) must not run the sample cycle themselves. They push a small
//! `Copy` message and return; the main loop pops messages and does the
//! work:
//!
//! ```text
//! Sensor controller ISR ─┐
//!                        ├──→ MessageQueue<Message, N> ──→ controller.poll()
//! Radio stack callbacks ─┘        (bounded, lock-free)
//! ```
//!
//! ## Properties
//!
//! - **Multiple producers, single consumer**: built on
//!   `heapless::mpmc::MpMcQueue`, so pushes from several interrupt
//!   sources never need a lock.
//! - **Fixed size**: `N` must be a power of two; nothing is allocated.
//! - **Never blocks**: a full queue drops the message and counts it.
//!
//! ## Example Usage
//!
//! ```rust
//! use waterguard_core::queue::MessageQueue;
//! use waterguard_core::Message;
//!
//! static QUEUE: MessageQueue<Message, 16> = MessageQueue::new();
//!
//! // Producer (interrupt handler)
//! fn sensor_alert_isr(now: u64) {
//!     if !QUEUE.push(Message::SensorAlert { timestamp: now }) {
//!         // Overflow: the cycle already pending will refresh every slot
//!     }
//! }
//!
//! sensor_alert_isr(1000);
//! assert_eq!(QUEUE.len(), 1);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::mpmc::MpMcQueue;

/// Queue capacity must be power of 2
const _: () = assert!(
    crate::constants::MESSAGE_QUEUE_CAPACITY.is_power_of_two(),
    "Queue capacity must be power of 2"
);

/// Bounded multi-producer message queue
pub struct MessageQueue<T, const N: usize> {
    inner: MpMcQueue<T, N>,
    stats: QueueStats,
}

/// Queue statistics
///
/// Track queue health without impacting performance
pub struct QueueStats {
    /// Total messages pushed
    pub pushed: AtomicU32,
    /// Total messages popped
    pub popped: AtomicU32,
    /// Messages dropped due to full queue
    pub dropped: AtomicU32,
    /// Maximum queue depth seen
    pub max_depth: AtomicU32,
}

impl QueueStats {
    const fn new() -> Self {
        Self {
            pushed: AtomicU32::new(0),
            popped: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            max_depth: AtomicU32::new(0),
        }
    }

    /// Update max depth if current is higher
    fn update_max_depth(&self, current: u32) {
        let mut max = self.max_depth.load(Ordering::Relaxed);
        while current > max {
            match self.max_depth.compare_exchange_weak(
                max,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => max = actual,
            }
        }
    }
}

impl<T, const N: usize> Default for MessageQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> MessageQueue<T, N> {
    /// Create new empty queue
    ///
    /// Can be used in static context
    pub const fn new() -> Self {
        Self {
            inner: MpMcQueue::new(),
            stats: QueueStats::new(),
        }
    }

    /// Push a message; returns false if the queue is full
    pub fn push(&self, message: T) -> bool {
        if self.inner.enqueue(message).is_err() {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.stats.pushed.fetch_add(1, Ordering::Relaxed);
        self.stats.update_max_depth(self.len() as u32);
        true
    }

    /// Pop the oldest message; `None` if the queue is empty
    pub fn pop(&self) -> Option<T> {
        let message = self.inner.dequeue()?;
        self.stats.popped.fetch_add(1, Ordering::Relaxed);
        Some(message)
    }

    /// Approximate number of queued messages
    pub fn len(&self) -> usize {
        let pushed = self.stats.pushed.load(Ordering::Acquire);
        let popped = self.stats.popped.load(Ordering::Acquire);
        pushed.saturating_sub(popped) as usize
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get queue statistics
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// Drain all messages from queue
    pub fn drain(&self) -> QueueDrain<'_, T, N> {
        QueueDrain { queue: self }
    }
}

/// Queue iterator for draining all messages
pub struct QueueDrain<'a, T, const N: usize> {
    queue: &'a MessageQueue<T, N>,
}

impl<'a, T, const N: usize> Iterator for QueueDrain<'a, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_basic() {
        let queue = MessageQueue::<u32, 4>::new();

        assert!(queue.push(7));
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.pop(), Some(7));
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn queue_full() {
        let queue = MessageQueue::<u32, 4>::new();

        for i in 0..4 {
            assert!(queue.push(i));
        }

        assert!(!queue.push(99));
        assert_eq!(queue.stats().dropped.load(Ordering::Relaxed), 1);
        assert_eq!(queue.stats().max_depth.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn queue_drain_in_order() {
        let queue = MessageQueue::<u32, 8>::new();

        for i in 0..5 {
            queue.push(i);
        }

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn producers_on_other_threads() {
        use std::sync::Arc;

        let queue = Arc::new(MessageQueue::<u32, 16>::new());
        let handles: Vec<_> = (0..2)
            .map(|t| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..4 {
                        assert!(queue.push(t * 10 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut drained: Vec<_> = queue.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![0, 1, 2, 3, 10, 11, 12, 13]);
    }
}
