//! Time and tick generation
//!
//! The sample cycle is driven by an external tick. On the node that tick is
//! the sensor controller's RTC alert; on a host, [`Interval`] turns any
//! [`TimeSource`] into the same "cycle due" signal.

/// Timestamp in milliseconds since device boot (or epoch for wall clocks)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

impl<S: TimeSource + ?Sized> TimeSource for &S {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually advanced time source for testing and simulation
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: core::cell::Cell<Timestamp>,
}

impl FixedTime {
    /// Start at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: core::cell::Cell::new(timestamp),
        }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

/// Periodic tick derived from a time source
///
/// Fires at most once per call; if several periods were missed only one
/// tick is reported and the schedule restarts from `now`, so a stalled
/// loop never produces a burst of back-to-back cycles.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: u64,
    next_due: Timestamp,
}

impl Interval {
    /// First tick due one period after `start`
    pub const fn new(period_ms: u64, start: Timestamp) -> Self {
        Self {
            period_ms,
            next_due: start + period_ms,
        }
    }

    /// Period in milliseconds
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// When the next tick is due
    pub const fn next_due(&self) -> Timestamp {
        self.next_due
    }

    /// Report whether a tick is due at `now`, consuming it
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if now < self.next_due {
            return false;
        }

        let late_by = now - self.next_due;
        self.next_due = if late_by >= self.period_ms {
            now + self.period_ms
        } else {
            self.next_due + self.period_ms
        };
        true
    }

    /// Poll against a time source
    pub fn poll_source<S: TimeSource>(&mut self, source: &S) -> bool {
        self.poll(source.now())
    }
}
