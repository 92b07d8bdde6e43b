//! Time-Related Constants
//!
//! Sampling intervals, serial-line timing and the fixed capacities that
//! bound memory on the node.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== SAMPLING INTERVALS =====

/// Default sensor sampling interval (milliseconds).
///
/// The sensor controller's RTC alerts once per second.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

/// Sampling interval for quick commissioning checks (milliseconds).
pub const HIGH_FREQ_SAMPLE_INTERVAL_MS: u64 = 250;

/// Sampling interval for battery-only deployments (milliseconds).
pub const LOW_POWER_SAMPLE_INTERVAL_MS: u64 = 60 * MS_PER_SECOND;

// ===== pH SERIAL LINE =====

/// Baud rate of the pH probe's serial output.
pub const PH_BAUD_RATE: u32 = 9600;

/// Bound on one blocking pH line read (milliseconds).
pub const PH_READ_TIMEOUT_MS: u32 = 500;

// ===== CAPACITIES =====

/// Simultaneous peer connections tracked by the subscription table.
pub const MAX_PEERS: usize = 4;

/// Capacity of the controller's inbound message queue (power of two).
pub const MESSAGE_QUEUE_CAPACITY: usize = 16;
