//! Constants for WaterGuard Core
//!
//! Centralised numeric values used by the sensor pipeline. Everything that
//! crosses the radio (identifiers, field widths) lives in [`service`];
//! everything that turns ADC codes into physical units lives in
//! [`conversion`]; scheduling defaults live in [`time`].
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Wire identities must never change once a peer application ships
//! 3. Use descriptive names that include units

/// Wire-level identities and declared value lengths.
pub mod service;

/// ADC scale factors and conductivity calibration curve.
pub mod conversion;

/// Sampling intervals, serial timing and capacities.
pub mod time;

pub use service::{SERVICE_UUID, MAX_VALUE_LEN, SLOT_COUNT};

pub use conversion::{ADC_FULL_SCALE, ADC_REFERENCE_MV, TEMP_SPAN_C};

pub use time::{DEFAULT_SAMPLE_INTERVAL_MS, PH_BAUD_RATE, MAX_PEERS, MESSAGE_QUEUE_CAPACITY};
