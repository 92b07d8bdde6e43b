//! Sensor pipeline and notification engine for WaterGuard nodes
//!
//! Turns raw sensor-controller samples into fixed-width characteristic
//! values and pushes them to subscribed peers over the radio.
//! Designed for the node itself, not just the host.
//!
//! Key constraints:
//! - Runs in a few KB of RAM with no heap
//! - Every value keeps its declared wire length
//! - A failed sample or delivery costs one slot one cycle, never more
//!
//! ```no_run
//! use waterguard_core::{Message, MessageQueue, Registry, SampleCycleController, ServiceConfig};
//! # use waterguard_core::{
//! #     Acquisition, AcquisitionError, PeerId, RawSample, SensorSlot, Transport, TransportError,
//! # };
//! # struct Board;
//! # impl Acquisition for Board {
//! #     fn read_raw(&mut self, _: SensorSlot) -> Result<RawSample, AcquisitionError> {
//! #         Err(AcquisitionError::NoData)
//! #     }
//! # }
//! # struct Radio;
//! # impl Transport for Radio {
//! #     fn notify(&mut self, _: PeerId, _: SensorSlot, _: &[u8]) -> Result<(), TransportError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! static REGISTRY: Registry = Registry::new();
//! static QUEUE: MessageQueue<Message, 16> = MessageQueue::new();
//!
//! let mut controller =
//!     SampleCycleController::new(&REGISTRY, Board, Radio, ServiceConfig::default())?;
//!
//! // Interrupt handlers push messages; the main loop handles them
//! loop {
//!     if let Err(err) = nb::block!(controller.poll(&QUEUE)) {
//!         // Rejected connect or config write; the node keeps running
//!         let _ = err;
//!     }
//! }
//! # Ok::<(), waterguard_core::ServiceError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod controller;
pub mod convert;
pub mod dispatch;
pub mod errors;
pub mod format;
pub mod gatt;
pub mod peer;
pub mod ports;
pub mod queue;
pub mod registry;
pub mod slot;
pub mod time;

// Public API
pub use config::{OverflowPolicy, ServiceConfig};
pub use controller::{
    CycleReport, CycleState, CycleStats, Message, PollOutcome, SampleCycleController, SlotOutcome,
};
pub use dispatch::{DispatchReport, NotificationDispatcher};
pub use errors::{AcquisitionError, ServiceError, ServiceResult, TransportError};
pub use gatt::Attribute;
pub use peer::{PeerId, SubscriptionFlags};
pub use ports::{Acquisition, RawSample, TimeSource, Transport};
pub use queue::MessageQueue;
pub use registry::Registry;
pub use slot::{SensorSlot, SlotValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
