//! Error Types for the Sensor Pipeline and Attribute Server
//!
//! ## Design Philosophy
//!
//! Errors are returned from the sample cycle and from peer request
//! handlers, both of which run on a node with a few kilobytes of RAM:
//!
//! 1. **No Heap Allocation**: every variant carries inline data only.
//! 2. **Copy Semantics**: errors are cheap to return, store in a cycle
//!    report and forward to a peer.
//! 3. **Peer-Visible Codes**: any error that answers a peer request maps
//!    to a Bluetooth ATT error code through [`ServiceError::att_code`].
//!
//! ## Error Categories
//!
//! ### Sample Cycle (never fatal)
//! - `ConversionOutOfRange`: value formatted and delivered anyway
//! - `NoData`: slot skipped for this cycle only
//! - `Transport`: one peer missed one notification, no retry
//!
//! ### Peer Requests (rejected, state unchanged)
//! - `InvalidPeer`, `InvalidLength`, `InvalidOffset`, `AttributeNotFound`,
//!   `WriteNotPermitted`, `ValueNotAllowed`, `PeerTableFull`
//!
//! ### Start-up
//! - `InvalidConfig`: the node refuses to start with this configuration
//!
//! ```rust
//! use waterguard_core::{ServiceError, SensorSlot};
//!
//! fn on_skip(err: ServiceError) {
//!     match err {
//!         ServiceError::NoData { slot } => {
//!             // acquisition missed its deadline; next cycle refreshes it
//!             let _ = slot;
//!         }
//!         ServiceError::Transport(_) => {
//!             // link congested; the next value supersedes this one
//!         }
//!         _ => {}
//!     }
//! }
//! # on_skip(ServiceError::NoData { slot: SensorSlot::Flow });
//! ```

use thiserror_no_std::Error;

use crate::slot::SensorSlot;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Bluetooth ATT error codes returned to peers.
pub mod att {
    /// Write not permitted on this attribute.
    pub const WRITE_NOT_PERMITTED: u8 = 0x03;
    /// Offset beyond the end of the attribute value.
    pub const INVALID_OFFSET: u8 = 0x07;
    /// No such attribute.
    pub const ATTRIBUTE_NOT_FOUND: u8 = 0x0A;
    /// Request failed for a reason with no dedicated code.
    pub const UNLIKELY_ERROR: u8 = 0x0E;
    /// Attribute value length is wrong for the attribute.
    pub const INVALID_ATTRIBUTE_VALUE_LENGTH: u8 = 0x0D;
    /// Value outside the set the attribute accepts.
    pub const VALUE_NOT_ALLOWED: u8 = 0x13;
}

/// Failure reported by the radio when handing over a notification
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Link buffers full; nothing queued for this peer
    #[error("link congested")]
    Congested,

    /// Peer no longer connected at the link layer
    #[error("peer not connected")]
    NotConnected,

    /// Stack refused the packet for another reason
    #[error("rejected by stack (status {0})")]
    Rejected(u8),
}

/// Failure reported by the acquisition collaborator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionError {
    /// No sample ready for this channel in this cycle
    #[error("no sample available")]
    NoData,

    /// Hardware read hit its timeout
    #[error("read timed out")]
    Timeout,

    /// Channel delivered the wrong kind of sample
    #[error("unexpected sample kind")]
    WrongKind,
}

/// Service errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ServiceError {
    /// Converted value does not fit the documented range of the slot
    #[error("{slot} value {value} outside representable range")]
    ConversionOutOfRange {
        /// Slot whose conversion overflowed
        slot: SensorSlot,
        /// Physical value before saturation
        value: f32,
    },

    /// Acquisition supplied nothing for the slot this cycle
    #[error("no data for {slot}")]
    NoData {
        /// Slot that was skipped
        slot: SensorSlot,
    },

    /// Peer identifier is reserved or not connected
    #[error("invalid peer")]
    InvalidPeer,

    /// Buffer length does not match the attribute
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Declared length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Read or write offset past the end of the value
    #[error("offset {offset} beyond value length {len}")]
    InvalidOffset {
        /// Requested offset
        offset: usize,
        /// Length of the attribute value
        len: usize,
    },

    /// No attribute answers to the request
    #[error("attribute not found")]
    AttributeNotFound,

    /// Sensor values are read/notify only
    #[error("write not permitted")]
    WriteNotPermitted,

    /// Client configuration other than off/notify
    #[error("configuration value not allowed")]
    ValueNotAllowed,

    /// Every peer entry is taken
    #[error("peer table full")]
    PeerTableFull,

    /// Notification hand-off failed for one peer
    #[error("transport error: {0}")]
    Transport(TransportError),

    /// Configuration value rejected at start-up
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl ServiceError {
    /// ATT error code a peer receives for this error
    pub const fn att_code(&self) -> u8 {
        match self {
            Self::InvalidLength { .. } => att::INVALID_ATTRIBUTE_VALUE_LENGTH,
            Self::InvalidOffset { .. } => att::INVALID_OFFSET,
            Self::AttributeNotFound => att::ATTRIBUTE_NOT_FOUND,
            Self::WriteNotPermitted => att::WRITE_NOT_PERMITTED,
            Self::ValueNotAllowed => att::VALUE_NOT_ALLOWED,
            _ => att::UNLIKELY_ERROR,
        }
    }

    /// Whether the error only costs one slot or one peer a single cycle
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConversionOutOfRange { .. } | Self::NoData { .. } | Self::Transport(_)
        )
    }
}

impl From<TransportError> for ServiceError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Congested => defmt::write!(fmt, "link congested"),
            Self::NotConnected => defmt::write!(fmt, "peer not connected"),
            Self::Rejected(status) => defmt::write!(fmt, "rejected (status {})", status),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AcquisitionError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NoData => defmt::write!(fmt, "no sample"),
            Self::Timeout => defmt::write!(fmt, "read timeout"),
            Self::WrongKind => defmt::write!(fmt, "wrong sample kind"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ServiceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ConversionOutOfRange { slot, value } =>
                defmt::write!(fmt, "{} value {} out of range", slot, value),
            Self::NoData { slot } =>
                defmt::write!(fmt, "no data for {}", slot),
            Self::InvalidPeer =>
                defmt::write!(fmt, "invalid peer"),
            Self::InvalidLength { expected, actual } =>
                defmt::write!(fmt, "length {} != {}", actual, expected),
            Self::InvalidOffset { offset, len } =>
                defmt::write!(fmt, "offset {} > {}", offset, len),
            Self::AttributeNotFound =>
                defmt::write!(fmt, "attribute not found"),
            Self::WriteNotPermitted =>
                defmt::write!(fmt, "write not permitted"),
            Self::ValueNotAllowed =>
                defmt::write!(fmt, "value not allowed"),
            Self::PeerTableFull =>
                defmt::write!(fmt, "peer table full"),
            Self::Transport(err) =>
                defmt::write!(fmt, "transport: {}", err),
            Self::InvalidConfig(reason) =>
                defmt::write!(fmt, "invalid config: {}", reason),
        }
    }
}
