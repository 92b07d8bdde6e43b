//! Peer Read and Write Requests
//!
//! The radio stack forwards attribute requests for this service here. Two
//! kinds of attribute exist per slot:
//!
//! - the **value**, readable from the cache and never writable
//! - the **client configuration** (CCC), a 2-byte little-endian bitfield
//!   per peer; only "off" (`0x0000`) and "notify" (`0x0001`) are accepted
//!
//! Attribute table layout, as offsets from the service handle:
//!
//! ```text
//! +0        service declaration (0x11AA)
//! +1 +2 +3  temperature: declaration, value, CCC
//! +4 +5 +6  pressure
//! ...
//! +16 +17 +18  pH
//! ```
//!
//! Every rejection leaves the registry untouched and carries an ATT error
//! code through `ServiceError::att_code`.

use crate::constants::service::{CCC_DISABLED, CCC_LEN, CCC_NOTIFY, SLOT_COUNT};
use crate::errors::{ServiceError, ServiceResult};
use crate::peer::PeerId;
use crate::registry::Registry;
use crate::slot::SensorSlot;

/// Attributes in the service, declarations included.
pub const ATTRIBUTE_COUNT: u16 = 1 + 3 * SLOT_COUNT as u16;

/// Addressable attribute of the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Cached sensor value
    Value(SensorSlot),
    /// Per-peer notification switch of a slot
    ClientConfig(SensorSlot),
}

impl Attribute {
    /// Attribute at a handle offset from the service declaration
    ///
    /// Declarations are answered by the stack and map to `None`.
    pub const fn from_handle_offset(offset: u16) -> Option<Self> {
        if offset == 0 || offset >= ATTRIBUTE_COUNT {
            return None;
        }
        let index = (offset - 1) / 3;
        let slot = match SensorSlot::from_index(index as usize) {
            Some(slot) => slot,
            None => return None,
        };
        match (offset - 1) % 3 {
            1 => Some(Attribute::Value(slot)),
            2 => Some(Attribute::ClientConfig(slot)),
            _ => None,
        }
    }

    /// Handle offset from the service declaration
    pub const fn handle_offset(&self) -> u16 {
        match self {
            Attribute::Value(slot) => 2 + 3 * slot.index() as u16,
            Attribute::ClientConfig(slot) => 3 + 3 * slot.index() as u16,
        }
    }

    /// Slot the attribute belongs to
    pub const fn slot(&self) -> SensorSlot {
        match self {
            Attribute::Value(slot) | Attribute::ClientConfig(slot) => *slot,
        }
    }
}

/// Copy `value[offset..]` into `out`, as much as fits
fn read_at(value: &[u8], offset: usize, out: &mut [u8]) -> ServiceResult<usize> {
    if offset > value.len() {
        return Err(ServiceError::InvalidOffset {
            offset,
            len: value.len(),
        });
    }
    let count = out.len().min(value.len() - offset);
    out[..count].copy_from_slice(&value[offset..offset + count]);
    Ok(count)
}

impl<const P: usize> Registry<P> {
    /// Answer a peer read; `out.len()` is the most the peer accepts
    ///
    /// Returns the number of bytes written. An offset equal to the value
    /// length yields an empty read; beyond it, `InvalidOffset`.
    pub fn read_request(
        &self,
        peer: PeerId,
        attribute: Attribute,
        offset: usize,
        out: &mut [u8],
    ) -> ServiceResult<usize> {
        match attribute {
            Attribute::Value(slot) => {
                let value = self.get(slot);
                read_at(value.as_bytes(), offset, out)
            }
            Attribute::ClientConfig(slot) => {
                let bits = if self.is_subscribed(peer, slot) {
                    CCC_NOTIFY
                } else {
                    CCC_DISABLED
                };
                read_at(&bits.to_le_bytes(), offset, out)
            }
        }
    }

    /// Answer a peer write
    ///
    /// Only client configuration is writable. A rejected write changes
    /// nothing.
    pub fn write_request(
        &self,
        peer: PeerId,
        attribute: Attribute,
        offset: usize,
        data: &[u8],
    ) -> ServiceResult<()> {
        let slot = match attribute {
            Attribute::Value(_) => return Err(ServiceError::WriteNotPermitted),
            Attribute::ClientConfig(slot) => slot,
        };

        if offset != 0 {
            return Err(ServiceError::InvalidOffset {
                offset,
                len: CCC_LEN,
            });
        }
        if data.len() != CCC_LEN {
            return Err(ServiceError::InvalidLength {
                expected: CCC_LEN,
                actual: data.len(),
            });
        }

        let enabled = match u16::from_le_bytes([data[0], data[1]]) {
            CCC_DISABLED => false,
            CCC_NOTIFY => true,
            _ => return Err(ServiceError::ValueNotAllowed),
        };

        self.subscribe(peer, slot, enabled)
    }

    /// Answer a read addressed by characteristic identity
    pub fn read_by_uuid(
        &self,
        peer: PeerId,
        uuid: u16,
        offset: usize,
        out: &mut [u8],
    ) -> ServiceResult<usize> {
        let slot = SensorSlot::from_uuid(uuid).ok_or(ServiceError::AttributeNotFound)?;
        self.read_request(peer, Attribute::Value(slot), offset, out)
    }

    /// Answer a request addressed by handle offset
    pub fn read_by_handle(
        &self,
        peer: PeerId,
        offset_handle: u16,
        offset: usize,
        out: &mut [u8],
    ) -> ServiceResult<usize> {
        let attribute =
            Attribute::from_handle_offset(offset_handle).ok_or(ServiceError::AttributeNotFound)?;
        self.read_request(peer, attribute, offset, out)
    }

    /// Answer a write addressed by handle offset
    pub fn write_by_handle(
        &self,
        peer: PeerId,
        offset_handle: u16,
        offset: usize,
        data: &[u8],
    ) -> ServiceResult<()> {
        let attribute =
            Attribute::from_handle_offset(offset_handle).ok_or(ServiceError::AttributeNotFound)?;
        self.write_request(peer, attribute, offset, data)
    }
}
