//! Sensor Slots and Fixed-Width Values
//!
//! A slot is one sensor's identity on the wire: a 16-bit characteristic
//! identity, a parameter index and a declared byte length. [`SlotValue`]
//! is the buffer cached and notified for a slot; its length always equals
//! the declared length of the slot it was built for.
//!
//! ```text
//! Slot          Index  Identity  Length
//! Temperature   0      0xA11A    3
//! Pressure      1      0xB11B    4
//! Flow          2      0xC11C    4
//! Conductivity  3      0xD11D    5
//! Turbidity     4      0xE11E    4
//! Ph            5      0xF11F    6
//! ```

use core::fmt;

use crate::constants::service::*;
use crate::errors::{ServiceError, ServiceResult};

/// One declared sensor characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SensorSlot {
    /// Water temperature, °C
    Temperature = 0,
    /// Line pressure, raw ADC code
    Pressure = 1,
    /// Flow rate, raw ADC code
    Flow = 2,
    /// Temperature-compensated conductivity, µS/cm
    Conductivity = 3,
    /// Turbidity probe voltage, mV
    Turbidity = 4,
    /// pH text from the serial probe
    Ph = 5,
}

impl SensorSlot {
    /// All slots in sampling order.
    ///
    /// Temperature precedes Conductivity; the controller relies on it.
    pub const ALL: [SensorSlot; SLOT_COUNT] = [
        SensorSlot::Temperature,
        SensorSlot::Pressure,
        SensorSlot::Flow,
        SensorSlot::Conductivity,
        SensorSlot::Turbidity,
        SensorSlot::Ph,
    ];

    /// Parameter index used by the attribute table
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Slot for a parameter index
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SensorSlot::Temperature),
            1 => Some(SensorSlot::Pressure),
            2 => Some(SensorSlot::Flow),
            3 => Some(SensorSlot::Conductivity),
            4 => Some(SensorSlot::Turbidity),
            5 => Some(SensorSlot::Ph),
            _ => None,
        }
    }

    /// 16-bit characteristic identity
    pub const fn uuid(&self) -> u16 {
        match self {
            SensorSlot::Temperature => TEMPERATURE_UUID,
            SensorSlot::Pressure => PRESSURE_UUID,
            SensorSlot::Flow => FLOW_UUID,
            SensorSlot::Conductivity => CONDUCTIVITY_UUID,
            SensorSlot::Turbidity => TURBIDITY_UUID,
            SensorSlot::Ph => PH_UUID,
        }
    }

    /// Slot for a 16-bit characteristic identity
    pub fn from_uuid(uuid: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|slot| slot.uuid() == uuid)
    }

    /// Identity expanded onto the vendor base, least-significant byte first
    pub const fn uuid128(&self) -> [u8; 16] {
        expand_uuid(self.uuid())
    }

    /// Declared value length in bytes
    pub const fn len(&self) -> usize {
        match self {
            SensorSlot::Temperature => TEMPERATURE_LEN,
            SensorSlot::Pressure => PRESSURE_LEN,
            SensorSlot::Flow => FLOW_LEN,
            SensorSlot::Conductivity => CONDUCTIVITY_LEN,
            SensorSlot::Turbidity => TURBIDITY_LEN,
            SensorSlot::Ph => PH_LEN,
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorSlot::Temperature => "temperature",
            SensorSlot::Pressure => "pressure",
            SensorSlot::Flow => "flow",
            SensorSlot::Conductivity => "conductivity",
            SensorSlot::Turbidity => "turbidity",
            SensorSlot::Ph => "ph",
        }
    }

    /// Unit the formatted value is expressed in
    pub const fn unit(&self) -> &'static str {
        match self {
            SensorSlot::Temperature => "°C",
            SensorSlot::Pressure => "raw",
            SensorSlot::Flow => "raw",
            SensorSlot::Conductivity => "µS/cm",
            SensorSlot::Turbidity => "mV",
            SensorSlot::Ph => "pH",
        }
    }

    /// Whether the slot is fed by the analog sensor controller
    pub const fn is_analog(&self) -> bool {
        !matches!(self, SensorSlot::Ph)
    }
}

impl fmt::Display for SensorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorSlot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name())
    }
}

/// Expand a 16-bit identity onto the vendor base UUID
pub const fn expand_uuid(uuid: u16) -> [u8; 16] {
    let mut full = VENDOR_BASE_UUID;
    let bytes = uuid.to_le_bytes();
    full[12] = bytes[0];
    full[13] = bytes[1];
    full
}

/// Fixed-width value of one slot
///
/// Stored inline so the cache, the dispatcher and peer reads never touch
/// the heap. Construction enforces the slot's declared length.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotValue {
    slot: SensorSlot,
    data: [u8; MAX_VALUE_LEN],
}

impl SlotValue {
    /// All-zero value, the cache content before the first cycle
    pub const fn zeroed(slot: SensorSlot) -> Self {
        Self {
            slot,
            data: [0u8; MAX_VALUE_LEN],
        }
    }

    /// Build from bytes that must match the slot's declared length
    pub fn new(slot: SensorSlot, bytes: &[u8]) -> ServiceResult<Self> {
        if bytes.len() != slot.len() {
            return Err(ServiceError::InvalidLength {
                expected: slot.len(),
                actual: bytes.len(),
            });
        }

        let mut data = [0u8; MAX_VALUE_LEN];
        data[..bytes.len()].copy_from_slice(bytes);

        Ok(Self { slot, data })
    }

    /// Slot this value belongs to
    pub const fn slot(&self) -> SensorSlot {
        self.slot
    }

    /// Value bytes, exactly `slot().len()` long
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.slot.len()]
    }

    /// Length in bytes
    pub const fn len(&self) -> usize {
        self.slot.len()
    }

    /// Value as text when it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }
}

impl fmt::Debug for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "{}={:?}", self.slot, text),
            None => write!(f, "{}={:?}", self.slot, self.as_bytes()),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SlotValue {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}={=[u8]}", self.slot, self.as_bytes())
    }
}
