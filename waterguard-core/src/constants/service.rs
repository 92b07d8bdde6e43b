//! Wire Identities
//!
//! 16-bit identities and declared lengths of the water-quality service.
//! Peer applications look characteristics up by these values, so they are
//! part of the external contract.

// ===== SERVICE =====

/// Service identity grouping all six sensor characteristics.
pub const SERVICE_UUID: u16 = 0x11AA;

/// Vendor base UUID the 16-bit identities are expanded onto
/// (`F000xxxx-0451-4000-B000-000000000000`), least-significant byte first.
///
/// Bytes 12 and 13 are replaced by the 16-bit identity.
pub const VENDOR_BASE_UUID: [u8; 16] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xB0,
    0x00, 0x40, 0x51, 0x04, 0x00, 0x00, 0x00, 0xF0,
];

// ===== CHARACTERISTICS =====

/// Temperature characteristic identity.
pub const TEMPERATURE_UUID: u16 = 0xA11A;
/// Temperature value length (bytes).
pub const TEMPERATURE_LEN: usize = 3;

/// Pressure characteristic identity.
pub const PRESSURE_UUID: u16 = 0xB11B;
/// Pressure value length (bytes).
pub const PRESSURE_LEN: usize = 4;

/// Flow characteristic identity.
pub const FLOW_UUID: u16 = 0xC11C;
/// Flow value length (bytes).
pub const FLOW_LEN: usize = 4;

/// Conductivity characteristic identity.
pub const CONDUCTIVITY_UUID: u16 = 0xD11D;
/// Conductivity value length (bytes).
pub const CONDUCTIVITY_LEN: usize = 5;

/// Turbidity characteristic identity.
pub const TURBIDITY_UUID: u16 = 0xE11E;
/// Turbidity value length (bytes).
pub const TURBIDITY_LEN: usize = 4;

/// pH characteristic identity.
pub const PH_UUID: u16 = 0xF11F;
/// pH value length (bytes).
pub const PH_LEN: usize = 6;

/// Number of declared sensor characteristics.
pub const SLOT_COUNT: usize = 6;

/// Widest declared value; sizes every inline value buffer.
pub const MAX_VALUE_LEN: usize = 6;

// ===== CLIENT CONFIGURATION =====

/// Length of a client characteristic configuration value.
pub const CCC_LEN: usize = 2;

/// Client configuration: notifications and indications off.
pub const CCC_DISABLED: u16 = 0x0000;

/// Client configuration: notifications on.
pub const CCC_NOTIFY: u16 = 0x0001;

/// Client configuration: indications on (not offered by this service).
pub const CCC_INDICATE: u16 = 0x0002;

/// Connection handle the link layer reserves for "no connection".
pub const INVALID_CONN_HANDLE: u16 = 0xFFFF;
