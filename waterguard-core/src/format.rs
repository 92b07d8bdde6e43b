//! Fixed-Width Value Formatting
//!
//! Renders physical values into the exact byte length each characteristic
//! declares. Values travel as ASCII decimal integers (the fractional part
//! is truncated) followed by space padding, so a narrower number keeps the
//! field width constant:
//!
//! ```text
//! Temperature (3):   5 → "5  "    42 → "42 "    209 → "209"
//! Conductivity (5):  7 → "7    "  3000 → "3000 "  12878 → "12878"
//! ```
//!
//! ## Overflow
//!
//! A value wider than the field (or negative) cannot be represented. The
//! formatter never truncates digits and never overruns: it saturates to
//! the nearest representable value (`0` or all nines) and marks the result
//! [`Formatted::saturated`]. Whether a saturated value is delivered is the
//! caller's decision (see `OverflowPolicy`).
//!
//! pH text arrives pre-formatted from the serial line and only goes
//! through [`format_line`].

use core::fmt::Write;

use heapless::String;

use crate::constants::service::MAX_VALUE_LEN;
use crate::errors::{ServiceError, ServiceResult};
use crate::slot::{SensorSlot, SlotValue};

/// Padding byte appended after the digits.
pub const PAD: u8 = b' ';

/// Formatted value plus whether it had to be saturated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatted {
    /// Buffer of exactly the slot's declared length
    pub value: SlotValue,
    /// The physical value did not fit and was clamped
    pub saturated: bool,
}

/// Largest integer a field of `width` decimal digits can hold
pub const fn field_max(width: usize) -> u32 {
    let mut max = 1u32;
    let mut i = 0;
    while i < width {
        max *= 10;
        i += 1;
    }
    max - 1
}

/// Render a physical value into the slot's fixed-width field
pub fn format(slot: SensorSlot, value: f32) -> Formatted {
    let width = slot.len();
    let max = field_max(width);

    let (number, saturated) = if !value.is_finite() || value < 0.0 {
        (0, true)
    } else if value >= (max as f32) + 1.0 {
        (max, true)
    } else {
        // Truncate toward zero like an integer cast of the reading
        (value as u32, false)
    };

    Formatted {
        value: pad_digits(slot, number),
        saturated,
    }
}

fn pad_digits(slot: SensorSlot, number: u32) -> SlotValue {
    let width = slot.len();
    let mut text: String<MAX_VALUE_LEN> = String::new();

    // `number <= field_max(width)` so the digits always fit
    let _ = write!(text, "{}", number);

    let mut bytes = [PAD; MAX_VALUE_LEN];
    let digits = text.as_bytes();
    bytes[..digits.len()].copy_from_slice(digits);

    SlotValue::new(slot, &bytes[..width]).unwrap_or_else(|_| SlotValue::zeroed(slot))
}

/// Turn one serial line into the pH slot value
///
/// The line ends at the first newline; a trailing carriage return and
/// NUL bytes are dropped. Text longer than the field is rejected rather
/// than cut.
pub fn format_line(line: &[u8]) -> ServiceResult<SlotValue> {
    let width = SensorSlot::Ph.len();

    let end = line.iter().position(|&b| b == b'\n').unwrap_or(line.len());
    let mut text = &line[..end];
    while let Some((&last, rest)) = text.split_last() {
        if last == b'\r' || last == 0 {
            text = rest;
        } else {
            break;
        }
    }

    if text.len() > width {
        return Err(ServiceError::InvalidLength {
            expected: width,
            actual: text.len(),
        });
    }

    let mut bytes = [PAD; MAX_VALUE_LEN];
    bytes[..text.len()].copy_from_slice(text);
    SlotValue::new(SensorSlot::Ph, &bytes[..width])
}
