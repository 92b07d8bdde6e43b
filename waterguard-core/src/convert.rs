//! Raw Sample to Physical Unit Conversion
//!
//! Pure, deterministic functions that turn sensor-controller ADC codes into
//! the unit each characteristic reports:
//!
//! | Slot         | Conversion                                   | Unit   |
//! |--------------|----------------------------------------------|--------|
//! | Temperature  | `raw * 430 / 4096`                           | °C     |
//! | Pressure     | pass-through                                 | raw    |
//! | Flow         | pass-through                                 | raw    |
//! | Conductivity | temperature-compensated piecewise-linear fit | µS/cm  |
//! | Turbidity    | `raw * 4300 / 4096`                          | mV     |
//! | pH           | not converted (serial text)                  | pH     |
//!
//! ## Temperature Compensation
//!
//! Conductivity of water rises about 1.85 % per °C. The probe voltage is
//! divided by `1 + 0.0185 * (T - 25)` before the calibration curve is
//! applied, so conductivity needs the temperature of the *same* cycle.
//! That dependency is explicit: [`conductivity_us_cm`] takes the converted
//! temperature as an argument and [`ConversionContext`] carries it through
//! [`convert`].
//!
//! ```text
//! compensated mV ≤ 448   →  6.84·x − 64.32
//! compensated mV ≤ 1457  →  6.98·x − 127
//! otherwise              →  5.3·x  + 2278
//! ```
//!
//! ## Out-of-Range Input
//!
//! Nothing here clamps. A code above the 12-bit ADC range produces a value
//! above the documented range; [`check_raw`] reports it as
//! `ConversionOutOfRange` so the caller can log it and still deliver.

use crate::constants::conversion::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::slot::SensorSlot;

/// Largest code the 12-bit ADC produces.
pub const ADC_MAX_CODE: u16 = 4095;

/// Values produced earlier in the same cycle that later conversions need
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConversionContext {
    /// Temperature converted this cycle (°C), if the sample arrived
    pub temperature_c: Option<f32>,
}

impl ConversionContext {
    /// Context carrying this cycle's temperature
    pub const fn with_temperature(temperature_c: f32) -> Self {
        Self {
            temperature_c: Some(temperature_c),
        }
    }
}

/// Convert a raw analog sample into the slot's physical unit
///
/// Returns `None` for pH, which never comes from the ADC, and for
/// conductivity when the context carries no temperature.
pub fn convert(slot: SensorSlot, raw: u16, context: &ConversionContext) -> Option<f32> {
    match slot {
        SensorSlot::Temperature => Some(temperature_c(raw)),
        SensorSlot::Pressure | SensorSlot::Flow => Some(f32::from(raw)),
        SensorSlot::Conductivity => context
            .temperature_c
            .map(|temperature| conductivity_us_cm(raw, temperature)),
        SensorSlot::Turbidity => Some(turbidity_mv(raw)),
        SensorSlot::Ph => None,
    }
}

/// Report analog input beyond the ADC range
///
/// The converted value is still usable; the error is informational.
pub fn check_raw(slot: SensorSlot, raw: u16) -> ServiceResult<()> {
    if slot.is_analog() && raw > ADC_MAX_CODE {
        return Err(ServiceError::ConversionOutOfRange {
            slot,
            value: f32::from(raw),
        });
    }
    Ok(())
}

/// Temperature in °C from an ADC code
pub fn temperature_c(raw: u16) -> f32 {
    f32::from(raw) * TEMP_SPAN_C / ADC_FULL_SCALE
}

/// ADC code scaled to millivolts against the reference
pub fn adc_to_mv(raw: u16) -> f32 {
    f32::from(raw) * ADC_REFERENCE_MV / ADC_FULL_SCALE
}

/// Turbidity probe output in millivolts
pub fn turbidity_mv(raw: u16) -> f32 {
    adc_to_mv(raw)
}

/// Compensation divisor for a water temperature
pub fn compensation_coefficient(temperature_c: f32) -> f32 {
    1.0 + CONDUCTIVITY_TEMP_COEFF * (temperature_c - CONDUCTIVITY_REFERENCE_C)
}

/// Probe voltage referred back to 25 °C
pub fn compensated_mv(raw: u16, temperature_c: f32) -> f32 {
    adc_to_mv(raw) / compensation_coefficient(temperature_c)
}

/// Calibration curve: compensated millivolts to µS/cm
///
/// Thresholds are inclusive; exactly 448 mV uses the low branch and
/// exactly 1457 mV the middle one.
pub fn conductivity_from_mv(compensated_mv: f32) -> f32 {
    if compensated_mv <= CONDUCTIVITY_LOW_MAX_MV {
        CONDUCTIVITY_LOW_SLOPE * compensated_mv + CONDUCTIVITY_LOW_OFFSET
    } else if compensated_mv <= CONDUCTIVITY_MID_MAX_MV {
        CONDUCTIVITY_MID_SLOPE * compensated_mv + CONDUCTIVITY_MID_OFFSET
    } else {
        CONDUCTIVITY_HIGH_SLOPE * compensated_mv + CONDUCTIVITY_HIGH_OFFSET
    }
}

/// Conductivity in µS/cm from an ADC code and this cycle's temperature
pub fn conductivity_us_cm(raw: u16, temperature_c: f32) -> f32 {
    conductivity_from_mv(compensated_mv(raw, temperature_c))
}
