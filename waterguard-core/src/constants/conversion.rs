//! Conversion Constants
//!
//! Scale factors applied by the sensor controller's 12-bit ADC and the
//! calibration curve of the conductivity probe.

// ===== ADC =====

/// Full-scale count of the 12-bit ADC.
pub const ADC_FULL_SCALE: f32 = 4096.0;

/// ADC reference expressed in millivolts.
///
/// Turbidity and conductivity are reported against this span.
pub const ADC_REFERENCE_MV: f32 = 4300.0;

// ===== TEMPERATURE =====

/// Temperature reached at ADC full scale (°C).
///
/// The analog front-end maps 0..4096 linearly onto 0..430 °C.
pub const TEMP_SPAN_C: f32 = 430.0;

// ===== CONDUCTIVITY COMPENSATION =====

/// Reference temperature of the conductivity calibration (°C).
pub const CONDUCTIVITY_REFERENCE_C: f32 = 25.0;

/// Linear temperature coefficient of conductivity (per °C).
///
/// Source: probe datasheet, 1.85 %/°C
pub const CONDUCTIVITY_TEMP_COEFF: f32 = 0.0185;

// ===== CONDUCTIVITY CURVE =====
//
// Piecewise-linear fit of µS/cm against compensated millivolts. Thresholds
// are inclusive upper bounds of the lower branch.

/// Upper bound (mV) of the low-conductivity branch.
pub const CONDUCTIVITY_LOW_MAX_MV: f32 = 448.0;

/// Upper bound (mV) of the mid-conductivity branch.
pub const CONDUCTIVITY_MID_MAX_MV: f32 = 1457.0;

/// Low branch: `slope * mV + offset`.
pub const CONDUCTIVITY_LOW_SLOPE: f32 = 6.84;
/// Low branch offset.
pub const CONDUCTIVITY_LOW_OFFSET: f32 = -64.32;

/// Mid branch slope.
pub const CONDUCTIVITY_MID_SLOPE: f32 = 6.98;
/// Mid branch offset.
pub const CONDUCTIVITY_MID_OFFSET: f32 = -127.0;

/// High branch slope.
pub const CONDUCTIVITY_HIGH_SLOPE: f32 = 5.3;
/// High branch offset.
pub const CONDUCTIVITY_HIGH_OFFSET: f32 = 2278.0;
