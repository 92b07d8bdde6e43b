//! Runtime configuration
//!
//! Everything the node may change without a rebuild. Capacities (peer
//! table, message queue) are const generics and live in
//! [`constants`](crate::constants) instead.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::time::{
    DEFAULT_SAMPLE_INTERVAL_MS, HIGH_FREQ_SAMPLE_INTERVAL_MS, LOW_POWER_SAMPLE_INTERVAL_MS,
    PH_BAUD_RATE, PH_READ_TIMEOUT_MS,
};
use crate::errors::{ServiceError, ServiceResult};

/// What to do with a value too wide for its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverflowPolicy {
    /// Deliver the nearest representable value and report the overflow
    #[default]
    Saturate,
    /// Skip the slot for this cycle
    Reject,
}

/// Sampling and serial-line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServiceConfig {
    /// Milliseconds between sample cycles
    pub sample_interval_ms: u64,
    /// pH probe serial speed
    pub ph_baud_rate: u32,
    /// Upper bound on one pH line read
    pub ph_read_timeout_ms: u32,
    /// Handling of values wider than their field
    pub overflow_policy: OverflowPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            ph_baud_rate: PH_BAUD_RATE,
            ph_read_timeout_ms: PH_READ_TIMEOUT_MS,
            overflow_policy: OverflowPolicy::Saturate,
        }
    }
}

impl ServiceConfig {
    /// Battery-only deployment: one cycle per minute
    pub fn low_power() -> Self {
        Self {
            sample_interval_ms: LOW_POWER_SAMPLE_INTERVAL_MS,
            ..Self::default()
        }
    }

    /// Commissioning: four cycles per second
    pub fn high_frequency() -> Self {
        Self {
            sample_interval_ms: HIGH_FREQ_SAMPLE_INTERVAL_MS,
            ..Self::default()
        }
    }

    /// Reject settings the node cannot run with
    pub fn validate(&self) -> ServiceResult<()> {
        if self.sample_interval_ms == 0 {
            return Err(ServiceError::InvalidConfig("sample interval must be non-zero"));
        }
        if self.ph_baud_rate == 0 {
            return Err(ServiceError::InvalidConfig("pH baud rate must be non-zero"));
        }
        // A line read that outlasts the cycle would stall the next tick
        if u64::from(self.ph_read_timeout_ms) >= self.sample_interval_ms {
            return Err(ServiceError::InvalidConfig(
                "pH read timeout must be shorter than the sample interval",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_firmware() {
        let config = ServiceConfig::default();
        assert_eq!(config.sample_interval_ms, 1000);
        assert_eq!(config.ph_baud_rate, 9600);
        assert_eq!(config.overflow_policy, OverflowPolicy::Saturate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn presets_are_valid() {
        assert_eq!(ServiceConfig::low_power().sample_interval_ms, 60_000);
        assert_eq!(ServiceConfig::high_frequency().sample_interval_ms, 250);
        assert!(ServiceConfig::low_power().validate().is_ok());
        assert!(ServiceConfig::high_frequency().validate().is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let config = ServiceConfig {
            sample_interval_ms: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServiceError::InvalidConfig(_))));
    }

    #[test]
    fn slow_serial_read_rejected() {
        let config = ServiceConfig {
            sample_interval_ms: 400,
            ph_read_timeout_ms: 500,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parse_partial_json() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"sample_interval_ms": 5000, "overflow_policy": "reject"}"#)
                .unwrap();
        assert_eq!(config.sample_interval_ms, 5000);
        assert_eq!(config.overflow_policy, OverflowPolicy::Reject);
        assert_eq!(config.ph_baud_rate, 9600);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip() {
        let config = ServiceConfig::low_power();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<ServiceConfig>(&json).unwrap(), config);
    }
}
