//! Named raw-sample sets with the wire values they must produce

use waterguard_core::SensorSlot;

use super::ScriptedAcquisition;

/// One full cycle's input and expected cache content
pub struct Scenario {
    pub name: &'static str,
    pub acquisition: ScriptedAcquisition,
    pub expected: [(SensorSlot, &'static [u8]); 6],
}

/// River water around 25 °C, everything inside its field
pub fn nominal() -> Scenario {
    Scenario {
        name: "nominal",
        acquisition: ScriptedAcquisition::default()
            .adc(SensorSlot::Temperature, 238)
            .adc(SensorSlot::Pressure, 1013)
            .adc(SensorSlot::Flow, 812)
            .adc(SensorSlot::Conductivity, 1000)
            .adc(SensorSlot::Turbidity, 820)
            .ph_line(b"7.02\r\n"),
        expected: [
            (SensorSlot::Temperature, b"24 "),
            (SensorSlot::Pressure, b"1013"),
            (SensorSlot::Flow, b"812 "),
            (SensorSlot::Conductivity, b"7202 "),
            (SensorSlot::Turbidity, b"860 "),
            (SensorSlot::Ph, b"7.02  "),
        ],
    }
}

/// Cold water, low readings: every field mostly padding
pub fn cold_and_clear() -> Scenario {
    Scenario {
        name: "cold_and_clear",
        acquisition: ScriptedAcquisition::default()
            .adc(SensorSlot::Temperature, 50)
            .adc(SensorSlot::Pressure, 7)
            .adc(SensorSlot::Flow, 0)
            .adc(SensorSlot::Conductivity, 0)
            .adc(SensorSlot::Turbidity, 3)
            .ph_line(b"6.9\n"),
        expected: [
            (SensorSlot::Temperature, b"5  "),
            (SensorSlot::Pressure, b"7   "),
            (SensorSlot::Flow, b"0   "),
            // 0 mV on the low branch is negative and saturates to zero
            (SensorSlot::Conductivity, b"0    "),
            (SensorSlot::Turbidity, b"3   "),
            (SensorSlot::Ph, b"6.9   "),
        ],
    }
}

pub fn all() -> [Scenario; 2] {
    [nominal(), cold_and_clear()]
}
