//! Property tests across the whole cycle

#![cfg(test)]

mod common;

use proptest::prelude::*;

use waterguard_core::{convert::temperature_c, Registry, SensorSlot, SlotOutcome};

use common::{new_controller, peer, ScriptedAcquisition};

fn any_cycle() -> impl Strategy<Value = ScriptedAcquisition> {
    (
        0u16..4096,
        any::<u16>(),
        any::<u16>(),
        0u16..4096,
        0u16..4096,
        "[0-9]{1,2}\\.[0-9]{1,3}",
    )
        .prop_map(|(t, p, f, c, turb, ph)| {
            let mut line = ph.into_bytes();
            line.extend_from_slice(b"\r\n");
            ScriptedAcquisition::default()
                .adc(SensorSlot::Temperature, t)
                .adc(SensorSlot::Pressure, p)
                .adc(SensorSlot::Flow, f)
                .adc(SensorSlot::Conductivity, c)
                .adc(SensorSlot::Turbidity, turb)
                .ph_line(&line)
        })
}

proptest! {
    #[test]
    fn cached_values_keep_declared_length(acquisition in any_cycle()) {
        let registry: Registry = Registry::new();
        let mut controller = new_controller(&registry, acquisition);

        let report = controller.run_cycle(0);

        prop_assert_eq!(report.updated(), 6);
        for slot in SensorSlot::ALL {
            prop_assert_eq!(registry.get(slot).as_bytes().len(), slot.len());
        }
    }

    #[test]
    fn notified_value_equals_cached_value(acquisition in any_cycle()) {
        let registry: Registry = Registry::new();
        let a = peer(1);
        registry.connect(a).unwrap();
        for slot in SensorSlot::ALL {
            registry.subscribe(a, slot, true).unwrap();
        }
        let mut controller = new_controller(&registry, acquisition);

        controller.run_cycle(0);

        let sent = &controller.dispatcher().transport().sent;
        prop_assert_eq!(sent.len(), 6);
        for notification in sent {
            let cached = registry.get(notification.slot);
            prop_assert_eq!(
                notification.value.as_slice(),
                cached.as_bytes()
            );
        }
    }

    #[test]
    fn temperature_is_monotonic(a in 0u16..4096, b in 0u16..4096) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(temperature_c(low) <= temperature_c(high));
    }

    #[test]
    fn skipped_slots_keep_their_value(fail_index in 0usize..5) {
        let registry: Registry = Registry::new();
        let mut controller = new_controller(&registry, common::scenarios::nominal().acquisition);
        controller.run_cycle(0);

        let slot = SensorSlot::from_index(fail_index).unwrap();
        let before = registry.get(slot);
        controller
            .acquisition_mut()
            .fail(slot, waterguard_core::AcquisitionError::Timeout);

        let report = controller.run_cycle(1000);

        prop_assert!(matches!(report.outcome(slot), SlotOutcome::Skipped(_)));
        prop_assert_eq!(registry.get(slot), before);
    }
}
