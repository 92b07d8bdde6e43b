//! Integration tests for peer-initiated requests
//!
//! Peers enable notifications through the client configuration attribute
//! and read cached values; the sample cycle must respect both.

#![cfg(test)]

mod common;

use waterguard_core::{
    constants::service::{CCC_INDICATE, CCC_NOTIFY},
    errors::att,
    gatt::ATTRIBUTE_COUNT,
    Attribute, Registry, SensorSlot, ServiceError,
};

use common::{new_controller, peer, scenarios};

#[test]
fn ccc_write_enables_cycle_notifications() {
    let registry: Registry = Registry::new();
    let a = peer(1);
    registry.connect(a).unwrap();

    let ccc = Attribute::ClientConfig(SensorSlot::Conductivity);
    registry
        .write_by_handle(a, ccc.handle_offset(), 0, &CCC_NOTIFY.to_le_bytes())
        .unwrap();

    let mut controller = new_controller(&registry, scenarios::nominal().acquisition);
    controller.run_cycle(0);

    let sent = controller.dispatcher().transport().sent_to(a);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].slot, SensorSlot::Conductivity);
    assert_eq!(sent[0].value, b"7202 ".to_vec());
}

#[test]
fn indications_are_refused() {
    let registry: Registry = Registry::new();
    let a = peer(1);
    registry.connect(a).unwrap();

    let err = registry
        .write_request(a, Attribute::ClientConfig(SensorSlot::Ph), 0, &CCC_INDICATE.to_le_bytes())
        .unwrap_err();

    assert_eq!(err, ServiceError::ValueNotAllowed);
    assert_eq!(err.att_code(), att::VALUE_NOT_ALLOWED);
    assert!(!registry.is_subscribed(a, SensorSlot::Ph));
}

#[test]
fn reads_return_cache_without_sampling() {
    let registry: Registry = Registry::new();
    let a = peer(1);
    registry.connect(a).unwrap();

    let mut controller = new_controller(&registry, scenarios::nominal().acquisition);
    controller.run_cycle(0);
    let reads_after_cycle = controller.acquisition_mut().reads.len();

    let mut out = [0u8; 16];
    for (slot, expected) in scenarios::nominal().expected {
        let n = registry.read_by_uuid(a, slot.uuid(), 0, &mut out).unwrap();
        assert_eq!(&out[..n], expected);
    }

    assert_eq!(controller.acquisition_mut().reads.len(), reads_after_cycle);
}

#[test]
fn long_read_in_two_parts() {
    let registry: Registry = Registry::new();
    let a = peer(1);
    registry.connect(a).unwrap();
    let mut controller = new_controller(&registry, scenarios::nominal().acquisition);
    controller.run_cycle(0);

    let value = Attribute::Value(SensorSlot::Ph);
    let mut first = [0u8; 4];
    let mut rest = [0u8; 4];
    let n1 = registry.read_request(a, value, 0, &mut first).unwrap();
    let n2 = registry.read_request(a, value, n1, &mut rest).unwrap();

    assert_eq!(n1 + n2, 6);
    let mut joined = first[..n1].to_vec();
    joined.extend_from_slice(&rest[..n2]);
    assert_eq!(joined, b"7.02  ".to_vec());
}

#[test]
fn every_handle_resolves_or_is_not_found() {
    let registry: Registry = Registry::new();
    let a = peer(1);
    registry.connect(a).unwrap();
    let mut out = [0u8; 8];

    let mut values = 0;
    let mut configs = 0;
    for handle in 0..ATTRIBUTE_COUNT + 2 {
        match Attribute::from_handle_offset(handle) {
            Some(Attribute::Value(_)) => {
                values += 1;
                assert!(registry.read_by_handle(a, handle, 0, &mut out).is_ok());
            }
            Some(Attribute::ClientConfig(_)) => {
                configs += 1;
                assert_eq!(registry.read_by_handle(a, handle, 0, &mut out), Ok(2));
            }
            None => assert_eq!(
                registry.read_by_handle(a, handle, 0, &mut out),
                Err(ServiceError::AttributeNotFound)
            ),
        }
    }

    assert_eq!(values, 6);
    assert_eq!(configs, 6);
}

#[test]
fn sensor_values_are_read_only() {
    let registry: Registry = Registry::new();
    let a = peer(1);
    registry.connect(a).unwrap();

    for slot in SensorSlot::ALL {
        let zeros = [0u8; 6];
        assert_eq!(
            registry.write_request(a, Attribute::Value(slot), 0, &zeros[..slot.len()]),
            Err(ServiceError::WriteNotPermitted)
        );
    }
}
