//! Common collaborators for integration tests
//!
//! This module provides:
//! - A scripted acquisition source with per-slot failures
//! - A recording transport with injectable delivery failures
//! - Named raw-sample scenarios with their expected wire values

#![allow(dead_code)]

use waterguard_core::{
    constants::SLOT_COUNT, Acquisition, AcquisitionError, PeerId, RawSample, Registry,
    SampleCycleController, SensorSlot, ServiceConfig, Transport, TransportError,
};

pub mod scenarios;

/// Acquisition that returns whatever the test scripted for each slot
#[derive(Debug, Clone)]
pub struct ScriptedAcquisition {
    samples: [Result<RawSample, AcquisitionError>; SLOT_COUNT],
    /// Slots in the order they were read
    pub reads: Vec<SensorSlot>,
}

impl Default for ScriptedAcquisition {
    fn default() -> Self {
        Self {
            samples: core::array::from_fn(|_| Err(AcquisitionError::NoData)),
            reads: Vec::new(),
        }
    }
}

impl ScriptedAcquisition {
    /// Analog code for a slot
    pub fn adc(mut self, slot: SensorSlot, raw: u16) -> Self {
        self.samples[slot.index()] = Ok(RawSample::Adc(raw));
        self
    }

    /// Serial line for the pH slot
    pub fn ph_line(mut self, line: &[u8]) -> Self {
        self.samples[SensorSlot::Ph.index()] = Ok(RawSample::line(line));
        self
    }

    /// Make a slot fail from now on
    pub fn fail(&mut self, slot: SensorSlot, err: AcquisitionError) {
        self.samples[slot.index()] = Err(err);
    }

    /// Replace a slot's analog code
    pub fn set_adc(&mut self, slot: SensorSlot, raw: u16) {
        self.samples[slot.index()] = Ok(RawSample::Adc(raw));
    }
}

impl Acquisition for ScriptedAcquisition {
    fn read_raw(&mut self, slot: SensorSlot) -> Result<RawSample, AcquisitionError> {
        self.reads.push(slot);
        self.samples[slot.index()].clone()
    }
}

/// One notification handed to the radio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub peer: u16,
    pub slot: SensorSlot,
    pub value: Vec<u8>,
}

/// Transport that records every accepted notification
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Vec<Sent>,
    refused: Vec<(u16, TransportError)>,
    /// Every notify call, accepted or not
    pub attempts: usize,
}

impl RecordingTransport {
    /// Refuse every notification to `peer` with `err`
    pub fn refuse(&mut self, peer: PeerId, err: TransportError) {
        self.refused.push((peer.handle(), err));
    }

    /// Accept notifications to every peer again
    pub fn heal(&mut self) {
        self.refused.clear();
    }

    /// Notifications received by one peer
    pub fn sent_to(&self, peer: PeerId) -> Vec<&Sent> {
        self.sent.iter().filter(|s| s.peer == peer.handle()).collect()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
        self.attempts = 0;
    }
}

impl Transport for RecordingTransport {
    fn notify(
        &mut self,
        peer: PeerId,
        slot: SensorSlot,
        value: &[u8],
    ) -> Result<(), TransportError> {
        self.attempts += 1;
        if let Some(&(_, err)) = self.refused.iter().find(|(h, _)| *h == peer.handle()) {
            return Err(err);
        }
        self.sent.push(Sent {
            peer: peer.handle(),
            slot,
            value: value.to_vec(),
        });
        Ok(())
    }
}

pub type TestController<'r> = SampleCycleController<'r, ScriptedAcquisition, RecordingTransport>;

/// Controller over `registry` with default configuration
pub fn new_controller(registry: &Registry, acquisition: ScriptedAcquisition) -> TestController<'_> {
    SampleCycleController::new(
        registry,
        acquisition,
        RecordingTransport::default(),
        ServiceConfig::default(),
    )
    .expect("default config is valid")
}

pub fn peer(handle: u16) -> PeerId {
    PeerId::new(handle).expect("valid handle")
}
