//! Sample Cycle Controller
//!
//! ## Overview
//!
//! Drives one full pass over every slot per tick and owns the main loop's
//! side of the message queue:
//!
//! ```text
//!          ┌──────────────────────────────────────────────┐
//!          ↓                                              │
//!        Idle ──tick──→ Sampling ──→ Converting ──→ Dispatching
//!                      read_raw ×6   convert+format   Registry::set ×n
//! ```
//!
//! - **Sampling** reads every slot in order. A failed read skips that slot
//!   for this cycle only.
//! - **Converting** runs Temperature before Conductivity and hands the
//!   converted temperature forward through [`ConversionContext`]. Values
//!   too wide for their field follow the configured [`OverflowPolicy`].
//! - **Dispatching** writes each staged value to the registry, which
//!   notifies subscribers. Nothing here can fail the cycle as a whole.
//!
//! A cycle runs to completion before the next message is looked at. Ticks
//! must not arrive faster than a cycle completes; the controller does no
//! debouncing of its own.
//!
//! ## Message Loop
//!
//! ```rust
//! use waterguard_core::{
//!     Acquisition, AcquisitionError, MessageQueue, Message, PeerId, RawSample, Registry,
//!     SampleCycleController, SensorSlot, ServiceConfig, Transport, TransportError,
//! };
//!
//! struct Probe;
//! impl Acquisition for Probe {
//!     fn read_raw(&mut self, slot: SensorSlot) -> Result<RawSample, AcquisitionError> {
//!         match slot {
//!             SensorSlot::Ph => Ok(RawSample::line(b"7.01\r\n")),
//!             _ => Ok(RawSample::Adc(50)),
//!         }
//!     }
//! }
//!
//! struct Radio;
//! impl Transport for Radio {
//!     fn notify(&mut self, _: PeerId, _: SensorSlot, _: &[u8]) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! static QUEUE: MessageQueue<Message, 16> = MessageQueue::new();
//!
//! let registry: Registry = Registry::new();
//! let mut controller =
//!     SampleCycleController::new(&registry, Probe, Radio, ServiceConfig::default())?;
//!
//! QUEUE.push(Message::SensorAlert { timestamp: 1000 });
//! nb::block!(controller.poll(&QUEUE))?;
//!
//! assert_eq!(registry.get(SensorSlot::Temperature).as_bytes(), b"5  ");
//! assert!(controller.poll(&QUEUE).is_err()); // WouldBlock
//! # Ok::<(), waterguard_core::ServiceError>(())
//! ```

use heapless::Vec;

use crate::config::{OverflowPolicy, ServiceConfig};
use crate::constants::service::SLOT_COUNT;
use crate::constants::time::MAX_PEERS;
use crate::convert::{check_raw, convert, ConversionContext};
use crate::dispatch::{DispatchReport, NotificationDispatcher};
use crate::errors::{AcquisitionError, ServiceError, ServiceResult};
use crate::format::{format, format_line};
use crate::peer::PeerId;
use crate::ports::{Acquisition, RawSample, Transport};
use crate::queue::MessageQueue;
use crate::registry::Registry;
use crate::slot::{SensorSlot, SlotValue};
use crate::time::{Interval, Timestamp};

/// Warnings one cycle can raise: a raw range check and an overflow per slot.
pub const MAX_CYCLE_WARNINGS: usize = 2 * SLOT_COUNT;

/// Event handed from interrupt context to the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Fresh samples are ready; run one cycle
    SensorAlert {
        /// When the alert fired
        timestamp: Timestamp,
    },
    /// Link layer accepted a connection
    PeerConnected(PeerId),
    /// Link layer dropped a connection
    PeerDisconnected(PeerId),
    /// New configuration pushed by the operator
    ConfigWrite(ServiceConfig),
}

/// Phase of the sample cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    /// Waiting for the next tick
    #[default]
    Idle,
    /// Reading raw samples
    Sampling,
    /// Converting and formatting
    Converting,
    /// Updating the cache and notifying
    Dispatching,
}

/// What happened to one slot in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SlotOutcome {
    /// Not reached yet
    #[default]
    Pending,
    /// Cached and offered to subscribers
    Updated(DispatchReport),
    /// Left unchanged this cycle
    Skipped(ServiceError),
}

/// Result of one complete cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Tick that started the cycle
    pub timestamp: Timestamp,
    /// Outcome per slot, indexed by [`SensorSlot::index`]
    pub slots: [SlotOutcome; SLOT_COUNT],
    /// Non-fatal problems of slots that were still updated
    pub warnings: Vec<ServiceError, MAX_CYCLE_WARNINGS>,
}

impl CycleReport {
    fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            slots: [SlotOutcome::Pending; SLOT_COUNT],
            warnings: Vec::new(),
        }
    }

    /// Outcome of one slot
    pub fn outcome(&self, slot: SensorSlot) -> SlotOutcome {
        self.slots[slot.index()]
    }

    /// Slots cached this cycle
    pub fn updated(&self) -> usize {
        self.slots
            .iter()
            .filter(|outcome| matches!(outcome, SlotOutcome::Updated(_)))
            .count()
    }

    /// Slots left unchanged this cycle
    pub fn skipped(&self) -> usize {
        self.slots
            .iter()
            .filter(|outcome| matches!(outcome, SlotOutcome::Skipped(_)))
            .count()
    }

    fn warn(&mut self, err: ServiceError) {
        // Capacity covers every warning a cycle can raise
        let _ = self.warnings.push(err);
    }
}

/// Handled message
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// A sample cycle ran
    Cycle(CycleReport),
    /// Peer registered with every slot disabled
    Connected(PeerId),
    /// Peer and its subscriptions dropped
    Disconnected(PeerId),
    /// Configuration replaced
    Reconfigured,
}

/// Running totals since start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleStats {
    /// Cycles completed
    pub cycles: u32,
    /// Slot updates written to the cache
    pub slots_updated: u32,
    /// Slot updates skipped
    pub slots_skipped: u32,
    /// Conversions that did not fit their field, delivered saturated or rejected
    pub out_of_range: u32,
    /// Analog codes above the converter range on slots still updated
    pub raw_out_of_range: u32,
    /// Notifications accepted by the transport
    pub notifications_delivered: u32,
    /// Notifications the transport refused
    pub notifications_failed: u32,
}

/// Value ready to cache, with the warnings raised while producing it
#[derive(Debug, Clone, Copy)]
struct Staged {
    value: SlotValue,
    raw_warning: Option<ServiceError>,
    overflow: Option<ServiceError>,
}

impl Staged {
    fn clean(value: SlotValue) -> Self {
        Self {
            value,
            raw_warning: None,
            overflow: None,
        }
    }
}

/// Periodic driver of the sensor pipeline
pub struct SampleCycleController<'r, A, T, const P: usize = MAX_PEERS> {
    registry: &'r Registry<P>,
    acquisition: A,
    dispatcher: NotificationDispatcher<T>,
    config: ServiceConfig,
    state: CycleState,
    last_cycle_at: Option<Timestamp>,
    stats: CycleStats,
}

impl<'r, A, T, const P: usize> SampleCycleController<'r, A, T, P>
where
    A: Acquisition,
    T: Transport,
{
    /// Build a controller over a shared registry
    ///
    /// Fails with `InvalidConfig` if `config` does not validate.
    pub fn new(
        registry: &'r Registry<P>,
        acquisition: A,
        transport: T,
        config: ServiceConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            acquisition,
            dispatcher: NotificationDispatcher::new(transport),
            config,
            state: CycleState::Idle,
            last_cycle_at: None,
            stats: CycleStats::default(),
        })
    }

    /// Take the next message off the queue and handle it
    ///
    /// Returns `WouldBlock` when the queue is empty, so `nb::block!` waits
    /// for the next message.
    pub fn poll<const N: usize>(
        &mut self,
        queue: &MessageQueue<Message, N>,
    ) -> nb::Result<PollOutcome, ServiceError> {
        let message = queue.pop().ok_or(nb::Error::WouldBlock)?;
        self.handle(message).map_err(nb::Error::Other)
    }

    /// Handle one message directly
    pub fn handle(&mut self, message: Message) -> ServiceResult<PollOutcome> {
        match message {
            Message::SensorAlert { timestamp } => Ok(PollOutcome::Cycle(self.run_cycle(timestamp))),
            Message::PeerConnected(peer) => {
                self.registry.connect(peer)?;
                Ok(PollOutcome::Connected(peer))
            }
            Message::PeerDisconnected(peer) => {
                if !self.registry.disconnect(peer) {
                    log_debug!("disconnect for unknown {}", peer);
                }
                Ok(PollOutcome::Disconnected(peer))
            }
            Message::ConfigWrite(config) => {
                self.set_config(config)?;
                Ok(PollOutcome::Reconfigured)
            }
        }
    }

    /// Run one complete sample cycle
    ///
    /// # Panics
    ///
    /// In debug builds, if called while a cycle is already in progress.
    pub fn run_cycle(&mut self, now: Timestamp) -> CycleReport {
        debug_assert_eq!(self.state, CycleState::Idle, "sample cycle re-entered");
        let mut report = CycleReport::new(now);

        self.state = CycleState::Sampling;
        let mut samples: [Option<Result<RawSample, AcquisitionError>>; SLOT_COUNT] =
            Default::default();
        for slot in SensorSlot::ALL {
            samples[slot.index()] = Some(self.acquisition.read_raw(slot));
        }

        self.state = CycleState::Converting;
        let mut staged: [Option<Staged>; SLOT_COUNT] = [None; SLOT_COUNT];
        let mut context = ConversionContext::default();
        for slot in SensorSlot::ALL {
            let Some(sample) = samples[slot.index()].take() else {
                continue;
            };
            match self.stage(slot, sample, &mut context) {
                Ok(entry) => staged[slot.index()] = Some(entry),
                Err(err) => {
                    log_warn!("{} skipped: {}", slot, err);
                    report.slots[slot.index()] = SlotOutcome::Skipped(err);
                }
            }
        }

        self.state = CycleState::Dispatching;
        for staged in staged.into_iter().flatten() {
            let dispatch = self.registry.set(staged.value, &mut self.dispatcher);
            report.slots[staged.value.slot().index()] = SlotOutcome::Updated(dispatch);

            if let Some(err) = staged.raw_warning {
                self.stats.raw_out_of_range = self.stats.raw_out_of_range.wrapping_add(1);
                report.warn(err);
            }
            if let Some(err) = staged.overflow {
                self.stats.out_of_range = self.stats.out_of_range.wrapping_add(1);
                report.warn(err);
            }
        }

        self.record(&report);
        self.last_cycle_at = Some(now);
        self.state = CycleState::Idle;

        log_debug!(
            "cycle at {} done: {} updated, {} skipped",
            now,
            report.updated(),
            report.skipped()
        );
        report
    }

    /// Turn one raw sample into the value to cache
    fn stage(
        &self,
        slot: SensorSlot,
        sample: Result<RawSample, AcquisitionError>,
        context: &mut ConversionContext,
    ) -> ServiceResult<Staged> {
        let raw = match sample {
            Ok(RawSample::Line(line)) if slot == SensorSlot::Ph => {
                return format_line(&line).map(Staged::clean)
            }
            Ok(RawSample::Adc(raw)) if slot.is_analog() => Ok(raw),
            Ok(_) => Err(AcquisitionError::WrongKind),
            Err(err) => Err(err),
        };
        let raw = raw.map_err(|err| {
            log_warn!("{} acquisition failed: {}", slot, err);
            ServiceError::NoData { slot }
        })?;

        let raw_warning = check_raw(slot, raw).err();
        if let Some(err) = raw_warning {
            log_warn!("{}", err);
        }

        let value = match convert(slot, raw, context) {
            Some(value) => value,
            // Conductivity cannot be compensated without this cycle's temperature
            None => {
                return Err(ServiceError::NoData {
                    slot: SensorSlot::Temperature,
                })
            }
        };
        if slot == SensorSlot::Temperature {
            context.temperature_c = Some(value);
        }

        let formatted = format(slot, value);
        let mut overflow = None;
        if formatted.saturated {
            let err = ServiceError::ConversionOutOfRange { slot, value };
            match self.config.overflow_policy {
                OverflowPolicy::Saturate => {
                    log_warn!("{}", err);
                    overflow = Some(err);
                }
                OverflowPolicy::Reject => return Err(err),
            }
        }
        Ok(Staged {
            value: formatted.value,
            raw_warning,
            overflow,
        })
    }

    fn record(&mut self, report: &CycleReport) {
        let stats = &mut self.stats;
        stats.cycles = stats.cycles.wrapping_add(1);

        for outcome in report.slots.iter() {
            match outcome {
                SlotOutcome::Updated(dispatch) => {
                    stats.slots_updated = stats.slots_updated.wrapping_add(1);
                    stats.notifications_delivered =
                        stats.notifications_delivered.wrapping_add(u32::from(dispatch.delivered));
                    stats.notifications_failed =
                        stats.notifications_failed.wrapping_add(u32::from(dispatch.failed()));
                }
                SlotOutcome::Skipped(err) => {
                    stats.slots_skipped = stats.slots_skipped.wrapping_add(1);
                    if matches!(err, ServiceError::ConversionOutOfRange { .. }) {
                        stats.out_of_range = stats.out_of_range.wrapping_add(1);
                    }
                }
                SlotOutcome::Pending => {}
            }
        }
    }

    /// Replace the configuration after validating it
    pub fn set_config(&mut self, config: ServiceConfig) -> ServiceResult<()> {
        config.validate()?;
        self.config = config;
        log_info!("sample interval now {} ms", config.sample_interval_ms);
        Ok(())
    }

    /// Tick generator for the configured interval, first tick one period after `start`
    pub fn interval(&self, start: Timestamp) -> Interval {
        Interval::new(self.config.sample_interval_ms, start)
    }

    /// Current configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Current cycle phase
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Tick of the last completed cycle
    pub fn last_cycle_at(&self) -> Option<Timestamp> {
        self.last_cycle_at
    }

    /// Totals since construction
    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Registry this controller writes to
    pub fn registry(&self) -> &'r Registry<P> {
        self.registry
    }

    /// Notification dispatcher (and through it, the transport)
    pub fn dispatcher(&self) -> &NotificationDispatcher<T> {
        &self.dispatcher
    }

    /// Mutable access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        self.dispatcher.transport_mut()
    }

    /// Mutable access to the acquisition collaborator
    pub fn acquisition_mut(&mut self) -> &mut A {
        &mut self.acquisition
    }
}
