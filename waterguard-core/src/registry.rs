//! Characteristic Registry
//!
//! ## Overview
//!
//! The registry owns everything the radio side can observe: the cached
//! value of every slot and the subscription table of every connected peer.
//! It is built once at start-up and shared by reference between the sample
//! cycle and the radio's request handlers; there are no globals.
//!
//! ```text
//!                     ┌──────────── Registry ────────────┐
//! SampleCycle ──set──→│ values: Mutex<[SlotValue; 6]>    │──get──→ peer reads
//!                     │ subscriptions: Mutex<Table<P>>   │←─subscribe── CCC writes
//!                     └──────────────┬───────────────────┘
//!                                    ↓ dispatch (outside both locks)
//!                               Transport::notify
//! ```
//!
//! ## Invariants
//!
//! - Every cached value has exactly its slot's declared length; it starts
//!   zeroed and is replaced whole by `set` (last writer wins).
//! - `get` returns the cache and never triggers a sample.
//! - `set` always succeeds and always dispatches; there is no way to
//!   update the cache without offering the value to subscribers.
//! - Subscription bits are only touched under the table lock, so a reader
//!   never sees a half-applied change. Locks are held for copies only,
//!   never across a transport call.
//!
//! ```rust
//! use waterguard_core::{Registry, SensorSlot, SlotValue, PeerId, NotificationDispatcher};
//! # use waterguard_core::{Transport, TransportError};
//! # struct Radio;
//! # impl Transport for Radio {
//! #     fn notify(&mut self, _: PeerId, _: SensorSlot, _: &[u8]) -> Result<(), TransportError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! static REGISTRY: Registry = Registry::new();
//!
//! let peer = PeerId::new(0x0001)?;
//! REGISTRY.connect(peer)?;
//! REGISTRY.subscribe(peer, SensorSlot::Flow, true)?;
//!
//! let mut dispatcher = NotificationDispatcher::new(Radio);
//! let report = REGISTRY.set(SlotValue::new(SensorSlot::Flow, b"812 ")?, &mut dispatcher);
//! assert_eq!(report.delivered, 1);
//! assert_eq!(REGISTRY.get(SensorSlot::Flow).as_bytes(), b"812 ");
//! # Ok::<(), waterguard_core::ServiceError>(())
//! ```

use spin::Mutex;

use crate::constants::service::SLOT_COUNT;
use crate::constants::time::MAX_PEERS;
use crate::dispatch::{DispatchReport, NotificationDispatcher};
use crate::errors::ServiceResult;
use crate::peer::{PeerId, SubscriptionFlags, SubscriptionTable};
use crate::ports::Transport;
use crate::slot::{SensorSlot, SlotValue};

/// Cached slot values plus per-peer subscriptions
pub struct Registry<const P: usize = MAX_PEERS> {
    values: Mutex<[SlotValue; SLOT_COUNT]>,
    subscriptions: Mutex<SubscriptionTable<P>>,
}

impl<const P: usize> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const P: usize> Registry<P> {
    /// Registry with zeroed values and no peers; usable in `static` context
    pub const fn new() -> Self {
        Self {
            values: Mutex::new([
                SlotValue::zeroed(SensorSlot::Temperature),
                SlotValue::zeroed(SensorSlot::Pressure),
                SlotValue::zeroed(SensorSlot::Flow),
                SlotValue::zeroed(SensorSlot::Conductivity),
                SlotValue::zeroed(SensorSlot::Turbidity),
                SlotValue::zeroed(SensorSlot::Ph),
            ]),
            subscriptions: Mutex::new(SubscriptionTable::new()),
        }
    }

    /// Replace a slot's cached value and notify its subscribers
    ///
    /// The slot is taken from the value itself. A delivery failure is
    /// reported in the returned [`DispatchReport`]; the cache keeps the
    /// new value regardless.
    pub fn set<T: Transport>(
        &self,
        value: SlotValue,
        dispatcher: &mut NotificationDispatcher<T>,
    ) -> DispatchReport {
        let slot = value.slot();
        self.values.lock()[slot.index()] = value;

        let subscribers = self.subscriptions.lock().subscribers(slot);
        dispatcher.dispatch(&value, &subscribers)
    }

    /// Last cached value of a slot
    pub fn get(&self, slot: SensorSlot) -> SlotValue {
        self.values.lock()[slot.index()]
    }

    /// Register a newly connected peer with every slot disabled
    pub fn connect(&self, peer: PeerId) -> ServiceResult<()> {
        self.subscriptions.lock().connect(peer)?;
        log_info!("{} connected", peer);
        Ok(())
    }

    /// Forget a peer and all of its subscriptions
    pub fn disconnect(&self, peer: PeerId) -> bool {
        let known = self.subscriptions.lock().disconnect(peer);
        if known {
            log_info!("{} disconnected", peer);
        }
        known
    }

    /// Enable or disable notifications of one slot for one peer
    ///
    /// Fails with `InvalidPeer` for a peer that is not connected; the
    /// table is left unchanged.
    pub fn subscribe(&self, peer: PeerId, slot: SensorSlot, enabled: bool) -> ServiceResult<()> {
        self.subscriptions.lock().subscribe(peer, slot, enabled)?;
        log_info!(
            "{} {} notifications for {}",
            peer,
            if enabled { "enabled" } else { "disabled" },
            slot
        );
        Ok(())
    }

    /// Whether the peer receives notifications for the slot
    pub fn is_subscribed(&self, peer: PeerId, slot: SensorSlot) -> bool {
        self.subscriptions.lock().is_subscribed(peer, slot)
    }

    /// Subscription bits of a connected peer
    pub fn subscription_flags(&self, peer: PeerId) -> Option<SubscriptionFlags> {
        self.subscriptions.lock().flags(peer)
    }

    /// Whether the peer is connected
    pub fn is_connected(&self, peer: PeerId) -> bool {
        self.subscriptions.lock().contains(peer)
    }

    /// Number of connected peers
    pub fn peer_count(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ServiceError, TransportError};

    #[derive(Default)]
    struct Recorder {
        sent: Vec<(u16, SensorSlot)>,
    }

    impl Transport for Recorder {
        fn notify(
            &mut self,
            peer: PeerId,
            slot: SensorSlot,
            _value: &[u8],
        ) -> Result<(), TransportError> {
            self.sent.push((peer.handle(), slot));
            Ok(())
        }
    }

    fn peer(handle: u16) -> PeerId {
        PeerId::new(handle).unwrap()
    }

    #[test]
    fn starts_zeroed() {
        let registry: Registry = Registry::new();
        for slot in SensorSlot::ALL {
            let value = registry.get(slot);
            assert_eq!(value.len(), slot.len());
            assert!(value.as_bytes().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn set_then_get_without_subscribers() {
        let registry: Registry = Registry::new();
        let mut dispatcher = NotificationDispatcher::new(Recorder::default());
        let value = SlotValue::new(SensorSlot::Conductivity, b"3000 ").unwrap();

        let report = registry.set(value, &mut dispatcher);

        assert_eq!(report.attempted, 0);
        assert_eq!(registry.get(SensorSlot::Conductivity), value);
        assert!(dispatcher.transport().sent.is_empty());
    }

    #[test]
    fn last_writer_wins() {
        let registry: Registry = Registry::new();
        let mut dispatcher = NotificationDispatcher::new(Recorder::default());

        registry.set(SlotValue::new(SensorSlot::Temperature, b"21 ").unwrap(), &mut dispatcher);
        registry.set(SlotValue::new(SensorSlot::Temperature, b"22 ").unwrap(), &mut dispatcher);

        assert_eq!(registry.get(SensorSlot::Temperature).as_bytes(), b"22 ");
    }

    #[test]
    fn set_notifies_only_subscribers_of_that_slot() {
        let registry: Registry = Registry::new();
        let mut dispatcher = NotificationDispatcher::new(Recorder::default());
        registry.connect(peer(1)).unwrap();
        registry.connect(peer(2)).unwrap();
        registry.subscribe(peer(1), SensorSlot::Flow, true).unwrap();
        registry.subscribe(peer(2), SensorSlot::Pressure, true).unwrap();

        registry.set(SlotValue::new(SensorSlot::Flow, b"77  ").unwrap(), &mut dispatcher);

        assert_eq!(dispatcher.transport().sent, vec![(1, SensorSlot::Flow)]);
    }

    #[test]
    fn subscribe_unknown_peer_leaves_state_unchanged() {
        let registry: Registry = Registry::new();
        assert_eq!(
            registry.subscribe(peer(9), SensorSlot::Ph, true),
            Err(ServiceError::InvalidPeer)
        );
        assert_eq!(registry.peer_count(), 0);
    }

    #[test]
    fn usable_as_static() {
        static REGISTRY: Registry<2> = Registry::new();
        REGISTRY.connect(peer(4)).unwrap();
        assert!(REGISTRY.is_connected(peer(4)));
    }

    #[test]
    fn subscription_writers_on_other_threads() {
        static REGISTRY: Registry<2> = Registry::new();
        const ROUNDS: usize = 2000;

        let (watcher, idle) = (peer(1), peer(2));
        REGISTRY.connect(watcher).unwrap();
        REGISTRY.connect(idle).unwrap();
        REGISTRY.subscribe(watcher, SensorSlot::Pressure, true).unwrap();

        // Two writers flip different bits of the same peer's flags
        let writers: Vec<_> = [SensorSlot::Flow, SensorSlot::Ph]
            .into_iter()
            .map(|slot| {
                std::thread::spawn(move || {
                    for round in 0..ROUNDS {
                        REGISTRY.subscribe(watcher, slot, round % 2 == 0).unwrap();
                    }
                    // Flow ends disabled, pH ends enabled
                    REGISTRY.subscribe(watcher, slot, slot == SensorSlot::Ph).unwrap();
                })
            })
            .collect();

        let mut dispatcher = NotificationDispatcher::new(Recorder::default());
        let value = SlotValue::new(SensorSlot::Flow, b"812 ").unwrap();
        for _ in 0..ROUNDS {
            let report = REGISTRY.set(value, &mut dispatcher);
            assert!(report.attempted <= 1);
            assert_eq!(report.attempted, report.delivered);
        }
        for writer in writers {
            writer.join().unwrap();
        }

        assert!(dispatcher
            .transport()
            .sent
            .iter()
            .all(|&(handle, slot)| handle == watcher.handle() && slot == SensorSlot::Flow));

        let flags = REGISTRY.subscription_flags(watcher).unwrap();
        assert!(flags.contains(SensorSlot::Pressure));
        assert!(flags.contains(SensorSlot::Ph));
        assert!(!flags.contains(SensorSlot::Flow));
        assert!(REGISTRY.subscription_flags(idle).unwrap().is_empty());
        assert_eq!(REGISTRY.get(SensorSlot::Flow), value);
    }
}
