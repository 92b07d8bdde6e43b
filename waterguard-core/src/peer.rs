//! Peers and Their Notification Subscriptions
//!
//! Each connected peer owns one [`SubscriptionFlags`] bitset with one bit
//! per slot. The table holds at most `P` peers (the number of link-layer
//! connections the radio supports) and is created empty: a peer appears on
//! connect with every slot disabled and disappears entirely on disconnect,
//! so a reconnect under a fresh handle starts from nothing.

use core::fmt;

use heapless::Vec;

use crate::constants::service::INVALID_CONN_HANDLE;
use crate::errors::{ServiceError, ServiceResult};
use crate::slot::SensorSlot;

/// Link-layer connection handle of a remote peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(u16);

impl PeerId {
    /// Wrap a connection handle, rejecting the reserved "no connection" value
    pub const fn new(handle: u16) -> ServiceResult<Self> {
        if handle == INVALID_CONN_HANDLE {
            Err(ServiceError::InvalidPeer)
        } else {
            Ok(Self(handle))
        }
    }

    /// Raw connection handle
    pub const fn handle(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PeerId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "peer#{}", self.0)
    }
}

/// Per-slot notification bits of one peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubscriptionFlags(u8);

impl SubscriptionFlags {
    /// No slot enabled
    pub const fn empty() -> Self {
        Self(0)
    }

    const fn bit(slot: SensorSlot) -> u8 {
        1 << slot.index()
    }

    /// Switch one slot on or off
    pub fn set(&mut self, slot: SensorSlot, enabled: bool) {
        if enabled {
            self.0 |= Self::bit(slot);
        } else {
            self.0 &= !Self::bit(slot);
        }
    }

    /// Whether the slot is enabled
    pub const fn contains(&self, slot: SensorSlot) -> bool {
        (self.0 & Self::bit(slot)) != 0
    }

    /// Whether no slot is enabled
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct PeerEntry {
    peer: PeerId,
    flags: SubscriptionFlags,
}

/// Subscription state of every connected peer
#[derive(Debug, Clone)]
pub struct SubscriptionTable<const P: usize> {
    entries: Vec<PeerEntry, P>,
}

impl<const P: usize> Default for SubscriptionTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const P: usize> SubscriptionTable<P> {
    /// Empty table; usable in `static` context
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn entry_mut(&mut self, peer: PeerId) -> Option<&mut PeerEntry> {
        self.entries.iter_mut().find(|entry| entry.peer == peer)
    }

    fn entry(&self, peer: PeerId) -> Option<&PeerEntry> {
        self.entries.iter().find(|entry| entry.peer == peer)
    }

    /// Register a peer with all notifications disabled
    ///
    /// Connecting an already-known peer resets its subscriptions.
    pub fn connect(&mut self, peer: PeerId) -> ServiceResult<()> {
        if let Some(entry) = self.entry_mut(peer) {
            entry.flags = SubscriptionFlags::empty();
            return Ok(());
        }

        self.entries
            .push(PeerEntry {
                peer,
                flags: SubscriptionFlags::empty(),
            })
            .map_err(|_| ServiceError::PeerTableFull)
    }

    /// Drop a peer and every subscription it held
    ///
    /// Returns whether the peer was known.
    pub fn disconnect(&mut self, peer: PeerId) -> bool {
        match self.entries.iter().position(|entry| entry.peer == peer) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Enable or disable notifications of one slot for one peer
    pub fn subscribe(
        &mut self,
        peer: PeerId,
        slot: SensorSlot,
        enabled: bool,
    ) -> ServiceResult<()> {
        let entry = self.entry_mut(peer).ok_or(ServiceError::InvalidPeer)?;
        entry.flags.set(slot, enabled);
        Ok(())
    }

    /// Whether the peer wants notifications for the slot
    ///
    /// Unknown peers are never subscribed.
    pub fn is_subscribed(&self, peer: PeerId, slot: SensorSlot) -> bool {
        self.entry(peer)
            .map(|entry| entry.flags.contains(slot))
            .unwrap_or(false)
    }

    /// Subscription bits of a connected peer
    pub fn flags(&self, peer: PeerId) -> Option<SubscriptionFlags> {
        self.entry(peer).map(|entry| entry.flags)
    }

    /// Whether the peer is connected
    pub fn contains(&self, peer: PeerId) -> bool {
        self.entry(peer).is_some()
    }

    /// Peers subscribed to a slot, in connection order
    pub fn subscribers(&self, slot: SensorSlot) -> Vec<PeerId, P> {
        self.entries
            .iter()
            .filter(|entry| entry.flags.contains(slot))
            .map(|entry| entry.peer)
            .collect()
    }

    /// Number of connected peers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no peer is connected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
