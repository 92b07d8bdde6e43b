//! Best-Effort Notification Delivery
//!
//! ## Delivery Model
//!
//! ```text
//! Registry::set ──→ cache updated ──→ snapshot subscribers(slot)
//!                                              │
//!                           ┌──────────────────┼──────────────────┐
//!                           ↓                  ↓                  ↓
//!                      notify(A) ok      notify(B) Err      notify(C) ok
//!                                              │
//!                                 counted, reported, not retried
//! ```
//!
//! - Every subscribed peer gets exactly one attempt per update.
//! - A failure for one peer never skips the others and never rolls back
//!   the cache.
//! - Nothing is queued: the next cycle's value supersedes a lost one.
//!
//! The dispatcher is only reachable through `Registry::set`, so a cache
//! update and its delivery cannot be separated.

use crate::errors::{ServiceError, ServiceResult, TransportError};
use crate::peer::PeerId;
use crate::ports::Transport;
use crate::slot::{SensorSlot, SlotValue};

/// Outcome of delivering one slot update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Subscribed peers at the time of the update
    pub attempted: u8,
    /// Peers the transport accepted the value for
    pub delivered: u8,
    /// First peer the transport refused, with its error
    pub first_failure: Option<(PeerId, TransportError)>,
}

impl DispatchReport {
    /// Peers that missed this update
    pub const fn failed(&self) -> u8 {
        self.attempted - self.delivered
    }

    /// `Ok` when every subscriber received the value
    pub fn result(&self) -> ServiceResult<()> {
        match self.first_failure {
            Some((_, err)) => Err(ServiceError::Transport(err)),
            None => Ok(()),
        }
    }
}

/// Running delivery totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// Notifications accepted by the transport
    pub delivered: u32,
    /// Notifications the transport refused
    pub failed: u32,
}

/// Hands cached values to the transport for every subscribed peer
#[derive(Debug)]
pub struct NotificationDispatcher<T> {
    transport: T,
    stats: DispatchStats,
}

impl<T: Transport> NotificationDispatcher<T> {
    /// Wrap the radio's notify primitive
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            stats: DispatchStats::default(),
        }
    }

    /// Push `value` to each peer in `subscribers`
    pub(crate) fn dispatch(&mut self, value: &SlotValue, subscribers: &[PeerId]) -> DispatchReport {
        let slot: SensorSlot = value.slot();
        let mut report = DispatchReport::default();

        for &peer in subscribers {
            report.attempted = report.attempted.saturating_add(1);

            match self.transport.notify(peer, slot, value.as_bytes()) {
                Ok(()) => {
                    report.delivered = report.delivered.saturating_add(1);
                    self.stats.delivered = self.stats.delivered.wrapping_add(1);
                }
                Err(err) => {
                    log_warn!("notify {} to {} failed: {}", slot, peer, err);
                    self.stats.failed = self.stats.failed.wrapping_add(1);
                    if report.first_failure.is_none() {
                        report.first_failure = Some((peer, err));
                    }
                }
            }
        }

        report
    }

    /// Delivery totals since construction
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }
}
