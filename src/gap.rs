//! GAP event coordinator.
//!
//! Drives the connection lifecycle: admit connections into the slot
//! table, free slots on disconnect, and keep the peripheral advertising
//! so further centrals can join (up to
//! [`MAX_DEVICES`](crate::slots::MAX_DEVICES) tracked links).
//!
//! ```text
//!   radio stack ──▶ GapEvent ──▶ Coordinator ──▶ SlotTable
//!                                    │
//!                                    └─────────▶ AdvertiserPort::restart
//! ```
//!
//! The coordinator is the sole writer of the slot table; the GATT
//! access path only reads it via [`Coordinator::slots`].

use log::{info, warn};

use crate::error::LinkError;
use crate::slots::{ConnHandle, SlotTable};

// ───────────────────────────────────────────────────────────────
// Events
// ───────────────────────────────────────────────────────────────

/// GAP events delivered by the radio stack.
///
/// The underlying protocol has many more event kinds; everything this
/// system deliberately ignores arrives as [`GapEvent::Other`] so the
/// catch-all is an explicit, auditable arm rather than silent
/// fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapEvent {
    /// A central attempted to connect. `success` is the stack's status.
    Connect { handle: ConnHandle, success: bool },
    /// An established link went down (reason is not inspected).
    Disconnect { handle: ConnHandle },
    /// One advertising round finished (timed out or was cancelled).
    AdvComplete,
    /// Any stack event kind outside this system's concern.
    Other(u32),
}

// ───────────────────────────────────────────────────────────────
// Advertiser port
// ───────────────────────────────────────────────────────────────

/// Driven port: (re)start advertising on the radio.
///
/// Implementations build the complete-local-name field and undirected
/// connectable / general discoverable parameters with no time limit.
/// Restarting while already advertising must be tolerated.
pub trait AdvertiserPort {
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Coordinator
// ───────────────────────────────────────────────────────────────

/// The GAP event state machine. Owns the slot table.
#[derive(Debug, Default)]
pub struct Coordinator {
    slots: SlotTable,
}

impl Coordinator {
    pub const fn new() -> Self {
        Self {
            slots: SlotTable::new(),
        }
    }

    /// Read-only view of the slot table for the GATT access path.
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Process one GAP event.
    ///
    /// Every terminal event (successful connect, disconnect,
    /// advertising-complete) restarts advertising exactly once. A
    /// failed connect does not: the stack delivers its own
    /// advertising-complete transition when it ends the attempt.
    pub fn handle_event(&mut self, event: GapEvent, adv: &mut impl AdvertiserPort) {
        match event {
            GapEvent::Connect { handle, success } => {
                if success {
                    match self.slots.assign(handle) {
                        Ok(idx) => {
                            info!("Device {} connected, conn_handle={}", idx + 1, handle);
                        }
                        Err(_) => {
                            warn!(
                                "Device 0 connected untracked ({}), conn_handle={}",
                                LinkError::SlotTableFull,
                                handle
                            );
                        }
                    }
                    adv.restart();
                } else {
                    warn!("GAP: {}, conn_handle={}", LinkError::ConnectAttemptFailed, handle);
                }
            }
            GapEvent::Disconnect { handle } => {
                match self.slots.release(handle) {
                    Some(idx) => {
                        info!("Device {} disconnected, conn_handle={}", idx + 1, handle);
                    }
                    None => {
                        info!(
                            "Device 0 disconnected ({}), conn_handle={}",
                            LinkError::UnknownConnection,
                            handle
                        );
                    }
                }
                adv.restart();
            }
            GapEvent::AdvComplete => {
                info!("GAP advertising round complete");
                adv.restart();
            }
            // Deliberately ignored: the stack emits many event kinds
            // (MTU updates, PHY changes, ...) this core does not track.
            GapEvent::Other(_) => {}
        }
    }
}
