//! Connection slot table.
//!
//! Maps opaque link-layer connection handles to small, stable slot
//! numbers used in diagnostics ("Device 3 wrote: ..."). Pure data
//! structure — no BLE knowledge, no I/O.
//!
//! Slots are `Option<ConnHandle>` rather than a zero sentinel, so a
//! real handle of value 0 is tracked like any other.

use core::fmt;

/// Maximum simultaneously tracked connections.
pub const MAX_DEVICES: usize = 5;

/// Opaque per-link identifier assigned by the radio stack.
///
/// The stack owns the handle's lifetime; the table only references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnHandle(pub u16);

impl fmt::Display for ConnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All slots occupied at assign time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotsFull;

/// Fixed-capacity connection-to-slot mapping.
///
/// Invariants:
/// - no two occupied slots hold the same handle;
/// - a connection keeps its slot index until it disconnects.
#[derive(Debug, Default)]
pub struct SlotTable {
    slots: [Option<ConnHandle>; MAX_DEVICES],
}

impl SlotTable {
    pub const fn new() -> Self {
        Self {
            slots: [None; MAX_DEVICES],
        }
    }

    /// Slot index currently holding `handle`, if tracked.
    pub fn find(&self, handle: ConnHandle) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(handle))
    }

    /// Occupy the lowest free slot for `handle`.
    ///
    /// Idempotent: a handle that is already tracked gets its existing
    /// index back (duplicate connect events must not double-allocate).
    pub fn assign(&mut self, handle: ConnHandle) -> Result<usize, SlotsFull> {
        if let Some(idx) = self.find(handle) {
            return Ok(idx);
        }
        match self.slots.iter().position(Option::is_none) {
            Some(idx) => {
                self.slots[idx] = Some(handle);
                Ok(idx)
            }
            None => Err(SlotsFull),
        }
    }

    /// Free the slot holding `handle`, returning its index.
    ///
    /// Unknown handles are tolerated: disconnects can arrive for
    /// connections that never got a slot (table was full).
    pub fn release(&mut self, handle: ConnHandle) -> Option<usize> {
        let idx = self.find(handle)?;
        self.slots[idx] = None;
        Some(idx)
    }

    /// Read-only view of the slot array, in index order.
    pub fn entries(&self) -> &[Option<ConnHandle>] {
        &self.slots
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Human-facing slot number for `handle`: 1-based, 0 = untracked.
    pub fn device_number(&self, handle: ConnHandle) -> usize {
        self.find(handle).map_or(0, |idx| idx + 1)
    }
}
