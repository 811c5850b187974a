//! GATT access handlers for the single exposed service.
//!
//! One primary service (`0x180A`) with two characteristics:
//!
//! | Characteristic | UUID     | Perms | Behaviour                          |
//! |----------------|----------|-------|------------------------------------|
//! | Command        | `0xDEAD` | Write | interpret payload as a command     |
//! | Info           | `0xFEF4` | Read  | fixed `"Data from the server"`     |
//!
//! Both accesses always succeed at the GATT level: this is a
//! best-effort informational channel, and malformed or unrecognized
//! payloads are swallowed into logging, never returned to the peer.

use log::{info, warn};

use crate::commands::Command;
use crate::error::PayloadError;
use crate::slots::{ConnHandle, SlotTable};

/// Primary service UUID (16-bit).
pub const SERVICE_UUID: u16 = 0x180A;
/// Read characteristic UUID (16-bit).
pub const CHAR_READ_UUID: u16 = 0xFEF4;
/// Write characteristic UUID (16-bit).
pub const CHAR_WRITE_UUID: u16 = 0xDEAD;

/// Fixed payload returned by every read access.
pub const READ_PAYLOAD: &[u8] = b"Data from the server";

/// Stateless access callbacks for the two characteristics.
///
/// Holds no connection lifecycle state; the slot table is borrowed
/// read-only per call (the GAP coordinator is its only writer).
#[derive(Debug, Default)]
pub struct GattAccessHandler;

impl GattAccessHandler {
    pub const fn new() -> Self {
        Self
    }

    /// Handle a write access: resolve the device number, interpret the
    /// payload, log the result. Never fails — device 0 means the
    /// connection holds no slot, and non-UTF8 bytes are decoded lossily
    /// for the log line only.
    pub fn on_write<'a>(
        &self,
        slots: &SlotTable,
        conn: ConnHandle,
        payload: &'a [u8],
    ) -> Command<'a> {
        let dev_num = slots.device_number(conn);
        let text = String::from_utf8_lossy(payload);
        info!("Device {} wrote: {}", dev_num, text);

        let command = Command::parse(payload);
        match command.as_str() {
            Some(verb) => info!("{}", verb),
            None => {
                let kind = if core::str::from_utf8(payload).is_ok() {
                    PayloadError::UnrecognizedCommand
                } else {
                    PayloadError::MalformedPayload
                };
                warn!("Device {}: {}: {}", dev_num, kind, text);
            }
        }
        command
    }

    /// Handle a read access: the payload is invariant across
    /// connections, slots and prior writes.
    pub fn on_read(&self, _conn: ConnHandle) -> &'static [u8] {
        READ_PAYLOAD
    }
}
