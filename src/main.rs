//! blehub — Main Entry Point
//!
//! Multi-connection BLE GATT command peripheral.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapter (outer ring)                   │
//! │                                                          │
//! │  BleAdapter (Bluedroid callbacks → LinkEvent queue,      │
//! │              AdvertiserPort)                             │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            Pure core                           │      │
//! │  │  Coordinator · SlotTable · GattAccessHandler   │      │
//! │  │  Command interpreter                           │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

mod adapters;
mod commands;
mod config;
mod error;
mod gap;
mod gatt;
mod slots;

use anyhow::Result;
use log::info;

use adapters::ble::{take_link_event, BleAdapter, LinkEvent};
use config::SystemConfig;
use gap::Coordinator;
use gatt::GattAccessHandler;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("blehub v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();

    // ── 3. BLE stack + GATT service ───────────────────────────
    let mut ble = BleAdapter::new(&config);
    if let Err(e) = ble.start() {
        // Stack bring-up failure is the only fatal condition here.
        anyhow::bail!("BLE stack init failed: {e}");
    }

    // ── 4. Core state ─────────────────────────────────────────
    let mut coordinator = Coordinator::new();
    let gatt_handler = GattAccessHandler::new();

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    //
    // Bluedroid delivers GAP/GATTS callbacks serially from its own
    // task; they land on the link-event queue and are processed here
    // one at a time, so the slot table never sees concurrent mutation.
    loop {
        while let Some(event) = take_link_event() {
            match event {
                LinkEvent::Gap(gap_event) => {
                    coordinator.handle_event(gap_event, &mut ble);
                }
                LinkEvent::Write { conn, data } => {
                    let _ = gatt_handler.on_write(coordinator.slots(), conn, &data);
                }
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(
            config.poll_interval_ms as u64,
        ));
    }
}
