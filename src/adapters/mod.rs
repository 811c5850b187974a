//! Platform adapters.
//!
//! Everything that touches ESP-IDF lives here, guarded by
//! `#[cfg(target_os = "espidf")]`; other targets get simulation stubs
//! so the crate builds and tests on the host.

pub mod ble;
