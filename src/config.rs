//! System configuration parameters
//!
//! All tunable parameters for the blehub peripheral. Values are
//! compile-time defaults; the struct is serde-serialisable so a future
//! NVS or provisioning layer can override them without code changes.

use serde::{Deserialize, Serialize};

/// Default advertised name, broadcast as a complete local-name field.
pub const DEFAULT_DEVICE_NAME: &str = "BLE-Server";

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Advertised device name (complete local name field).
    pub device_name: heapless::String<24>,

    // --- Advertising ---
    /// Minimum advertising interval (0.625 ms units).
    pub adv_int_min: u16,
    /// Maximum advertising interval (0.625 ms units).
    pub adv_int_max: u16,

    // --- Timing ---
    /// Event-loop poll interval (milliseconds).
    pub poll_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        // DEFAULT_DEVICE_NAME is 10 bytes, well under the 24-byte cap.
        device_name.push_str(DEFAULT_DEVICE_NAME).ok();
        Self {
            device_name,
            adv_int_min: 0x20, // 20 ms
            adv_int_max: 0x40, // 40 ms
            poll_interval_ms: 50,
        }
    }
}
