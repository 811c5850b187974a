//! BLE peripheral adapter.
//!
//! Bridges the Bluedroid GAP/GATTS C callbacks to the pure core:
//! callbacks translate stack events into [`LinkEvent`]s on a bounded
//! queue, and the main loop drains them into the
//! [`Coordinator`](crate::gap::Coordinator) and
//! [`GattAccessHandler`](crate::gatt::GattAccessHandler).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid BLE GATT server via
//!   `esp_idf_svc::sys`.
//! - **all other targets**: simulation stubs; host tests inject
//!   [`LinkEvent`]s directly through [`push_link_event`].

use log::info;

use crate::config::SystemConfig;
use crate::gap::{AdvertiserPort, GapEvent};
use crate::slots::ConnHandle;

/// Write payloads beyond this are truncated before interpretation.
pub const MAX_WRITE_LEN: usize = 64;

// ───────────────────────────────────────────────────────────────
// Link events
// ───────────────────────────────────────────────────────────────

/// One stack occurrence the main loop must process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A GAP lifecycle event for the coordinator.
    Gap(GapEvent),
    /// A write access to the command characteristic.
    Write {
        conn: ConnHandle,
        data: heapless::Vec<u8, MAX_WRITE_LEN>,
    },
}

// ── Callback → main-loop bridge ───────────────────────────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// state. They run in the Bluedroid task (not ISR), so a std Mutex
// around a bounded deque is safe and sufficient.

static LINK_EVENTS: std::sync::Mutex<heapless::Deque<LinkEvent, 16>> =
    std::sync::Mutex::new(heapless::Deque::new());

/// Enqueue a link event. Returns `false` if the queue was full
/// (event dropped).
pub fn push_link_event(event: LinkEvent) -> bool {
    match LINK_EVENTS.lock() {
        Ok(mut q) => q.push_back(event).is_ok(),
        Err(_) => false,
    }
}

/// Dequeue the oldest pending link event.
pub fn take_link_event() -> Option<LinkEvent> {
    LINK_EVENTS.lock().ok()?.pop_front()
}

/// Build a write event from a raw characteristic write, truncating to
/// the interpretation cap.
pub fn bounded_write(conn: ConnHandle, raw: &[u8]) -> LinkEvent {
    let mut data = heapless::Vec::new();
    if raw.len() > MAX_WRITE_LEN {
        log::warn!(
            "BLE: write of {} bytes truncated to {} (conn_handle={})",
            raw.len(),
            MAX_WRITE_LEN,
            conn
        );
    }
    let take = raw.len().min(MAX_WRITE_LEN);
    // Cannot fail: `take` <= capacity.
    let _ = data.extend_from_slice(&raw[..take]);
    LinkEvent::Write { conn, data }
}

// ───────────────────────────────────────────────────────────────
// BLE state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    Advertising,
    Failed,
}

// ── ESP-IDF static state ──────────────────────────────────────
//
// Handles discovered during asynchronous GATT registration, bridged to
// the callbacks through atomics as in all Bluedroid integrations.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

#[cfg(target_os = "espidf")]
static BLE_GATTS_IF: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_SVC_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_READ_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_WRITE_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CHAR_STEP: AtomicU32 = AtomicU32::new(0);

#[cfg(target_os = "espidf")]
fn uuid16_to_esp(uuid: u16) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 2;
    t.uuid.uuid16 = uuid;
    t
}

#[cfg(target_os = "espidf")]
unsafe fn add_gatt_char(svc_handle: u16, uuid: u16, perm: u32, prop: u32) {
    use esp_idf_svc::sys::*;
    let mut char_uuid = uuid16_to_esp(uuid);
    unsafe {
        esp_ble_gatts_add_char(
            svc_handle,
            &mut char_uuid,
            perm as esp_gatt_perm_t,
            prop as esp_gatt_char_prop_t,
            core::ptr::null_mut(),
            core::ptr::null_mut(),
        );
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            push_link_event(LinkEvent::Gap(GapEvent::AdvComplete));
        }
        other => {
            push_link_event(LinkEvent::Gap(GapEvent::Other(other as u32)));
        }
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    BLE_GATTS_IF.store(gatts_if as u32, AtomicOrdering::Relaxed);

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let svc_uuid = uuid16_to_esp(crate::gatt::SERVICE_UUID);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: svc_uuid,
                    inst_id: 0,
                },
                is_primary: true,
            };
            unsafe {
                esp_ble_gatts_create_service(gatts_if, &mut svc_id, 8);
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let p = unsafe { &(*param).create };
            let svc_handle = p.service_handle;
            BLE_SVC_HANDLE.store(svc_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: service created (handle={})", svc_handle);
            unsafe {
                esp_ble_gatts_start_service(svc_handle);
            }
            BLE_CHAR_STEP.store(1, AtomicOrdering::Relaxed);
            unsafe {
                add_gatt_char(
                    svc_handle,
                    crate::gatt::CHAR_READ_UUID,
                    ESP_GATT_PERM_READ,
                    ESP_GATT_CHAR_PROP_BIT_READ,
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let p = unsafe { &(*param).add_char };
            let handle = p.attr_handle;
            let svc_handle = BLE_SVC_HANDLE.load(AtomicOrdering::Relaxed) as u16;
            match BLE_CHAR_STEP.load(AtomicOrdering::Relaxed) {
                1 => {
                    BLE_READ_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: read char (handle={})", handle);
                    BLE_CHAR_STEP.store(2, AtomicOrdering::Relaxed);
                    unsafe {
                        add_gatt_char(
                            svc_handle,
                            crate::gatt::CHAR_WRITE_UUID,
                            ESP_GATT_PERM_WRITE,
                            ESP_GATT_CHAR_PROP_BIT_WRITE,
                        );
                    }
                }
                2 => {
                    BLE_WRITE_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    BLE_CHAR_STEP.store(3, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: write char (handle={}) — all registered", handle);
                }
                _ => {}
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = unsafe { &(*param).connect };
            push_link_event(LinkEvent::Gap(GapEvent::Connect {
                handle: ConnHandle(p.conn_id),
                success: true,
            }));
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            let p = unsafe { &(*param).disconnect };
            push_link_event(LinkEvent::Gap(GapEvent::Disconnect {
                handle: ConnHandle(p.conn_id),
            }));
        }
        esp_gatts_cb_event_t_ESP_GATTS_READ_EVT => {
            // Reads are answered synchronously with the fixed payload;
            // the handler is stateless so it can run in callback context.
            let p = unsafe { &(*param).read };
            let payload =
                crate::gatt::GattAccessHandler::new().on_read(ConnHandle(p.conn_id));
            let mut rsp: esp_gatt_rsp_t = unsafe { core::mem::zeroed() };
            unsafe {
                rsp.attr_value.handle = p.handle;
                rsp.attr_value.len = payload.len() as u16;
                rsp.attr_value.value[..payload.len()].copy_from_slice(payload);
                esp_ble_gatts_send_response(
                    gatts_if,
                    p.conn_id,
                    p.trans_id,
                    esp_gatt_status_t_ESP_GATT_OK,
                    &mut rsp,
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = unsafe { &(*param).write };
            if p.handle as u32 == BLE_WRITE_CHAR_HANDLE.load(AtomicOrdering::Relaxed) {
                let data = unsafe { core::slice::from_raw_parts(p.value, p.len as usize) };
                push_link_event(bounded_write(ConnHandle(p.conn_id), data));
            }
            if p.need_rsp {
                unsafe {
                    esp_ble_gatts_send_response(
                        gatts_if,
                        p.conn_id,
                        p.trans_id,
                        esp_gatt_status_t_ESP_GATT_OK,
                        core::ptr::null_mut(),
                    );
                }
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleAdapter {
    state: BleState,
    device_name: heapless::String<24>,
    adv_int_min: u16,
    adv_int_max: u16,
}

impl BleAdapter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: BleState::Idle,
            device_name: config.device_name.clone(),
            adv_int_min: config.adv_int_min,
            adv_int_max: config.adv_int_max,
        }
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    /// Bring up the BLE stack, register the GATT service and begin the
    /// first advertising round.
    pub fn start(&mut self) -> crate::error::Result<()> {
        info!("BLE: starting, advertising as '{}'", self.device_name);
        self.platform_start()?;
        self.state = BleState::Advertising;
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> crate::error::Result<()> {
        use crate::error::Error;
        use esp_idf_svc::sys::*;
        unsafe {
            // Release classic BT memory (BLE-only mode saves ~30 KB).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            if esp_bt_controller_init(&mut bt_cfg) != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(Error::Init("bt_controller_init failed"));
            }
            if esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE) != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(Error::Init("bt_controller_enable failed"));
            }
            if esp_bluedroid_init() != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(Error::Init("bluedroid_init failed"));
            }
            if esp_bluedroid_enable() != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(Error::Init("bluedroid_enable failed"));
            }

            esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            esp_ble_gatts_register_callback(Some(ble_gatts_event_handler));
            esp_ble_gatts_app_register(0);

            // Device name doubles as the complete local-name adv field.
            let name = self.device_name.as_bytes();
            esp_ble_gap_set_device_name(name.as_ptr() as *const _);

            let mut adv_data = esp_ble_adv_data_t {
                set_scan_rsp: false,
                include_name: true,
                include_txpower: false,
                flag: (ESP_BLE_ADV_FLAG_GEN_DISC | ESP_BLE_ADV_FLAG_BREDR_NOT_SPT) as u8,
                ..core::mem::zeroed()
            };
            esp_ble_gap_config_adv_data(&mut adv_data);
        }
        self.platform_restart_advertising();
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> crate::error::Result<()> {
        info!(
            "BLE(sim): advertising '{}' (service 0x{:04X})",
            self.device_name,
            crate::gatt::SERVICE_UUID
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_restart_advertising(&mut self) {
        use esp_idf_svc::sys::*;
        // Undirected connectable, generally discoverable, no time limit.
        // The stack tolerates a restart while already advertising.
        let mut adv_params = esp_ble_adv_params_t {
            adv_int_min: self.adv_int_min,
            adv_int_max: self.adv_int_max,
            adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
            own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
            channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
            adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
            ..unsafe { core::mem::zeroed() }
        };
        unsafe {
            esp_ble_gap_start_advertising(&mut adv_params);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_restart_advertising(&mut self) {
        info!(
            "BLE(sim): advertising restarted (interval {}..{})",
            self.adv_int_min, self.adv_int_max
        );
    }
}

impl AdvertiserPort for BleAdapter {
    fn restart(&mut self) {
        self.platform_restart_advertising();
        self.state = BleState::Advertising;
    }
}
