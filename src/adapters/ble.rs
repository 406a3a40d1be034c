//! BLE Nordic UART Service adapter.
//!
//! Implements [`NotifyPort`] over the NUS profile: one service with a
//! peer-writable RX characteristic and a device-notifiable TX
//! characteristic. Stock UART apps (nRF Connect, Serial Bluetooth
//! Terminal) subscribe to TX and receive one frame per sample.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid BLE GATT server via
//!   `esp_idf_svc::sys`.
//! - **all other targets**: simulation with `sim_*` injection hooks for
//!   host-side tests.
//!
//! ## GATT layout (standard NUS UUIDs)
//!
//! | Characteristic | UUID        | Perms                    |
//! |----------------|-------------|--------------------------|
//! | RX (peer→dev)  | `6E400002-…` | Write, Write-no-response |
//! | TX (dev→peer)  | `6E400003-…` | Read, Notify (+CCCD)     |

use std::sync::Arc;

use log::info;

use crate::app::ports::NotifyPort;
use crate::error::LinkError;
use crate::link::PeerLink;

#[cfg(not(target_os = "espidf"))]
use crate::link::LinkObserver;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const NUS_SERVICE_UUID: u128 = 0x6E400001_B5A3_F393_E0A9_E50E24DCCA9E;
pub const NUS_RX_CHAR_UUID: u128 = 0x6E400002_B5A3_F393_E0A9_E50E24DCCA9E;
pub const NUS_TX_CHAR_UUID: u128 = 0x6E400003_B5A3_F393_E0A9_E50E24DCCA9E;

// ── ESP-IDF BLE static state (callback-context bridge) ────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures. These statics bridge the callback context to the adapter;
// the shared PeerLink is installed once at start().

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
#[cfg(target_os = "espidf")]
use std::sync::OnceLock;

// Bluedroid connection ids start at 0, so "no connection" needs a
// sentinel outside the u16 id space.
#[cfg(target_os = "espidf")]
const NO_CONN: u32 = u32::MAX;

#[cfg(target_os = "espidf")]
static BLE_GATTS_IF: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CONN_ID: AtomicU32 = AtomicU32::new(NO_CONN);
#[cfg(target_os = "espidf")]
static BLE_SVC_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_RX_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_TX_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CHAR_STEP: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_LINK: OnceLock<Arc<PeerLink>> = OnceLock::new();

#[cfg(target_os = "espidf")]
fn uuid128_to_esp(uuid: u128) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 16;
    unsafe {
        t.uuid.uuid128 = uuid.to_le_bytes();
    }
    t
}

#[cfg(target_os = "espidf")]
fn uuid16_to_esp(uuid: u16) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 2;
    unsafe {
        t.uuid.uuid16 = uuid;
    }
    t
}

#[cfg(target_os = "espidf")]
unsafe fn add_gatt_char(svc_handle: u16, uuid: u128, perm: u32, prop: u32) {
    use esp_idf_svc::sys::*;
    let mut char_uuid = uuid128_to_esp(uuid);
    esp_ble_gatts_add_char(
        svc_handle,
        &mut char_uuid,
        perm as esp_gatt_perm_t,
        prop as esp_gatt_char_prop_t,
        core::ptr::null_mut(),
        core::ptr::null_mut(),
    );
}

#[cfg(target_os = "espidf")]
unsafe fn start_advertising() {
    use esp_idf_svc::sys::*;
    let mut adv_params = esp_ble_adv_params_t {
        adv_int_min: 0x20,
        adv_int_max: 0x40,
        adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
        own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
        channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
        adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
        ..core::mem::zeroed()
    };
    esp_ble_gap_start_advertising(&mut adv_params);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_SET_COMPLETE_EVT => {
            start_advertising();
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
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
            let svc_uuid = uuid128_to_esp(NUS_SERVICE_UUID);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: svc_uuid,
                    inst_id: 0,
                },
                is_primary: true,
            };
            esp_ble_gatts_create_service(gatts_if, &mut svc_id, 8);
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let p = &(*param).create;
            let svc_handle = p.service_handle;
            BLE_SVC_HANDLE.store(svc_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: NUS service created (handle={})", svc_handle);
            esp_ble_gatts_start_service(svc_handle);
            BLE_CHAR_STEP.store(1, AtomicOrdering::Relaxed);
            add_gatt_char(
                svc_handle,
                NUS_RX_CHAR_UUID,
                ESP_GATT_PERM_WRITE,
                ESP_GATT_CHAR_PROP_BIT_WRITE | ESP_GATT_CHAR_PROP_BIT_WRITE_NR,
            );
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let p = &(*param).add_char;
            let handle = p.attr_handle;
            let svc_handle = BLE_SVC_HANDLE.load(AtomicOrdering::Relaxed) as u16;
            match BLE_CHAR_STEP.load(AtomicOrdering::Relaxed) {
                1 => {
                    BLE_RX_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: RX char (handle={})", handle);
                    BLE_CHAR_STEP.store(2, AtomicOrdering::Relaxed);
                    add_gatt_char(
                        svc_handle,
                        NUS_TX_CHAR_UUID,
                        ESP_GATT_PERM_READ,
                        ESP_GATT_CHAR_PROP_BIT_READ | ESP_GATT_CHAR_PROP_BIT_NOTIFY,
                    );
                }
                2 => {
                    BLE_TX_CHAR_HANDLE.store(handle as u32, AtomicOrdering::Relaxed);
                    log::info!("BLE GATTS: TX char (handle={})", handle);
                    BLE_CHAR_STEP.store(3, AtomicOrdering::Relaxed);
                    // CCCD so subscribers can enable notifications.
                    let mut cccd_uuid = uuid16_to_esp(ESP_GATT_UUID_CHAR_CLIENT_CONFIG as u16);
                    esp_ble_gatts_add_char_descr(
                        svc_handle,
                        &mut cccd_uuid,
                        (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                        core::ptr::null_mut(),
                        core::ptr::null_mut(),
                    );
                }
                _ => {}
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_DESCR_EVT => {
            log::info!("BLE GATTS: CCCD added — NUS ready");
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = &(*param).connect;
            BLE_CONN_ID.store(p.conn_id as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: central connected (conn_id={})", p.conn_id);
            if let Some(link) = BLE_LINK.get() {
                crate::link::LinkObserver::on_peer_connected(link.as_ref());
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            BLE_CONN_ID.store(NO_CONN, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: central disconnected");
            if let Some(link) = BLE_LINK.get() {
                crate::link::LinkObserver::on_peer_disconnected(link.as_ref());
            }
            // UART clients expect the device to come straight back.
            start_advertising();
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = &(*param).write;
            if p.handle as u32 == BLE_RX_CHAR_HANDLE.load(AtomicOrdering::Relaxed) {
                let data = core::slice::from_raw_parts(p.value, p.len as usize);
                if let Some(link) = BLE_LINK.get() {
                    crate::link::LinkObserver::on_peer_write(link.as_ref(), data);
                }
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

/// NUS GATT server adapter. Owns the advertising lifecycle; connection
/// state itself lives in the shared [`PeerLink`].
pub struct BleUartAdapter {
    link: Arc<PeerLink>,
    device_name: heapless::String<24>,
    started: bool,
}

impl BleUartAdapter {
    pub fn new(device_name: heapless::String<24>, link: Arc<PeerLink>) -> Self {
        Self {
            link,
            device_name,
            started: false,
        }
    }

    /// Bring up the stack and start advertising the NUS service.
    pub fn start(&mut self) -> crate::error::Result<()> {
        info!("BLE: starting, advertising as '{}'", self.device_name);
        self.platform_start()?;
        self.started = true;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ── Simulation hooks (host targets) ───────────────────────

    /// Simulate a central connecting.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_peer_connected(&self) {
        self.link.on_peer_connected();
    }

    /// Simulate the central dropping the connection.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_peer_disconnected(&self) {
        self.link.on_peer_disconnected();
    }

    /// Simulate a write to the RX characteristic.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_peer_write(&self, data: &[u8]) {
        self.link.on_peer_write(data);
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        let _ = BLE_LINK.set(Arc::clone(&self.link));

        unsafe {
            // BLE-only mode; classic BT memory is never needed.
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            if esp_bt_controller_init(&mut bt_cfg) != ESP_OK as i32 {
                return Err(LinkError::StackInitFailed);
            }
            if esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE) != ESP_OK as i32 {
                return Err(LinkError::StackInitFailed);
            }
            if esp_bluedroid_init() != ESP_OK as i32 {
                return Err(LinkError::StackInitFailed);
            }
            if esp_bluedroid_enable() != ESP_OK as i32 {
                return Err(LinkError::StackInitFailed);
            }

            esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            esp_ble_gatts_register_callback(Some(ble_gatts_event_handler));
            esp_ble_gatts_app_register(0);

            // NUL-terminated copy for the C API.
            let mut name = heapless::Vec::<u8, 25>::new();
            let _ = name.extend_from_slice(self.device_name.as_bytes());
            let _ = name.push(0);
            esp_ble_gap_set_device_name(name.as_ptr().cast());

            // Advertise the 128-bit NUS UUID so scanners can filter on it;
            // advertising itself starts from ADV_DATA_SET_COMPLETE.
            let mut service_uuid = NUS_SERVICE_UUID.to_le_bytes();
            let mut adv_data = esp_ble_adv_data_t {
                set_scan_rsp: false,
                include_name: true,
                min_interval: 0x0006,
                max_interval: 0x0010,
                service_uuid_len: 16,
                p_service_uuid: service_uuid.as_mut_ptr(),
                flag: (ESP_BLE_ADV_FLAG_GEN_DISC | ESP_BLE_ADV_FLAG_BREDR_NOT_SPT) as u8,
                ..core::mem::zeroed()
            };
            if esp_ble_gap_config_adv_data(&mut adv_data) != ESP_OK as i32 {
                return Err(LinkError::AdvertisingFailed);
            }

            log::info!(
                "BLE(espidf): Bluedroid up, NUS advertising as '{}'",
                self.device_name
            );
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), LinkError> {
        info!(
            "BLE(sim): advertising '{}' (service {:032x})",
            self.device_name, NUS_SERVICE_UUID
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_notify(&mut self, frame: &[u8]) {
        use esp_idf_svc::sys::*;
        unsafe {
            let handle = BLE_TX_CHAR_HANDLE.load(AtomicOrdering::Relaxed);
            let conn = BLE_CONN_ID.load(AtomicOrdering::Relaxed);
            if handle != 0 && conn != NO_CONN {
                // need_confirm=false — a notify, not an indicate. Frames
                // are far below the 23-byte default ATT MTU.
                esp_ble_gatts_send_indicate(
                    BLE_GATTS_IF.load(AtomicOrdering::Relaxed) as u8,
                    conn as u16,
                    handle as u16,
                    frame.len() as u16,
                    frame.as_ptr().cast_mut(),
                    false,
                );
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_notify(&mut self, frame: &[u8]) {
        log::debug!("BLE(sim): notify {:?}", core::str::from_utf8(frame).ok());
    }
}

impl NotifyPort for BleUartAdapter {
    fn notify(&mut self, frame: &[u8]) {
        self.platform_notify(frame);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
