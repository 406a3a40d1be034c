//! Airlink firmware — main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                 │
//! │                                                       │
//! │   GasSensor          BleUartAdapter    LogEventSink   │
//! │   (SensorPort)       (NotifyPort)      (EventSink)    │
//! │                                                       │
//! │   ─────────────── Port Trait Boundary ───────────     │
//! │                                                       │
//! │   ┌───────────────────────────────────────────────┐   │
//! │   │            AppService (pure logic)            │   │
//! │   │   read → validate → encode → gated notify     │   │
//! │   └───────────────────────────────────────────────┘   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! One sample per second; the BLE stack's own task delivers connection
//! events into the shared [`PeerLink`] concurrently with this loop.

#![deny(unused_must_use)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{error, info};

use airlink::adapters::ble::BleUartAdapter;
use airlink::adapters::log_sink::LogEventSink;
use airlink::app::service::AppService;
use airlink::config::SystemConfig;
use airlink::link::PeerLink;
use airlink::sensors::GasSensor;
use airlink::sensors::ccs811::DriveMode;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("-- airlink v{} | CCS811 -> BLE UART --", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    let link = Arc::new(PeerLink::new());
    let mut sink = LogEventSink::new();
    let mut service = AppService::new(Arc::clone(&link));

    // ── 2. I2C bus + sensor bring-up ──────────────────────────
    // SDA=21 / SCL=22, the usual ESP32 devkit wiring. The bus timeout
    // bounds every sensor transaction, so a wedged bus degrades to
    // per-tick faults instead of stalling the loop.
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let i2c_cfg = esp_idf_hal::i2c::I2cConfig::new()
        .baudrate(esp_idf_hal::units::Hertz(100_000).into())
        .timeout(Duration::from_millis(u64::from(config.i2c_timeout_ms)).into());
    let i2c = esp_idf_hal::i2c::I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &i2c_cfg,
    )?;

    let mut sensor = GasSensor::new(i2c, config.sensor_addr);
    if let Err(e) = sensor.begin(DriveMode::EverySecond) {
        error!("fatal: {e}");
        service.mark_halted("sensor init failed", &mut sink);
        // Terminal. The health accessor stays observable to a supervisor;
        // this thread just parks.
        loop {
            thread::sleep(Duration::from_secs(1));
        }
    }

    // ── 3. BLE NUS server ─────────────────────────────────────
    let mut ble = BleUartAdapter::new(config.device_name.clone(), Arc::clone(&link));
    ble.start()
        .map_err(|e| anyhow!("BLE bring-up failed: {e}"))?;

    // ── 4. Sample loop ────────────────────────────────────────
    service.start(&mut sink);
    let period = Duration::from_millis(u64::from(config.sample_period_ms));
    loop {
        thread::sleep(period);
        service.tick(&mut sensor, &mut ble, &mut sink);
    }
}
