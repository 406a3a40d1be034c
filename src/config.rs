//! System configuration.
//!
//! Every parameter is fixed at startup — there is no NVS layer and no live
//! reconfiguration. The struct exists so the constants travel together,
//! show up in one place in the log, and can be serialised for a
//! diagnostics dump.

use serde::{Deserialize, Serialize};

/// Fixed-at-startup system parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- I2C / sensor ---
    /// CCS811 slave address (ADDR pin high = 0x5B).
    pub sensor_addr: u8,
    /// Upper bound on any single I2C transaction (milliseconds).
    pub i2c_timeout_ms: u32,

    // --- Sampling ---
    /// Nominal sample period (milliseconds).
    pub sample_period_ms: u32,

    // --- Radio ---
    /// Name carried in BLE advertising.
    pub device_name: heapless::String<24>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        let _ = device_name.push_str("Air-Quality UART");
        Self {
            sensor_addr: crate::sensors::ccs811::ADDR_HIGH,
            i2c_timeout_ms: 100,
            sample_period_ms: 1000,
            device_name,
        }
    }
}
