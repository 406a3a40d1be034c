//! Sensor subsystem — the CCS811 register driver and the port glue that
//! turns driver results into [`GasReading`]s for the sample loop.

pub mod ccs811;

use embedded_hal::i2c::I2c;
use log::info;

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use ccs811::{Ccs811, Ccs811Error, DriveMode};

// ───────────────────────────────────────────────────────────────
// Reading types
// ───────────────────────────────────────────────────────────────

/// Outcome of one sample attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingStatus {
    Ok,
    Fault(SensorError),
}

/// One air-quality sample. Immutable once produced, consumed synchronously
/// by the encoder, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasReading {
    /// Equivalent CO2, ppm.
    pub eco2: u16,
    /// Total VOC, ppb.
    pub tvoc: u16,
    pub status: ReadingStatus,
    /// Raw current/voltage word. Diagnostic only, unused downstream.
    pub raw: u16,
}

impl GasReading {
    /// A fault reading. Gas values are unspecified and must not be used.
    pub fn fault(err: SensorError) -> Self {
        Self {
            eco2: 0,
            tvoc: 0,
            status: ReadingStatus::Fault(err),
            raw: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, ReadingStatus::Ok)
    }
}

// ───────────────────────────────────────────────────────────────
// GasSensor — SensorPort over the CCS811 driver
// ───────────────────────────────────────────────────────────────

/// Owns the CCS811 driver and adapts it to the [`SensorPort`] contract:
/// `read` never fails outward, it degrades to a fault-status reading.
pub struct GasSensor<I2C> {
    dev: Ccs811<I2C>,
}

impl<I2C: I2c> GasSensor<I2C> {
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self {
            dev: Ccs811::new(i2c, addr),
        }
    }

    /// One-time bootstrap: verify the part, start the app firmware, and
    /// set the periodic drive mode. A failure here is fatal for the whole
    /// process — there is no point sampling without a sensor.
    pub fn begin(&mut self, mode: DriveMode) -> crate::error::Result<()> {
        self.dev.begin().map_err(map_driver_err)?;
        self.dev
            .start(mode)
            .map_err(|e| match map_driver_err(e) {
                SensorError::Bus => SensorError::Bus,
                _ => SensorError::ConfigFailed,
            })?;
        info!("CCS811 up, drive mode {mode:?}");
        Ok(())
    }
}

impl<I2C: I2c> SensorPort for GasSensor<I2C> {
    fn read(&mut self) -> GasReading {
        match self.dev.read() {
            Ok(r) => GasReading {
                eco2: r.eco2,
                tvoc: r.tvoc,
                status: ReadingStatus::Ok,
                raw: r.raw,
            },
            Err(e) => GasReading::fault(map_driver_err(e)),
        }
    }
}

fn map_driver_err<E>(e: Ccs811Error<E>) -> SensorError {
    match e {
        Ccs811Error::Bus(_) => SensorError::Bus,
        Ccs811Error::WrongHardwareId(id) => SensorError::WrongHardwareId(id),
        Ccs811Error::AppInvalid | Ccs811Error::AppStartFailed => SensorError::AppInvalid,
        Ccs811Error::DataNotReady => SensorError::NotReady,
        Ccs811Error::ErrorStatus(id) => SensorError::DeviceError(id),
    }
}
