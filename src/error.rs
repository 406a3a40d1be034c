//! Unified error types for the airlink firmware.
//!
//! Startup-fallible operations (sensor bring-up, BLE bring-up) funnel into
//! a single `Error` enum, keeping `main`'s fail-fast handling uniform.
//! Per-tick faults never reach it: they travel as the typed sub-errors
//! inside readings and diagnostic events. All variants are `Copy` so they
//! can be cheaply carried without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every startup-fallible operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The gas sensor could not be brought up.
    Sensor(SensorError),
    /// The radio link subsystem failed.
    Link(LinkError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Why a sensor read or bootstrap step failed.
///
/// `DeviceError` carries the raw ERROR_ID register contents so the exact
/// cause (heater fault, invalid register, etc.) survives into the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C transaction failed or timed out.
    Bus,
    /// HW_ID register did not identify a CCS811 (carries the value seen).
    WrongHardwareId(u8),
    /// No valid application firmware, or APP_START did not take effect.
    AppInvalid,
    /// Measurement mode write was rejected.
    ConfigFailed,
    /// No fresh sample available yet.
    NotReady,
    /// The sensor raised its ERROR flag (carries ERROR_ID).
    DeviceError(u8),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C transaction failed"),
            Self::WrongHardwareId(id) => write!(f, "unexpected HW_ID 0x{id:02x}"),
            Self::AppInvalid => write!(f, "sensor application invalid"),
            Self::ConfigFailed => write!(f, "measurement mode rejected"),
            Self::NotReady => write!(f, "no data ready"),
            Self::DeviceError(id) => write!(f, "sensor error, ERROR_ID=0x{id:02x}"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Encoding errors
// ---------------------------------------------------------------------------

/// Outbound frame encoding failures. Strictly per-tick: carried inside
/// [`AppEvent::EncodeFault`](crate::app::events::AppEvent), never funnelled
/// into [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A fault reading reached the encoder — a caller bug, never encoded.
    FaultReading,
    /// The formatted frame did not fit the fixed buffer.
    Overflow,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FaultReading => write!(f, "refusing to encode a fault reading"),
            Self::Overflow => write!(f, "frame exceeds buffer capacity"),
        }
    }
}

// ---------------------------------------------------------------------------
// Radio link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The BLE controller or host stack failed to come up.
    StackInitFailed,
    /// Advertising could not be started.
    AdvertisingFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackInitFailed => write!(f, "BLE stack initialisation failed"),
            Self::AdvertisingFailed => write!(f, "advertising start failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
